use envconfig::Envconfig;
use lazy_static::lazy_static;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    pub static ref ENV_VARS: EnvVars = EnvVars::from_env().unwrap();
}

/// Indexer settings that are read from the environment once at start-up.
#[derive(Clone)]
pub struct EnvVars {
    /// Log levels in `RUST_LOG` syntax, applied on top of the default
    /// level.
    ///
    /// Set by the environment variable `LINKFOLIO_LOG`. No default.
    pub log_levels: Option<String>,
    /// Log the decoded payload of every event before it is handed to its
    /// handler.
    ///
    /// Set by the flag `LINKFOLIO_LOG_TRIGGER_DATA`. Off by default.
    pub log_trigger_data: bool,
    /// Skip checking entities against `schema.graphql` when they are
    /// written.
    ///
    /// Set by the flag `LINKFOLIO_DISABLE_SCHEMA_VALIDATION`. Off by default.
    pub disable_schema_validation: bool,
    /// Flush the store to disk after every block.
    ///
    /// Set by the flag `LINKFOLIO_STORE_FLUSH_EVERY_BLOCK`. On by default.
    pub store_flush_every_block: bool,
    /// How many entities a query returns when it does not say.
    ///
    /// Set by the environment variable `LINKFOLIO_QUERY_DEFAULT_FIRST`. The
    /// default value is 100.
    pub query_default_first: u32,
    /// Upper bound for `first` in queries.
    ///
    /// Set by the environment variable `LINKFOLIO_QUERY_MAX_FIRST`. The
    /// default value is 1000.
    pub query_max_first: u32,
}

// Does not print any values, so that nothing sensitive ends up in logs
impl fmt::Debug for EnvVars {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "env vars")
    }
}

impl EnvVars {
    pub fn from_env() -> Result<Self, envconfig::Error> {
        let inner = Inner::init_from_env()?;
        Ok(Self::from(inner))
    }
}

impl From<Inner> for EnvVars {
    fn from(x: Inner) -> Self {
        Self {
            log_levels: x.log_levels,
            log_trigger_data: x.log_trigger_data.0,
            disable_schema_validation: x.disable_schema_validation.0,
            store_flush_every_block: x.store_flush_every_block.0,
            query_default_first: x.query_default_first,
            query_max_first: x.query_max_first,
        }
    }
}

#[derive(Clone, Debug, Envconfig)]
struct Inner {
    #[envconfig(from = "LINKFOLIO_LOG")]
    log_levels: Option<String>,
    #[envconfig(from = "LINKFOLIO_LOG_TRIGGER_DATA", default = "false")]
    log_trigger_data: EnvVarBoolean,
    #[envconfig(from = "LINKFOLIO_DISABLE_SCHEMA_VALIDATION", default = "false")]
    disable_schema_validation: EnvVarBoolean,
    #[envconfig(from = "LINKFOLIO_STORE_FLUSH_EVERY_BLOCK", default = "true")]
    store_flush_every_block: EnvVarBoolean,
    #[envconfig(from = "LINKFOLIO_QUERY_DEFAULT_FIRST", default = "100")]
    query_default_first: u32,
    #[envconfig(from = "LINKFOLIO_QUERY_MAX_FIRST", default = "1000")]
    query_max_first: u32,
}

#[derive(Copy, Clone, Debug)]
struct EnvVarBoolean(pub bool);

impl FromStr for EnvVarBoolean {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" | "1" => Ok(Self(true)),
            "false" | "0" => Ok(Self(false)),
            _ => Err("Invalid env. var. flag, expected true / false / 1 / 0".to_string()),
        }
    }
}
