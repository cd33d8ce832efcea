use slog::{o, Drain, FilterLevel, Logger};

use crate::env::ENV_VARS;

pub mod codes;

/// Build the root logger. Debug output is only shown when `show_debug` is
/// set; `LINKFOLIO_LOG` can refine levels per module in `RUST_LOG` syntax.
pub fn logger(show_debug: bool) -> Logger {
    logger_with_levels(show_debug, ENV_VARS.log_levels.as_deref())
}

pub fn logger_with_levels(show_debug: bool, levels: Option<&str>) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let default_level = if show_debug {
        FilterLevel::Debug
    } else {
        FilterLevel::Info
    };
    let drain = slog_envlogger::LogBuilder::new(drain)
        .filter(None, default_level)
        .parse(levels.unwrap_or(""))
        .build();
    let drain = slog_async::Async::new(drain)
        .chan_size(20000)
        .build()
        .fuse();
    Logger::root(drain, o!())
}

/// A logger that drops everything; used in tests.
pub fn discard() -> Logger {
    Logger::root(slog::Discard, o!())
}
