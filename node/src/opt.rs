use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use git_testament::{git_testament, render_testament};
use graph::ethabi::Address;
use graph::prelude::BlockNumber;
use lazy_static::lazy_static;

git_testament!(TESTAMENT);
lazy_static! {
    static ref RENDERED_TESTAMENT: String = render_testament!(TESTAMENT);
}

#[derive(Clone, Debug, Parser)]
#[clap(
    name = "linkfolio",
    about = "Index LinkFolio contract events and query the resulting profiles",
    version = RENDERED_TESTAMENT.as_str()
)]
pub struct Opt {
    #[clap(
        long,
        value_name = "DIR",
        env = "LINKFOLIO_STORE_PATH",
        default_value = "./linkfolio-db",
        help = "Directory of the entity store"
    )]
    pub store_path: PathBuf,
    #[clap(long, help = "Enable debug logging")]
    pub debug: bool,
    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Index the LinkFolio events in a file of logs
    ///
    /// The file has one log per line, as JSON in the shape `eth_getLogs`
    /// returns plus a `blockTimestamp`. Indexing picks up after the last
    /// block in the store unless `--start-block` is given.
    Index {
        /// The file with the logs
        #[clap(long, value_name = "FILE")]
        logs: PathBuf,
        /// Only index logs emitted by this address
        #[clap(
            long,
            value_name = "ADDRESS",
            env = "LINKFOLIO_CONTRACT",
            value_parser = parse_address
        )]
        contract: Option<Address>,
        /// Skip logs before this block. Blocks that were already indexed
        /// are processed again.
        #[clap(long, value_name = "NUMBER")]
        start_block: Option<BlockNumber>,
    },
    /// Query the indexed entities and print them as JSON
    Query {
        #[clap(subcommand)]
        cmd: QueryCommand,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum QueryCommand {
    /// List profiles
    Profiles {
        /// Only profiles whose name, handle, bio or owner contain this text,
        /// ignoring case
        #[clap(long)]
        search: Option<String>,
        /// Only profiles owned by this address
        #[clap(long, value_name = "ADDRESS")]
        owner: Option<String>,
        #[clap(long)]
        first: Option<u32>,
        #[clap(long, default_value = "0")]
        skip: u32,
        /// Attribute to sort by; profiles are sorted by id otherwise
        #[clap(long, value_name = "ATTRIBUTE")]
        order_by: Option<String>,
        #[clap(long, value_enum, default_value = "asc")]
        order_direction: OrderDirection,
    },
    /// Show a profile with its notes and posts
    Profile {
        handle: String,
        #[clap(long)]
        notes_first: Option<u32>,
        #[clap(long)]
        posts_first: Option<u32>,
    },
    /// Show a user and the profiles they own
    User { address: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderDirection {
    Asc,
    Desc,
}

fn parse_address(s: &str) -> Result<Address, String> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| format!("`{}` is not a hex address: {}", s, e))?;
    if bytes.len() != Address::len_bytes() {
        return Err(format!("`{}` is not 20 bytes long", s));
    }
    Ok(Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index() {
        let opt = Opt::try_parse_from([
            "linkfolio",
            "--store-path",
            "/tmp/db",
            "index",
            "--logs",
            "logs.jsonl",
            "--contract",
            "0x00000000000000000000000000000000000000AA",
            "--start-block",
            "12",
        ])
        .unwrap();

        assert_eq!(PathBuf::from("/tmp/db"), opt.store_path);
        match opt.cmd {
            Command::Index {
                logs,
                contract,
                start_block,
            } => {
                assert_eq!(PathBuf::from("logs.jsonl"), logs);
                assert_eq!(Some(Address::from_low_u64_be(0xaa)), contract);
                assert_eq!(Some(12), start_block);
            }
            cmd => panic!("unexpected command {:?}", cmd),
        }
    }

    #[test]
    fn parse_query_profiles() {
        let opt = Opt::try_parse_from([
            "linkfolio",
            "query",
            "profiles",
            "--search",
            "ali",
            "--order-by",
            "createdAt",
            "--order-direction",
            "desc",
        ])
        .unwrap();

        match opt.cmd {
            Command::Query {
                cmd:
                    QueryCommand::Profiles {
                        search,
                        order_by,
                        order_direction,
                        skip,
                        ..
                    },
            } => {
                assert_eq!(Some("ali".to_string()), search);
                assert_eq!(Some("createdAt".to_string()), order_by);
                assert_eq!(OrderDirection::Desc, order_direction);
                assert_eq!(0, skip);
            }
            cmd => panic!("unexpected command {:?}", cmd),
        }
    }

    #[test]
    fn reject_bad_contract() {
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0xzz00000000000000000000000000000000000000").is_err());
    }
}
