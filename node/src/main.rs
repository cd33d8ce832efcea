use clap::Parser as _;
use git_testament::{git_testament, render_testament};

use graph::log::logger;
use graph::prelude::*;
use linkfolio_node::commands;
use linkfolio_node::opt::{Command, Opt};
use linkfolio_store_sled::SledStore;

git_testament!(TESTAMENT);

#[tokio::main]
async fn main() {
    let opt = Opt::parse();

    // Set up logger
    let logger = logger(opt.debug);
    debug!(logger, "LinkFolio indexer version: {}", render_testament!(TESTAMENT));

    if let Err(e) = run(&logger, opt).await {
        error!(logger, "{:#}", e);
        // Let the async drain write out the error before exiting
        drop(logger);
        std::process::exit(1);
    }
}

async fn run(logger: &Logger, opt: Opt) -> Result<(), Error> {
    let schema = linkfolio_core::input_schema().context("invalid entity schema")?;
    let store = SledStore::open(&opt.store_path, schema, logger)
        .with_context(|| format!("failed to open store at {}", opt.store_path.display()))?;
    let store = Arc::new(store);

    match opt.cmd {
        Command::Index {
            logs,
            contract,
            start_block,
        } => commands::index::run(logger, store, logs, contract, start_block).await,
        Command::Query { cmd } => commands::query::run(store.as_ref(), cmd),
    }
}
