use std::path::PathBuf;

use graph::ethabi::Address;
use graph::prelude::*;
use graph::serde_json::json;
use linkfolio_chain_ethereum::block_stream_from_file;
use linkfolio_core::IndexingRunner;

/// The first block to index: `start_block` if it is given, otherwise the
/// block after the last one in the store.
pub fn start_block(
    store: &dyn WritableStore,
    start_block: Option<BlockNumber>,
) -> Result<BlockNumber, StoreError> {
    match start_block {
        Some(number) => Ok(number),
        None => Ok(store.block_ptr()?.map(|ptr| ptr.number + 1).unwrap_or(0)),
    }
}

pub async fn run<S: WritableStore>(
    logger: &Logger,
    store: Arc<S>,
    logs: PathBuf,
    contract: Option<Address>,
    start: Option<BlockNumber>,
) -> Result<(), Error> {
    let start = start_block(store.as_ref(), start)?;
    let logger = logger.new(o!("logs" => logs.display().to_string()));
    info!(logger, "Indexing logs";
        "start_block" => start,
        "contract" => contract.map(|address| format!("{:?}", address)));

    let block_stream = match block_stream_from_file(logs, contract, start, logger.clone()).await
    {
        Ok(block_stream) => block_stream,
        Err(e) => {
            error!(logger, "Failed to start indexing";
                "error" => format!("{:#}", e),
                "code" => LogCode::IndexingStartFailure);
            return Err(e);
        }
    };

    let runner = IndexingRunner::new(store, logger);
    let block_ptr = runner.run(block_stream).await?;

    let json = json!({
        "blockPtr": block_ptr.map(|ptr| json!({
            "number": ptr.number,
            "hash": ptr.hash.to_string(),
        })),
    });
    println!("{}", json);
    Ok(())
}
