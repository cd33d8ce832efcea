use std::path::PathBuf;

use async_stream::try_stream;
use graph::ethabi::Address;
use graph::futures03::Stream;
use graph::prelude::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::codec::{decode_log, Log};
use crate::trigger::LogTrigger;

/// Turn a file of JSON-lines logs into a stream of blocks. See
/// `block_stream`.
pub async fn block_stream_from_file(
    path: PathBuf,
    contract: Option<Address>,
    start_block: BlockNumber,
    logger: Logger,
) -> Result<BlockStream<LogTrigger>, Error> {
    let file = tokio::fs::File::open(&path)
        .await
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok(block_stream(
        BufReader::new(file),
        contract,
        start_block,
        logger,
    ))
}

/// Read logs, one JSON object per line, and group them into blocks. Logs
/// must be ordered by block number; within a block they are sorted by log
/// index. Logs before `start_block` and, if `contract` is set, logs from
/// other addresses are skipped. Logs that are not LinkFolio events are
/// dropped, but their block is still produced so that the block pointer
/// advances past it.
pub fn block_stream<R>(
    reader: R,
    contract: Option<Address>,
    start_block: BlockNumber,
    logger: Logger,
) -> BlockStream<LogTrigger>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    Box::pin(stream_blocks(reader, contract, start_block, logger))
}

fn stream_blocks<R>(
    reader: R,
    contract: Option<Address>,
    start_block: BlockNumber,
    logger: Logger,
) -> impl Stream<Item = Result<BlockWithTriggers<LogTrigger>, Error>> + Send
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    try_stream! {
        let mut lines = reader.lines();
        let mut line_no = 0usize;
        let mut pending: Option<PendingBlock> = None;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let log: Log = serde_json::from_str(&line)
                .with_context(|| format!("line {} is not a valid log", line_no))?;

            if log.block_number < start_block {
                continue;
            }
            if let Some(contract) = contract {
                if log.address != contract {
                    continue;
                }
            }

            let (finished, mut block) = PendingBlock::advance(pending.take(), &log)
                .with_context(|| format!("line {}", line_no))?;
            if let Some(finished) = finished {
                yield finished;
            }

            let decoded = decode_log(&log).with_context(|| {
                format!("line {}: log {} in block {}", line_no, log.log_index, log.block_number)
            })?;
            match decoded {
                Some(event) => block.triggers.push(LogTrigger {
                    event,
                    address: log.address,
                    log_index: log.log_index,
                    transaction_hash: log.transaction_hash,
                }),
                None => trace!(logger, "Skipping log that is not a LinkFolio event";
                    "block_number" => log.block_number,
                    "log_index" => log.log_index),
            }
            pending = Some(block);
        }

        if let Some(block) = pending {
            yield block.finish();
        }
    }
}

struct PendingBlock {
    ptr: BlockPtr,
    timestamp: BlockTime,
    triggers: Vec<LogTrigger>,
}

impl PendingBlock {
    fn new(ptr: BlockPtr, timestamp: BlockTime) -> Self {
        PendingBlock {
            ptr,
            timestamp,
            triggers: Vec::new(),
        }
    }

    /// Add `log` to the block that is being collected. If `log` starts a
    /// new block, the previous one is done and returned.
    fn advance(
        pending: Option<PendingBlock>,
        log: &Log,
    ) -> Result<(Option<BlockWithTriggers<LogTrigger>>, PendingBlock), Error> {
        let ptr = log.block_ptr();
        match pending {
            None => Ok((None, PendingBlock::new(ptr, log.block_timestamp))),
            Some(block) if block.ptr.number == ptr.number => {
                if block.ptr.hash != ptr.hash {
                    bail!(
                        "block {} has conflicting hashes {} and {}",
                        ptr.number,
                        block.ptr.hash,
                        ptr.hash
                    );
                }
                Ok((None, block))
            }
            Some(block) if block.ptr.number < ptr.number => Ok((
                Some(block.finish()),
                PendingBlock::new(ptr, log.block_timestamp),
            )),
            Some(block) => bail!(
                "block number went backwards from {} to {}",
                block.ptr.number,
                ptr.number
            ),
        }
    }

    fn finish(mut self) -> BlockWithTriggers<LogTrigger> {
        self.triggers.sort_by_key(|trigger| trigger.log_index);
        BlockWithTriggers::new(self.ptr, self.timestamp, self.triggers)
    }
}
