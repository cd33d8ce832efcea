use std::sync::Arc;

use graph::futures03::StreamExt;
use graph::prelude::*;
use linkfolio_chain_ethereum::LogTrigger;

use super::BlockProcessingError;
use crate::mapping::{self, MappingContext};

/// Feeds blocks from a block stream through the mappings and writes the
/// result into the store, one block at a time.
pub struct IndexingRunner<S> {
    store: Arc<S>,
    logger: Logger,
}

impl<S: WritableStore> IndexingRunner<S> {
    pub fn new(store: Arc<S>, logger: Logger) -> Self {
        IndexingRunner { store, logger }
    }

    /// Process blocks until the stream ends. Returns the pointer of the last
    /// block in the store.
    pub async fn run(
        &self,
        mut block_stream: BlockStream<LogTrigger>,
    ) -> Result<Option<BlockPtr>, Error> {
        info!(self.logger, "Starting indexing";
            "block_ptr" => self.store.block_ptr()?.map(|ptr| ptr.to_string()));

        let mut blocks = 0usize;
        while let Some(block) = block_stream.next().await {
            let block = match block {
                Ok(block) => block,
                Err(e) => {
                    error!(self.logger, "Block stream failed";
                        "error" => format!("{:#}", e),
                        "code" => LogCode::BlockStreamError);
                    return Err(e.context("failed to read the next block"));
                }
            };

            if let Err(e) = self.process_block(block) {
                error!(self.logger, "Indexing failed";
                    "error" => e.to_string(),
                    "block_number" => e.block().number,
                    "code" => LogCode::IndexingFailure);
                return Err(e.into());
            }
            blocks += 1;
        }

        self.store.flush()?;
        let block_ptr = self.store.block_ptr()?;
        info!(self.logger, "Indexing finished";
            "blocks" => blocks,
            "block_ptr" => block_ptr.as_ref().map(|ptr| ptr.to_string()));
        Ok(block_ptr)
    }

    /// Run every trigger in `block` through its handler and write the
    /// resulting changes, together with the new block pointer, in one
    /// transaction. If any handler fails, nothing from the block is written.
    pub fn process_block(
        &self,
        block: BlockWithTriggers<LogTrigger>,
    ) -> Result<(), BlockProcessingError> {
        let block_ptr = block.ptr();
        let logger = self.logger.new(o!(
            "block_number" => block_ptr.number,
            "block_hash" => block_ptr.hash.to_string()
        ));

        if block.trigger_count() == 1 {
            debug!(&logger, "1 trigger in this block");
        } else {
            debug!(&logger, "{} triggers in this block", block.trigger_count());
        }

        let store: Arc<dyn ReadStore> = self.store.cheap_clone();
        let mut cache = EntityCache::new(store);
        let timestamp = BigInt::from(block.timestamp);

        for trigger in &block.trigger_data {
            if ENV_VARS.log_trigger_data {
                debug!(&logger, "Trigger data"; "trigger" => format!("{:?}", trigger));
            }

            cache.enter_handler();
            let mut ctx = MappingContext::new(&mut cache, timestamp.clone(), &logger);
            match mapping::handle_event(&mut ctx, &trigger.event) {
                Ok(()) => cache.exit_handler(),
                Err(error) => {
                    cache.exit_handler_and_discard_changes();
                    return Err(BlockProcessingError::Handler {
                        block: block_ptr,
                        trigger: trigger.error_context(),
                        error,
                    });
                }
            }
        }

        let mods = cache
            .as_modifications()
            .map_err(|error| BlockProcessingError::Store {
                block: block_ptr.clone(),
                error,
            })?;
        if !mods.is_empty() {
            info!(&logger, "Applying {} entity operation(s)", mods.len());
        }

        self.store
            .transact_block_operations(block_ptr.clone(), mods)
            .and_then(|()| {
                if ENV_VARS.store_flush_every_block {
                    self.store.flush()
                } else {
                    Ok(())
                }
            })
            .map_err(|error| BlockProcessingError::Store {
                block: block_ptr,
                error,
            })?;

        debug!(&logger, "Block processed"; "code" => LogCode::BlockProcessed);
        Ok(())
    }
}
