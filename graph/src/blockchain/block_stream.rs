use anyhow::Error;
use futures03::Stream;
use std::pin::Pin;

use super::{BlockPtr, BlockTime};

/// A block together with the triggers in it that the indexer has to
/// process. Triggers are in the order in which the chain emitted them.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockWithTriggers<T> {
    pub block: BlockPtr,
    pub timestamp: BlockTime,
    pub trigger_data: Vec<T>,
}

impl<T> BlockWithTriggers<T> {
    pub fn new(block: BlockPtr, timestamp: BlockTime, trigger_data: Vec<T>) -> Self {
        Self {
            block,
            timestamp,
            trigger_data,
        }
    }

    pub fn trigger_count(&self) -> usize {
        self.trigger_data.len()
    }

    pub fn ptr(&self) -> BlockPtr {
        self.block.clone()
    }
}

/// Blocks in strictly increasing order of block number.
pub type BlockStream<T> = Pin<Box<dyn Stream<Item = Result<BlockWithTriggers<T>, Error>> + Send>>;
