use graph::prelude::{BlockPtr, StoreError};
use thiserror::Error;

use crate::mapping::MappingError;

/// Processing a block failed. The block was not written to the store.
#[derive(Debug, Error)]
pub enum BlockProcessingError {
    #[error("handler for {trigger} in block {block} failed: {error}")]
    Handler {
        block: BlockPtr,
        trigger: String,
        #[source]
        error: MappingError,
    },

    #[error("failed to write block {block}: {error}")]
    Store {
        block: BlockPtr,
        #[source]
        error: StoreError,
    },
}

impl BlockProcessingError {
    pub fn block(&self) -> &BlockPtr {
        match self {
            BlockProcessingError::Handler { block, .. } | BlockProcessingError::Store { block, .. } => {
                block
            }
        }
    }
}
