pub mod block_stream;
mod types;

pub use types::{BlockHash, BlockPtr};

/// The type we use for block numbers. Blocks are numbered from 0 and fit
/// comfortably in 32 bits for any chain we index.
pub type BlockNumber = i32;

/// Block time as unix seconds, as reported by the chain.
pub type BlockTime = u64;
