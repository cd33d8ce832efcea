mod error;
mod runner;

pub use error::BlockProcessingError;
pub use runner::IndexingRunner;
