//! Decoding of LinkFolio contract logs and the file-backed block stream
//! that feeds them to the indexer.

mod abi;
mod codec;
mod log_source;
mod trigger;

pub use abi::{EventKind, CONTRACT};
pub use codec::{decode_log, DecodeError, Log};
pub use log_source::{block_stream, block_stream_from_file};
pub use trigger::{
    LinkFolioEvent, LogTrigger, NoteLeft, PostCreated, ProfileDeleted, ProfileEvent,
};
