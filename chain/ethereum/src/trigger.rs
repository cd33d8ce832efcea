use std::fmt;

use graph::ethabi::{Address, Hash};
use graph::prelude::BigInt;

use crate::abi::EventKind;

/// The payload of `ProfileCreated` and `ProfileUpdated`, which carry the
/// same parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileEvent {
    pub token_id: BigInt,
    pub owner: Address,
    pub handle: String,
    pub name: String,
    pub bio: String,
    pub avatar: String,
    /// Parallel to `links`: `links[i]` is the url for `link_keys[i]`
    pub link_keys: Vec<String>,
    pub links: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileDeleted {
    pub handle: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteLeft {
    pub token_id: BigInt,
    pub note_id: BigInt,
    pub author: Address,
    /// Handle of the profile the note was left on
    pub handle: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCreated {
    pub token_id: BigInt,
    pub post_id: BigInt,
    /// Handle of the profile that posted
    pub handle: String,
    pub content: String,
}

/// A decoded LinkFolio event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkFolioEvent {
    ProfileCreated(ProfileEvent),
    ProfileUpdated(ProfileEvent),
    ProfileDeleted(ProfileDeleted),
    NoteLeft(NoteLeft),
    PostCreated(PostCreated),
}

impl LinkFolioEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LinkFolioEvent::ProfileCreated(_) => EventKind::ProfileCreated,
            LinkFolioEvent::ProfileUpdated(_) => EventKind::ProfileUpdated,
            LinkFolioEvent::ProfileDeleted(_) => EventKind::ProfileDeleted,
            LinkFolioEvent::NoteLeft(_) => EventKind::NoteLeft,
            LinkFolioEvent::PostCreated(_) => EventKind::PostCreated,
        }
    }

    /// The handle of the profile the event is about. Every LinkFolio event
    /// names one.
    pub fn handle(&self) -> &str {
        match self {
            LinkFolioEvent::ProfileCreated(e) | LinkFolioEvent::ProfileUpdated(e) => &e.handle,
            LinkFolioEvent::ProfileDeleted(e) => &e.handle,
            LinkFolioEvent::NoteLeft(e) => &e.handle,
            LinkFolioEvent::PostCreated(e) => &e.handle,
        }
    }
}

/// A decoded event together with where in the block it was emitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogTrigger {
    pub event: LinkFolioEvent,
    pub address: Address,
    pub log_index: u64,
    pub transaction_hash: Option<Hash>,
}

impl LogTrigger {
    /// A short description of where the trigger came from, for error
    /// messages
    pub fn error_context(&self) -> String {
        match &self.transaction_hash {
            Some(tx_hash) => format!(
                "{} (log {} in transaction {:x})",
                self.event.kind().name(),
                self.log_index,
                tx_hash
            ),
            None => format!("{} (log {})", self.event.kind().name(), self.log_index),
        }
    }
}

impl fmt::Display for LogTrigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error_context())
    }
}
