use graph::ethabi::{Contract, Event, Hash};
use lazy_static::lazy_static;

const LINKFOLIO_ABI: &str = include_str!("../abis/LinkFolio.json");

lazy_static! {
    /// The events of the LinkFolio contract
    pub static ref CONTRACT: Contract =
        Contract::load(LINKFOLIO_ABI.as_bytes()).expect("abis/LinkFolio.json is a valid ABI");
}

/// The LinkFolio events the mappings handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    ProfileCreated,
    ProfileUpdated,
    ProfileDeleted,
    NoteLeft,
    PostCreated,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::ProfileCreated,
        EventKind::ProfileUpdated,
        EventKind::ProfileDeleted,
        EventKind::NoteLeft,
        EventKind::PostCreated,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::ProfileCreated => "ProfileCreated",
            EventKind::ProfileUpdated => "ProfileUpdated",
            EventKind::ProfileDeleted => "ProfileDeleted",
            EventKind::NoteLeft => "NoteLeft",
            EventKind::PostCreated => "PostCreated",
        }
    }

    /// The ABI definition of the event. Every kind is in the bundled ABI.
    pub fn event(&self) -> &'static Event {
        CONTRACT
            .event(self.name())
            .expect("every event kind is declared in abis/LinkFolio.json")
    }

    /// The keccak hash of the event signature, i.e., `topic0` of its logs
    pub fn signature(&self) -> Hash {
        self.event().signature()
    }

    /// Find the event kind whose signature is `topic0`
    pub fn from_topic0(topic0: &Hash) -> Option<EventKind> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| &kind.signature() == topic0)
    }
}
