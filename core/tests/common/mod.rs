#![allow(dead_code)]

use std::sync::Arc;

use graph::ethabi::Address;
use graph::futures03::stream;
use graph::log::discard;
use graph::prelude::*;
use hex_literal::hex;
use linkfolio_chain_ethereum::{
    LinkFolioEvent, LogTrigger, NoteLeft, PostCreated, ProfileDeleted, ProfileEvent,
};
use linkfolio_core::entities::TypedEntity;
use linkfolio_core::IndexingRunner;

/// Written as `0xABC` in the contract's events; mixed case on purpose
pub const OWNER: [u8; 20] = hex!("0000000000000000000000000000000000000ABC");
pub const VISITOR: [u8; 20] = hex!("00000000000000000000000000000000000D00D5");

pub fn owner() -> Address {
    Address::from(OWNER)
}

pub fn visitor() -> Address {
    Address::from(VISITOR)
}

pub fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new(linkfolio_core::input_schema().unwrap()))
}

pub fn runner(store: &Arc<InMemoryStore>) -> IndexingRunner<InMemoryStore> {
    IndexingRunner::new(store.clone(), discard())
}

pub fn timestamp(block: BlockNumber) -> BlockTime {
    1_700_000_000 + block as u64 * 12
}

pub fn block(number: BlockNumber, events: Vec<LinkFolioEvent>) -> BlockWithTriggers<LogTrigger> {
    let triggers = events
        .into_iter()
        .enumerate()
        .map(|(i, event)| LogTrigger {
            event,
            address: Address::zero(),
            log_index: i as u64,
            transaction_hash: None,
        })
        .collect();
    let hash = graph::ethabi::Hash::from_low_u64_be(number as u64);
    BlockWithTriggers::new((hash, number).into(), timestamp(number), triggers)
}

pub fn stream_of(blocks: Vec<BlockWithTriggers<LogTrigger>>) -> BlockStream<LogTrigger> {
    Box::pin(stream::iter(blocks.into_iter().map(Ok)))
}

pub fn profile_event(
    token_id: u64,
    handle: &str,
    name: &str,
    link_keys: &[&str],
    links: &[&str],
) -> ProfileEvent {
    ProfileEvent {
        token_id: BigInt::from(token_id),
        owner: owner(),
        handle: handle.to_string(),
        name: name.to_string(),
        bio: "hi".to_string(),
        avatar: String::new(),
        link_keys: link_keys.iter().map(|s| s.to_string()).collect(),
        links: links.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn created(token_id: u64, handle: &str, name: &str) -> LinkFolioEvent {
    LinkFolioEvent::ProfileCreated(profile_event(token_id, handle, name, &[], &[]))
}

pub fn updated(token_id: u64, handle: &str, name: &str) -> LinkFolioEvent {
    LinkFolioEvent::ProfileUpdated(profile_event(token_id, handle, name, &[], &[]))
}

pub fn deleted(handle: &str) -> LinkFolioEvent {
    LinkFolioEvent::ProfileDeleted(ProfileDeleted {
        handle: handle.to_string(),
    })
}

pub fn note(token_id: u64, note_id: u64, author: Address, handle: &str, content: &str) -> LinkFolioEvent {
    LinkFolioEvent::NoteLeft(NoteLeft {
        token_id: BigInt::from(token_id),
        note_id: BigInt::from(note_id),
        author,
        handle: handle.to_string(),
        content: content.to_string(),
    })
}

pub fn post(token_id: u64, post_id: u64, handle: &str, content: &str) -> LinkFolioEvent {
    LinkFolioEvent::PostCreated(PostCreated {
        token_id: BigInt::from(token_id),
        post_id: BigInt::from(post_id),
        handle: handle.to_string(),
        content: content.to_string(),
    })
}

pub fn load<T: TypedEntity>(store: &InMemoryStore, id: &str) -> Option<T> {
    store
        .get(&T::key_for(id))
        .unwrap()
        .map(|entity| T::from_entity(&entity).unwrap())
}

/// Process each of `blocks` in order, failing the test on any error
pub fn process(store: &Arc<InMemoryStore>, blocks: Vec<BlockWithTriggers<LogTrigger>>) {
    let runner = runner(store);
    for block in blocks {
        runner.process_block(block).unwrap();
    }
}
