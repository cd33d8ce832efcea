#![allow(dead_code)]

use graph::ethabi::{self, Address, Hash, Token};
use hex_literal::hex;
use linkfolio_chain_ethereum::EventKind;
use serde_json::{json, Value};

pub const CONTRACT: [u8; 20] = hex!("5fbdb2315678afecb367f032d93f642f64180aa3");
pub const OWNER: [u8; 20] = hex!("0000000000000000000000000000000000000abc");

pub fn uint_topic(n: u64) -> Hash {
    Hash::from_low_u64_be(n)
}

pub fn address_topic(address: Address) -> Hash {
    let mut bytes = [0u8; 32];
    bytes[12..].copy_from_slice(address.as_bytes());
    Hash::from(bytes)
}

fn strings(items: &[&str]) -> Token {
    Token::Array(items.iter().map(|s| Token::String(s.to_string())).collect())
}

fn block_hash(block: u64) -> String {
    format!("0x{:064x}", block)
}

/// A log line in the format the block stream reads
pub fn log_line(
    kind: EventKind,
    indexed: Vec<Hash>,
    data: Vec<Token>,
    block: u64,
    log_index: u64,
) -> Value {
    let mut topics = vec![kind.signature()];
    topics.extend(indexed);
    raw_log_line(topics, ethabi::encode(&data), block, log_index)
}

pub fn raw_log_line(topics: Vec<Hash>, data: Vec<u8>, block: u64, log_index: u64) -> Value {
    json!({
        "address": format!("0x{}", hex::encode(CONTRACT)),
        "topics": topics.iter().map(|t| format!("0x{}", hex::encode(t.as_bytes()))).collect::<Vec<_>>(),
        "data": format!("0x{}", hex::encode(data)),
        "blockNumber": format!("0x{:x}", block),
        "blockHash": block_hash(block),
        "blockTimestamp": 1_700_000_000 + block * 12,
        "logIndex": log_index,
        "transactionHash": format!("0x{:064x}", block * 1000 + log_index),
    })
}

#[allow(clippy::too_many_arguments)]
pub fn profile_log(
    kind: EventKind,
    token_id: u64,
    handle: &str,
    name: &str,
    link_keys: &[&str],
    links: &[&str],
    block: u64,
    log_index: u64,
) -> Value {
    log_line(
        kind,
        vec![uint_topic(token_id), address_topic(Address::from(OWNER))],
        vec![
            Token::String(handle.to_string()),
            Token::String(name.to_string()),
            Token::String("bio".to_string()),
            Token::String("ipfs://avatar".to_string()),
            strings(link_keys),
            strings(links),
        ],
        block,
        log_index,
    )
}

pub fn profile_deleted_log(handle: &str, block: u64, log_index: u64) -> Value {
    log_line(
        EventKind::ProfileDeleted,
        vec![],
        vec![Token::String(handle.to_string())],
        block,
        log_index,
    )
}

pub fn note_log(token_id: u64, note_id: u64, handle: &str, content: &str, block: u64, log_index: u64) -> Value {
    log_line(
        EventKind::NoteLeft,
        vec![
            uint_topic(token_id),
            uint_topic(note_id),
            address_topic(Address::from(OWNER)),
        ],
        vec![
            Token::String(handle.to_string()),
            Token::String(content.to_string()),
        ],
        block,
        log_index,
    )
}

pub fn post_log(token_id: u64, post_id: u64, handle: &str, content: &str, block: u64, log_index: u64) -> Value {
    log_line(
        EventKind::PostCreated,
        vec![uint_topic(token_id), uint_topic(post_id)],
        vec![
            Token::String(handle.to_string()),
            Token::String(content.to_string()),
        ],
        block,
        log_index,
    )
}

pub fn jsonl(lines: &[Value]) -> String {
    lines
        .iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
