mod common;

use common::*;
use graph::ethabi::{Address, Token};
use graph::prelude::BigInt;
use linkfolio_chain_ethereum::{decode_log, EventKind, LinkFolioEvent, Log};

fn parse(line: serde_json::Value) -> Log {
    serde_json::from_value(line).unwrap()
}

#[test]
fn decodes_profile_created() {
    let log = parse(profile_log(
        EventKind::ProfileCreated,
        1,
        "alice",
        "Alice",
        &["x", "github"],
        &["http://x", "http://gh"],
        10,
        0,
    ));

    let event = match decode_log(&log).unwrap() {
        Some(LinkFolioEvent::ProfileCreated(event)) => event,
        other => panic!("unexpected decoding result {:?}", other),
    };
    assert_eq!(BigInt::from(1u64), event.token_id);
    assert_eq!(Address::from(OWNER), event.owner);
    assert_eq!("alice", event.handle);
    assert_eq!("Alice", event.name);
    assert_eq!("bio", event.bio);
    assert_eq!("ipfs://avatar", event.avatar);
    assert_eq!(vec!["x", "github"], event.link_keys);
    assert_eq!(vec!["http://x", "http://gh"], event.links);
}

#[test]
fn decodes_profile_updated_as_update() {
    let log = parse(profile_log(
        EventKind::ProfileUpdated,
        2,
        "bob",
        "Bob",
        &[],
        &[],
        10,
        0,
    ));
    assert!(matches!(
        decode_log(&log).unwrap(),
        Some(LinkFolioEvent::ProfileUpdated(event)) if event.handle == "bob" && event.links.is_empty()
    ));
}

#[test]
fn decodes_notes_posts_and_deletes() {
    let note = parse(note_log(1, 7, "alice", "hey alice", 11, 3));
    match decode_log(&note).unwrap() {
        Some(LinkFolioEvent::NoteLeft(note)) => {
            assert_eq!(BigInt::from(1u64), note.token_id);
            assert_eq!(BigInt::from(7u64), note.note_id);
            assert_eq!(Address::from(OWNER), note.author);
            assert_eq!("alice", note.handle);
            assert_eq!("hey alice", note.content);
        }
        other => panic!("unexpected decoding result {:?}", other),
    }

    let post = parse(post_log(1, 2, "alice", "GM", 11, 4));
    match decode_log(&post).unwrap() {
        Some(LinkFolioEvent::PostCreated(post)) => {
            assert_eq!(BigInt::from(2u64), post.post_id);
            assert_eq!("alice", post.handle);
            assert_eq!("GM", post.content);
        }
        other => panic!("unexpected decoding result {:?}", other),
    }

    let deleted = parse(profile_deleted_log("alice", 12, 0));
    match decode_log(&deleted).unwrap() {
        Some(LinkFolioEvent::ProfileDeleted(deleted)) => assert_eq!("alice", deleted.handle),
        other => panic!("unexpected decoding result {:?}", other),
    }
}

#[test]
fn missing_indexed_topic_is_an_error() {
    // A PostCreated log without its `postId` topic
    let log = parse(log_line(
        EventKind::PostCreated,
        vec![uint_topic(1)],
        vec![
            Token::String("alice".to_string()),
            Token::String("GM".to_string()),
        ],
        1,
        0,
    ));
    assert!(decode_log(&log).is_err());
}

#[test]
fn foreign_events_are_ignored() {
    let transfer = parse(raw_log_line(
        vec![graph::ethabi::Hash::repeat_byte(0xdd)],
        vec![],
        1,
        0,
    ));
    assert_eq!(None, decode_log(&transfer).unwrap());

    let no_topics = parse(raw_log_line(vec![], vec![], 1, 0));
    assert_eq!(None, decode_log(&no_topics).unwrap());
}
