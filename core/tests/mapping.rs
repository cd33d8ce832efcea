mod common;

use common::*;
use graph::prelude::*;
use linkfolio_chain_ethereum::LinkFolioEvent;
use linkfolio_core::entities::{Note, Post, Profile, User};
use linkfolio_core::mapping::{note_id, post_id};
use pretty_assertions::assert_eq;

const OWNER_ID: &str = "0x0000000000000000000000000000000000000abc";

#[test]
fn profile_created_creates_user_and_profile() {
    let store = store();
    process(&store, vec![block(1, vec![created(1, "alice", "Alice")])]);

    let user: User = load(&store, OWNER_ID).unwrap();
    assert_eq!(
        User {
            id: OWNER_ID.to_string(),
            address: OWNER_ID.to_string(),
            created_at: BigInt::from(timestamp(1)),
        },
        user
    );

    let profile: Profile = load(&store, "alice").unwrap();
    assert_eq!(BigInt::from(1u64), profile.token_id);
    assert_eq!("alice", profile.handle);
    assert_eq!(OWNER_ID, profile.owner);
    assert_eq!(profile.created_at, profile.updated_at);
    assert_eq!(BigInt::from(timestamp(1)), profile.created_at);
}

#[test]
fn user_is_created_only_once() {
    let store = store();
    process(
        &store,
        vec![
            block(1, vec![created(1, "alice", "Alice")]),
            block(2, vec![created(2, "alice2", "Alice again")]),
        ],
    );

    let user: User = load(&store, OWNER_ID).unwrap();
    assert_eq!(BigInt::from(timestamp(1)), user.created_at);
    assert_eq!(OWNER_ID, load::<Profile>(&store, "alice2").unwrap().owner);
}

#[test]
fn profile_updated_is_idempotent() {
    let once = store();
    let twice = store();
    let create = block(1, vec![created(1, "alice", "Alice")]);
    let update = block(2, vec![updated(1, "alice", "Alice B.")]);

    process(&once, vec![create.clone(), update.clone()]);
    process(&twice, vec![create, update.clone(), update]);

    let profile: Profile = load(&once, "alice").unwrap();
    assert_eq!("Alice B.", profile.name);
    assert_eq!(BigInt::from(timestamp(1)), profile.created_at);
    assert_eq!(BigInt::from(timestamp(2)), profile.updated_at);
    assert_eq!(profile, load::<Profile>(&twice, "alice").unwrap());
}

#[test]
fn update_before_create_recreates_profile() {
    let store = store();
    let event = profile_event(5, "ghost", "Ghost", &["x"], &["http://x.com/ghost"]);
    process(
        &store,
        vec![block(3, vec![LinkFolioEvent::ProfileUpdated(event)])],
    );

    let profile: Profile = load(&store, "ghost").unwrap();
    assert_eq!(
        Profile {
            id: "ghost".to_string(),
            token_id: BigInt::from(5u64),
            name: "Ghost".to_string(),
            handle: "ghost".to_string(),
            bio: "hi".to_string(),
            avatar: String::new(),
            owner: OWNER_ID.to_string(),
            link_keys: vec!["x".to_string()],
            links: vec!["http://x.com/ghost".to_string()],
            created_at: BigInt::from(timestamp(3)),
            updated_at: BigInt::from(timestamp(3)),
        },
        profile
    );
    // The recovery path does not create the owner
    assert_eq!(None, load::<User>(&store, OWNER_ID));
}

#[test]
fn delete_is_terminal_and_does_not_cascade() {
    let store = store();
    process(
        &store,
        vec![
            block(
                1,
                vec![
                    created(1, "alice", "Alice"),
                    note(1, 1, visitor(), "alice", "nice page"),
                    post(1, 1, "alice", "GM"),
                ],
            ),
            block(2, vec![deleted("alice")]),
            block(3, vec![deleted("alice"), deleted("never-existed")]),
        ],
    );

    assert_eq!(None, load::<Profile>(&store, "alice"));
    assert!(load::<User>(&store, OWNER_ID).is_some());

    let note_key = note_id(&BigInt::from(1u64), &BigInt::from(1u64), &visitor());
    assert!(load::<Note>(&store, &note_key).is_some());
    let post_key = post_id(&BigInt::from(1u64), &BigInt::from(1u64));
    assert!(load::<Post>(&store, &post_key).is_some());
}

#[test]
fn notes_are_keyed_by_token_note_and_author() {
    let store = store();
    process(
        &store,
        vec![
            block(
                1,
                vec![
                    note(1, 1, visitor(), "alice", "first"),
                    note(1, 1, owner(), "alice", "from the owner"),
                    note(1, 2, visitor(), "alice", "second"),
                ],
            ),
            block(2, vec![note(1, 1, visitor(), "alice", "first, edited")]),
        ],
    );

    assert_eq!(3, store.entity_count().unwrap());

    let key = note_id(&BigInt::from(1u64), &BigInt::from(1u64), &visitor());
    assert_eq!("note_1-1-0x00000000000000000000000000000000000d00d5", key);
    let note: Note = load(&store, &key).unwrap();
    assert_eq!("first, edited", note.content);
    assert_eq!("alice", note.to);
    assert_eq!(Bytes::from(visitor()), note.author);
    assert_eq!(BigInt::from(timestamp(2)), note.created_at);
}

#[test]
fn posts_are_authored_by_handle() {
    let store = store();
    process(&store, vec![block(1, vec![post(7, 3, "bob", "hello")])]);

    let post: Post = load(&store, "post_7-3").unwrap();
    assert_eq!("bob", post.author);
    assert_eq!("hello", post.content);
}

#[test]
fn profile_created_replaces_live_profile() {
    let store = store();
    let first = profile_event(1, "alice", "Alice", &["x", "github"], &["http://x", "http://gh"]);
    let second = profile_event(9, "alice", "Alice again", &[], &[]);
    process(
        &store,
        vec![
            block(1, vec![LinkFolioEvent::ProfileCreated(first)]),
            block(2, vec![LinkFolioEvent::ProfileCreated(second)]),
        ],
    );

    let profile: Profile = load(&store, "alice").unwrap();
    assert_eq!(BigInt::from(9u64), profile.token_id);
    assert_eq!("Alice again", profile.name);
    assert!(profile.link_keys.is_empty());
    assert!(profile.links.is_empty());
    assert_eq!(BigInt::from(timestamp(2)), profile.created_at);
    assert_eq!(BigInt::from(timestamp(2)), profile.updated_at);
    // The owner was already known and keeps its first sighting
    let user: User = load(&store, OWNER_ID).unwrap();
    assert_eq!(BigInt::from(timestamp(1)), user.created_at);
}

#[test]
fn links_keep_their_order() {
    let store = store();
    let event = profile_event(
        1,
        "alice",
        "Alice",
        &["x", "github"],
        &["http://x", "http://gh"],
    );
    process(
        &store,
        vec![block(1, vec![LinkFolioEvent::ProfileCreated(event)])],
    );

    let profile: Profile = load(&store, "alice").unwrap();
    assert_eq!(vec!["x", "github"], profile.link_keys);
    assert_eq!(vec!["http://x", "http://gh"], profile.links);
    assert_eq!(
        vec![("x", "http://x"), ("github", "http://gh")],
        profile.link_pairs().collect::<Vec<_>>()
    );
}

#[test]
fn alice_end_to_end() {
    let store = store();
    let event = profile_event(1, "alice", "Alice", &["x"], &["http://x.com/a"]);
    process(
        &store,
        vec![block(1, vec![LinkFolioEvent::ProfileCreated(event)])],
    );

    let user: User = load(&store, OWNER_ID).unwrap();
    assert_eq!(OWNER_ID, user.address);
    let profile: Profile = load(&store, "alice").unwrap();
    assert_eq!(BigInt::from(1u64), profile.token_id);
    assert_eq!(OWNER_ID, profile.owner);

    process(&store, vec![block(2, vec![deleted("alice")])]);
    assert_eq!(None, load::<Profile>(&store, "alice"));
}
