mod common;

use common::*;
use graph::prelude::*;
use graph::serde_json::json;
use linkfolio_chain_ethereum::LinkFolioEvent;
use linkfolio_core::query::{self, Page, ProfileSearch};
use pretty_assertions::assert_eq;

/// alice and carol belong to the owner, bob to the visitor. alice gets
/// notes in blocks 2 to 4 and a post in block 3.
fn indexed() -> Arc<InMemoryStore> {
    let store = store();
    let mut bob = profile_event(2, "bob", "Bob Builder", &[], &[]);
    bob.owner = visitor();
    bob.bio = "builds things".to_string();

    process(
        &store,
        vec![
            block(
                1,
                vec![
                    LinkFolioEvent::ProfileCreated(profile_event(
                        1,
                        "alice",
                        "Alice",
                        &["x", "github"],
                        &["http://x.com/alice", "http://github.com/alice"],
                    )),
                    LinkFolioEvent::ProfileCreated(bob),
                    created(3, "carol", "Carol"),
                ],
            ),
            block(2, vec![note(1, 1, visitor(), "alice", "first")]),
            block(
                3,
                vec![
                    note(1, 2, visitor(), "alice", "second"),
                    post(1, 1, "alice", "GM"),
                    note(2, 1, owner(), "bob", "hi bob"),
                ],
            ),
            block(4, vec![note(1, 3, visitor(), "alice", "third")]),
        ],
    );
    store
}

fn handles(search: ProfileSearch) -> Vec<String> {
    let store = indexed();
    query::profiles(store.as_ref(), &search)
        .unwrap()
        .into_iter()
        .map(|profile| profile.handle)
        .collect()
}

#[test]
fn list_profiles_by_id() {
    assert_eq!(vec!["alice", "bob", "carol"], handles(ProfileSearch::default()));
}

#[test]
fn search_is_case_insensitive() {
    let search = |text: &str| {
        handles(ProfileSearch {
            text: Some(text.to_string()),
            ..Default::default()
        })
    };

    assert_eq!(vec!["bob"], search("BUILD"));
    assert_eq!(vec!["carol"], search("caro"));
    assert_eq!(vec!["alice", "carol"], search("0ABC"));
    assert_eq!(Vec::<String>::new(), search("nobody"));
}

#[test]
fn filter_by_owner() {
    let search = ProfileSearch {
        owner: Some("0x0000000000000000000000000000000000000ABC".to_string()),
        ..Default::default()
    };
    assert_eq!(vec!["alice", "carol"], handles(search));

    let search = ProfileSearch {
        text: Some("car".to_string()),
        owner: Some("0x0000000000000000000000000000000000000abc".to_string()),
        ..Default::default()
    };
    assert_eq!(vec!["carol"], handles(search));
}

#[test]
fn order_and_paginate() {
    let search = ProfileSearch {
        order_by: Some("tokenId".to_string()),
        descending: true,
        ..Default::default()
    };
    assert_eq!(vec!["carol", "bob", "alice"], handles(search));

    let search = ProfileSearch {
        order_by: Some("name".to_string()),
        page: Page {
            first: Some(1),
            skip: 1,
        },
        ..Default::default()
    };
    assert_eq!(vec!["bob"], handles(search));
}

#[test]
fn profile_page_is_newest_first() {
    let store = indexed();
    let page = query::profile_page(store.as_ref(), "alice", Page::default(), Page::default())
        .unwrap()
        .unwrap();

    assert_eq!("alice", page.profile.handle);
    assert_eq!(
        vec!["third", "second", "first"],
        page.notes.iter().map(|note| note.content.as_str()).collect::<Vec<_>>()
    );
    assert_eq!(1, page.posts.len());
    assert_eq!("GM", page.posts[0].content);

    let page = query::profile_page(
        store.as_ref(),
        "alice",
        Page {
            first: Some(2),
            skip: 1,
        },
        Page::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        vec!["second", "first"],
        page.notes.iter().map(|note| note.content.as_str()).collect::<Vec<_>>()
    );

    assert!(
        query::profile_page(store.as_ref(), "dave", Page::default(), Page::default())
            .unwrap()
            .is_none()
    );
}

#[test]
fn user_with_profiles() {
    let store = indexed();
    let (user, profiles) = query::user(store.as_ref(), "0x0000000000000000000000000000000000000ABC")
        .unwrap()
        .unwrap();

    assert_eq!("0x0000000000000000000000000000000000000abc", user.id);
    assert_eq!(BigInt::from(timestamp(1)), user.created_at);
    assert_eq!(
        vec!["alice", "carol"],
        profiles.iter().map(|p| p.handle.as_str()).collect::<Vec<_>>()
    );
    assert!(query::user(store.as_ref(), "0x1234").unwrap().is_none());
}

#[test]
fn profile_json_has_link_map() {
    let store = indexed();
    let page = query::profile_page(store.as_ref(), "alice", Page::default(), Page::default())
        .unwrap()
        .unwrap();
    let json = page.to_json();

    assert_eq!(
        json!({ "x": "http://x.com/alice", "github": "http://github.com/alice" }),
        json["profile"]["linkMap"]
    );
    assert_eq!(json!(["x", "github"]), json["profile"]["linkKeys"]);
    assert_eq!(json!("1"), json["profile"]["tokenId"]);
    assert_eq!(
        json!("0x00000000000000000000000000000000000d00d5"),
        json["notes"][0]["author"]
    );
    assert_eq!(json!("GM"), json["posts"][0]["content"]);
}
