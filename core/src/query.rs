//! The queries the LinkFolio front-end runs against the indexed entities.

use graph::prelude::*;
use graph::serde_json::{self, json};

use crate::entities::{Note, Post, Profile, TypedEntity, User};

/// A page of results
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub first: Option<u32>,
    pub skip: u32,
}

impl From<Page> for EntityRange {
    fn from(page: Page) -> Self {
        EntityRange {
            first: page.first,
            skip: page.skip,
        }
    }
}

/// Parameters of the profile listing
#[derive(Clone, Debug, Default)]
pub struct ProfileSearch {
    /// Case-insensitive substring that has to appear in the profile's name,
    /// handle, bio or owner
    pub text: Option<String>,
    /// Only profiles owned by this address
    pub owner: Option<String>,
    pub order_by: Option<String>,
    pub descending: bool,
    pub page: Page,
}

impl ProfileSearch {
    fn filter(&self) -> Option<EntityFilter> {
        let text = self.text.as_ref().filter(|text| !text.is_empty()).map(|text| {
            EntityFilter::Or(
                ["name", "handle", "bio", "owner"]
                    .iter()
                    .map(|attr| EntityFilter::ContainsNoCase(attr.to_string(), text.into()))
                    .collect(),
            )
        });
        let owner = self
            .owner
            .as_ref()
            .map(|owner| EntityFilter::new_equal("owner", owner.to_lowercase()));

        match (text, owner) {
            (Some(text), owner) => Some(text.and_maybe(owner)),
            (None, owner) => owner,
        }
    }

    fn order(&self) -> EntityOrder {
        match (&self.order_by, self.descending) {
            (None, _) => EntityOrder::Default,
            (Some(attr), false) => EntityOrder::Ascending(attr.clone()),
            (Some(attr), true) => EntityOrder::Descending(attr.clone()),
        }
    }
}

fn find<T: TypedEntity>(store: &dyn QueryStore, query: EntityQuery) -> Result<Vec<T>, StoreError> {
    store
        .find(query)?
        .iter()
        .map(|entity| T::from_entity(entity).map_err(StoreError::from))
        .collect()
}

fn find_one<T: TypedEntity>(store: &dyn QueryStore, id: &str) -> Result<Option<T>, StoreError> {
    let query = EntityQuery::new(T::entity_type())
        .filter(EntityFilter::new_equal(ID, id))
        .first(1);
    Ok(find(store, query)?.into_iter().next())
}

/// Profiles matching `search`. Used for the home page search and the
/// "my profiles" view.
pub fn profiles(store: &dyn QueryStore, search: &ProfileSearch) -> Result<Vec<Profile>, StoreError> {
    let mut query = EntityQuery::new(Profile::entity_type())
        .order(search.order())
        .range(search.page.clone().into());
    if let Some(filter) = search.filter() {
        query = query.filter(filter);
    }
    find(store, query)
}

/// Everything the profile page shows: the profile, the notes left on it
/// and its posts, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfilePage {
    pub profile: Profile,
    pub notes: Vec<Note>,
    pub posts: Vec<Post>,
}

pub fn profile_page(
    store: &dyn QueryStore,
    handle: &str,
    notes: Page,
    posts: Page,
) -> Result<Option<ProfilePage>, StoreError> {
    let profile = match find_one::<Profile>(store, handle)? {
        Some(profile) => profile,
        None => return Ok(None),
    };

    let newest_first = EntityOrder::Descending("createdAt".to_string());
    let notes = find(
        store,
        EntityQuery::new(Note::entity_type())
            .filter(EntityFilter::new_equal("to", handle))
            .order(newest_first.clone())
            .range(notes.into()),
    )?;
    let posts = find(
        store,
        EntityQuery::new(Post::entity_type())
            .filter(EntityFilter::new_equal("author", handle))
            .order(newest_first)
            .range(posts.into()),
    )?;

    Ok(Some(ProfilePage {
        profile,
        notes,
        posts,
    }))
}

/// A user and the profiles they own
pub fn user(
    store: &dyn QueryStore,
    address: &str,
) -> Result<Option<(User, Vec<Profile>)>, StoreError> {
    let id = address.to_lowercase();
    let user = match find_one::<User>(store, &id)? {
        Some(user) => user,
        None => return Ok(None),
    };
    let search = ProfileSearch {
        owner: Some(id),
        ..Default::default()
    };
    let profiles = profiles(store, &search)?;
    Ok(Some((user, profiles)))
}

/// The JSON the front-end works with. Besides the stored fields, it carries
/// the links as a `key → url` object.
pub fn profile_json(profile: &Profile) -> serde_json::Value {
    let mut json = profile.to_entity().to_json();
    let links: serde_json::Map<String, serde_json::Value> = profile
        .link_pairs()
        .map(|(key, url)| (key.to_string(), json!(url)))
        .collect();
    json["linkMap"] = serde_json::Value::Object(links);
    json
}

impl ProfilePage {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "profile": profile_json(&self.profile),
            "notes": self.notes.iter().map(|note| note.to_entity().to_json()).collect::<Vec<_>>(),
            "posts": self.posts.iter().map(|post| post.to_entity().to_json()).collect::<Vec<_>>(),
        })
    }
}
