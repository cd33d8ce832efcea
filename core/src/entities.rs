//! Typed views of the entities in `schema.graphql`.

use graph::prelude::*;

/// An entity type from `schema.graphql` with a Rust struct for it
pub trait TypedEntity: Sized {
    const TYPE: &'static str;

    fn entity_type() -> EntityType {
        EntityType::new(Self::TYPE)
    }

    fn key_for(id: &str) -> EntityKey {
        Self::entity_type().key(id)
    }

    fn id(&self) -> &str;

    fn key(&self) -> EntityKey {
        Self::key_for(self.id())
    }

    fn to_entity(&self) -> Entity;

    fn from_entity(entity: &Entity) -> Result<Self, Error>;
}

/// An account that owns at least one profile. The id is the lower-cased,
/// `0x`-prefixed address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub address: String,
    pub created_at: BigInt,
}

impl TypedEntity for User {
    const TYPE: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_entity(&self) -> Entity {
        entity! {
            id: &self.id,
            address: &self.address,
            createdAt: self.created_at.clone(),
        }
    }

    fn from_entity(entity: &Entity) -> Result<Self, Error> {
        Ok(User {
            id: entity.get_required("id")?,
            address: entity.get_required("address")?,
            created_at: entity.get_required("createdAt")?,
        })
    }
}

/// A profile, keyed by its handle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub token_id: BigInt,
    pub name: String,
    pub handle: String,
    pub bio: String,
    pub avatar: String,
    /// The id of the owning `User`
    pub owner: String,
    pub link_keys: Vec<String>,
    pub links: Vec<String>,
    pub created_at: BigInt,
    pub updated_at: BigInt,
}

impl Profile {
    /// The links as `(key, url)` pairs, matched up by position. Extra
    /// entries in the longer of the two lists have no partner and are
    /// left out.
    pub fn link_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.link_keys
            .iter()
            .zip(self.links.iter())
            .map(|(key, url)| (key.as_str(), url.as_str()))
    }
}

impl TypedEntity for Profile {
    const TYPE: &'static str = "Profile";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_entity(&self) -> Entity {
        entity! {
            id: &self.id,
            tokenId: self.token_id.clone(),
            name: &self.name,
            handle: &self.handle,
            bio: &self.bio,
            avatar: &self.avatar,
            owner: &self.owner,
            linkKeys: self.link_keys.clone(),
            links: self.links.clone(),
            createdAt: self.created_at.clone(),
            updatedAt: self.updated_at.clone(),
        }
    }

    fn from_entity(entity: &Entity) -> Result<Self, Error> {
        Ok(Profile {
            id: entity.get_required("id")?,
            token_id: entity.get_required("tokenId")?,
            name: entity.get_required("name")?,
            handle: entity.get_required("handle")?,
            bio: entity.get_required("bio")?,
            avatar: entity.get_required("avatar")?,
            owner: entity.get_required("owner")?,
            link_keys: entity.get_required("linkKeys")?,
            links: entity.get_required("links")?,
            created_at: entity.get_required("createdAt")?,
            updated_at: entity.get_required("updatedAt")?,
        })
    }
}

/// A note a visitor left on a profile. `author` is the visitor's raw
/// address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    /// Handle of the profile the note is on
    pub to: String,
    pub content: String,
    pub author: Bytes,
    pub created_at: BigInt,
}

impl TypedEntity for Note {
    const TYPE: &'static str = "Note";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_entity(&self) -> Entity {
        entity! {
            id: &self.id,
            to: &self.to,
            content: &self.content,
            author: self.author.clone(),
            createdAt: self.created_at.clone(),
        }
    }

    fn from_entity(entity: &Entity) -> Result<Self, Error> {
        Ok(Note {
            id: entity.get_required("id")?,
            to: entity.get_required("to")?,
            content: entity.get_required("content")?,
            author: entity.get_required("author")?,
            created_at: entity.get_required("createdAt")?,
        })
    }
}

/// A post by a profile owner. Unlike `Note`, `author` is the handle of the
/// posting profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author: String,
    pub created_at: BigInt,
}

impl TypedEntity for Post {
    const TYPE: &'static str = "Post";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_entity(&self) -> Entity {
        entity! {
            id: &self.id,
            content: &self.content,
            author: &self.author,
            createdAt: self.created_at.clone(),
        }
    }

    fn from_entity(entity: &Entity) -> Result<Self, Error> {
        Ok(Post {
            id: entity.get_required("id")?,
            content: entity.get_required("content")?,
            author: entity.get_required("author")?,
            created_at: entity.get_required("createdAt")?,
        })
    }
}
