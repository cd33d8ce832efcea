use graph::prelude::*;
use linkfolio_chain_ethereum::{ProfileDeleted, ProfileEvent};

use super::{user_id, MappingContext, MappingError};
use crate::entities::{Profile, User};

/// Where a profile is in its lifecycle. A profile is created, updated any
/// number of times and finally deleted; events can arrive for a profile
/// that was never seen, so every event is accepted in every state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileState {
    Absent,
    Live(Profile),
}

impl ProfileState {
    pub fn load(ctx: &mut MappingContext, handle: &str) -> Result<Self, MappingError> {
        Ok(match ctx.load::<Profile>(handle)? {
            Some(profile) => ProfileState::Live(profile),
            None => ProfileState::Absent,
        })
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ProfileState::Live(_))
    }

    /// `ProfileCreated` writes a complete profile, whatever was there
    /// before.
    pub fn created(event: &ProfileEvent, timestamp: &BigInt) -> Profile {
        Profile {
            id: event.handle.clone(),
            token_id: event.token_id.clone(),
            name: event.name.clone(),
            handle: event.handle.clone(),
            bio: event.bio.clone(),
            avatar: event.avatar.clone(),
            owner: user_id(&event.owner),
            link_keys: event.link_keys.clone(),
            links: event.links.clone(),
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
        }
    }

    /// `ProfileUpdated` replaces the editable fields. If the profile was
    /// never created, the identifying fields come from the update and the
    /// profile counts as created now.
    pub fn updated(self, event: &ProfileEvent, timestamp: &BigInt) -> Profile {
        let mut profile = match self {
            ProfileState::Live(profile) => profile,
            ProfileState::Absent => Profile {
                id: event.handle.clone(),
                token_id: event.token_id.clone(),
                name: String::new(),
                handle: event.handle.clone(),
                bio: String::new(),
                avatar: String::new(),
                owner: user_id(&event.owner),
                link_keys: Vec::new(),
                links: Vec::new(),
                created_at: timestamp.clone(),
                updated_at: timestamp.clone(),
            },
        };

        profile.name = event.name.clone();
        profile.bio = event.bio.clone();
        profile.avatar = event.avatar.clone();
        profile.link_keys = event.link_keys.clone();
        profile.links = event.links.clone();
        profile.updated_at = timestamp.clone();
        profile
    }
}

pub fn handle_profile_created(
    ctx: &mut MappingContext,
    event: &ProfileEvent,
) -> Result<(), MappingError> {
    let timestamp = ctx.timestamp();
    let owner = user_id(&event.owner);

    if ctx.load::<User>(&owner)?.is_none() {
        debug!(ctx.logger(), "Creating user"; "user" => &owner);
        ctx.save(&User {
            id: owner.clone(),
            address: owner,
            created_at: timestamp.clone(),
        })?;
    }

    ctx.save(&ProfileState::created(event, &timestamp))
}

pub fn handle_profile_updated(
    ctx: &mut MappingContext,
    event: &ProfileEvent,
) -> Result<(), MappingError> {
    let timestamp = ctx.timestamp();
    let state = ProfileState::load(ctx, &event.handle)?;
    if !state.is_live() {
        info!(ctx.logger(), "Profile updated before it was created, recreating it";
            "handle" => &event.handle);
    }

    ctx.save(&state.updated(event, &timestamp))
}

pub fn handle_profile_deleted(
    ctx: &mut MappingContext,
    event: &ProfileDeleted,
) -> Result<(), MappingError> {
    match ProfileState::load(ctx, &event.handle)? {
        ProfileState::Live(profile) => ctx.remove::<Profile>(&profile.id),
        ProfileState::Absent => {
            debug!(ctx.logger(), "Ignoring deletion of unknown profile";
                "handle" => &event.handle);
        }
    }
    Ok(())
}
