use graph::prelude::*;
use graph::serde_json;
use linkfolio_core::entities::TypedEntity;
use linkfolio_core::query::{self, Page, ProfileSearch};

use crate::opt::{OrderDirection, QueryCommand};

pub fn run(store: &dyn QueryStore, cmd: QueryCommand) -> Result<(), Error> {
    let json = match cmd {
        QueryCommand::Profiles {
            search,
            owner,
            first,
            skip,
            order_by,
            order_direction,
        } => {
            let search = ProfileSearch {
                text: search,
                owner,
                order_by,
                descending: order_direction == OrderDirection::Desc,
                page: Page { first, skip },
            };
            profiles(store, &search)?
        }
        QueryCommand::Profile {
            handle,
            notes_first,
            posts_first,
        } => {
            let notes = Page {
                first: notes_first,
                skip: 0,
            };
            let posts = Page {
                first: posts_first,
                skip: 0,
            };
            match query::profile_page(store, &handle, notes, posts)? {
                Some(page) => page.to_json(),
                None => bail!("no profile with handle `{}`", handle),
            }
        }
        QueryCommand::User { address } => user(store, &address)?,
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn profiles(store: &dyn QueryStore, search: &ProfileSearch) -> Result<serde_json::Value, Error> {
    let profiles = query::profiles(store, search)?;
    Ok(serde_json::Value::Array(
        profiles.iter().map(query::profile_json).collect(),
    ))
}

fn user(store: &dyn QueryStore, address: &str) -> Result<serde_json::Value, Error> {
    match query::user(store, address)? {
        Some((user, profiles)) => {
            let mut json = user.to_entity().to_json();
            json["profiles"] = profiles.iter().map(query::profile_json).collect();
            Ok(json)
        }
        None => Err(anyhow!("no user with address `{}`", address)),
    }
}
