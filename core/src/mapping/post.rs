use linkfolio_chain_ethereum::PostCreated;

use super::{post_id, MappingContext, MappingError};
use crate::entities::Post;

pub fn handle_post_created(
    ctx: &mut MappingContext,
    event: &PostCreated,
) -> Result<(), MappingError> {
    let post = Post {
        id: post_id(&event.token_id, &event.post_id),
        content: event.content.clone(),
        author: event.handle.clone(),
        created_at: ctx.timestamp(),
    };
    ctx.save(&post)
}
