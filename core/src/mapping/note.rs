use linkfolio_chain_ethereum::NoteLeft;

use super::{note_id, MappingContext, MappingError};
use crate::entities::Note;

/// Write the note. A note with the same token id, note id and author
/// replaces the existing one.
pub fn handle_note_left(ctx: &mut MappingContext, event: &NoteLeft) -> Result<(), MappingError> {
    let note = Note {
        id: note_id(&event.token_id, &event.note_id, &event.author),
        to: event.handle.clone(),
        content: event.content.clone(),
        author: event.author.into(),
        created_at: ctx.timestamp(),
    };
    ctx.save(&note)
}
