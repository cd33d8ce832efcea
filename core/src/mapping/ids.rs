use graph::ethabi::Address;
use graph::prelude::BigInt;

/// The id of the `User` for `address`: lower-case hex with a `0x` prefix
pub fn user_id(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

/// Notes are unique per profile, note sequence number and author
pub fn note_id(token_id: &BigInt, note_id: &BigInt, author: &Address) -> String {
    format!("note_{}-{}-{}", token_id, note_id, user_id(author))
}

pub fn post_id(token_id: &BigInt, post_id: &BigInt) -> String {
    format!("post_{}-{}", token_id, post_id)
}
