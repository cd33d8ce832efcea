//! An entity store on top of `sled`, so that indexing can stop and pick up
//! where it left off.

mod store;

pub use store::{SledStore, SledStoreError};
