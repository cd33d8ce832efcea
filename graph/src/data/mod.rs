/// Data types for dealing with storing entities.
pub mod store;
