pub mod index;
pub mod query;
