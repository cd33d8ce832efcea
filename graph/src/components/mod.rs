//! The indexer is internally structured as a set of components, each with a
//! corresponding trait defining its interface.
//!
//! At the lowest layer sit the stores that hold entities; the mapping layer
//! writes to them through an `EntityCache` and the query layer reads from
//! them through `QueryStore`.
//!
//! A request/response interaction between C1 and C2 is made by C1 requiring an
//! `Arc<C2>` in its constructor and then calling the functions defined on C2.

/// Components dealing with storing entities.
pub mod store;
