//! Repository methods on [`Catalog`](crate::Catalog), one module per entity.
//!
//! Every method resolves the ambient session first and fails with
//! `CatalogError::NoActiveSession` outside one.

pub mod column;
pub mod job;
pub mod lineage;
pub mod schema;
pub mod search;
pub mod source;
pub mod table;
pub mod task;
