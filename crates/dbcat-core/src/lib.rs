//! # dbcat-core
//!
//! Core types shared across all dbcat crates:
//! - Entity structs for the catalog hierarchy (source, schema, table, column)
//!   and for lineage bookkeeping (jobs, executions, edges, tasks)
//! - Enums for source types and execution status
//! - Typed connection attributes, one struct per source type
//! - Fully-qualified names
//! - The PII type registry
//! - Cross-cutting error types

pub mod connection;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod fqdn;
pub mod pii;
