//! Cross-cutting error types for dbcat.
//!
//! Storage errors (`CatalogError`) live in `dbcat-db`, configuration errors in
//! `dbcat-config`. This module covers failures that can be detected from the
//! core types alone.

use thiserror::Error;

/// Errors raised while building or validating core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A `source_type` string did not name a supported source type.
    #[error("Unknown source type: {0}")]
    UnknownSourceType(String),

    /// Data failed validation (missing fields, unknown fields, bad shape).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A PII type with the same identifier is already registered.
    #[error("PII type '{0}' is already registered")]
    DuplicatePiiType(String),
}
