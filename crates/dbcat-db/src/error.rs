//! Error types for catalog store operations.

use dbcat_config::ConfigError;
use dbcat_core::errors::CoreError;
use thiserror::Error;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A lookup by key or fully qualified name found nothing.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A resolve pattern matched more than one object.
    #[error("ambiguous {entity} pattern '{pattern}': {count} matches")]
    AmbiguousMatch {
        entity: &'static str,
        pattern: String,
        count: usize,
    },

    /// An insert collided with an existing object on its natural key.
    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    /// The operation ran outside a managed session of this catalog.
    #[error("no active session for this catalog")]
    NoActiveSession,

    /// A store failure aborted the session's unit of work; roll back before
    /// continuing.
    #[error("session aborted by an earlier store failure; roll back to continue")]
    SessionAborted,

    /// Caller-supplied input was rejected before reaching the store.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Schema migration failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// A stored value could not be turned back into a typed entity.
    #[error("failed to decode stored value: {0}")]
    Decode(String),

    /// Filesystem error while preparing an embedded store.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Underlying libSQL error.
    #[error("store error: {0}")]
    Store(#[from] libsql::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CatalogError {
    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Map a failed write to `Conflict` (unique key) or `NotFound` (missing
    /// parent), falling back to `Store`.
    pub(crate) fn from_write(err: libsql::Error, entity: &'static str, key: &str) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict {
                entity,
                key: key.to_string(),
            }
        } else if is_foreign_key_violation(&err) {
            Self::NotFound {
                entity: "parent",
                key: key.to_string(),
            }
        } else {
            Self::Store(err)
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Detect a UNIQUE or PRIMARY KEY violation.
///
/// libSQL does not expose extended result codes uniformly across local and
/// remote connections, so this matches on the message text.
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE constraint failed")
        || msg.contains("SQLITE_CONSTRAINT_UNIQUE")
        || msg.contains("SQLITE_CONSTRAINT_PRIMARYKEY")
}

/// Detect a FOREIGN KEY violation.
pub fn is_foreign_key_violation(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("FOREIGN KEY constraint failed") || msg.contains("SQLITE_CONSTRAINT_FOREIGNKEY")
}
