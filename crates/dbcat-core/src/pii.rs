//! PII classification tags and the registry that resolves them.
//!
//! A PII type is a plain value: a display `name` plus a stable `type`
//! identifier. The identifier is what gets stored on a column; reading it
//! back goes through a [`PiiRegistry`], so applications can register their
//! own classifications next to the built-in ones.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A sensitive-data classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PiiType {
    /// Human-readable name, e.g. `"Phone"`.
    pub name: String,
    /// Stable identifier persisted in the catalog, e.g. `"phone"`.
    #[serde(rename = "type")]
    pub type_id: String,
}

impl PiiType {
    #[must_use]
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
        }
    }
}

const BUILTINS: &[(&str, &str)] = &[
    ("Phone", "phone"),
    ("Email", "email"),
    ("CreditCard", "credit_card"),
    ("Address", "address"),
    ("Person", "person"),
    ("BirthDate", "birth_date"),
    ("Gender", "gender"),
    ("Nationality", "nationality"),
    ("IPAddress", "ip_address"),
    ("SSN", "ssn"),
    ("UserName", "user_name"),
    ("Password", "password"),
];

/// Lookup table from stored identifier to [`PiiType`].
#[derive(Debug, Clone)]
pub struct PiiRegistry {
    types: BTreeMap<String, PiiType>,
}

impl PiiRegistry {
    /// Empty registry; nothing resolves until types are registered.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Registry pre-populated with the built-in classifications.
    #[must_use]
    pub fn with_builtins() -> Self {
        let types = BUILTINS
            .iter()
            .map(|(name, id)| ((*id).to_string(), PiiType::new(*name, *id)))
            .collect();
        Self { types }
    }

    /// Add a classification.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DuplicatePiiType` if the identifier is taken, or
    /// `CoreError::Validation` if it is empty.
    pub fn register(&mut self, pii_type: PiiType) -> Result<(), CoreError> {
        if pii_type.type_id.is_empty() {
            return Err(CoreError::Validation("PII type identifier is empty".into()));
        }
        if self.types.contains_key(&pii_type.type_id) {
            return Err(CoreError::DuplicatePiiType(pii_type.type_id));
        }
        self.types.insert(pii_type.type_id.clone(), pii_type);
        Ok(())
    }

    #[must_use]
    pub fn resolve(&self, type_id: &str) -> Option<&PiiType> {
        self.types.get(type_id)
    }

    /// True if `pii_type` is registered with exactly this name and identifier.
    #[must_use]
    pub fn contains(&self, pii_type: &PiiType) -> bool {
        self.resolve(&pii_type.type_id) == Some(pii_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PiiType> {
        self.types.values()
    }
}

impl Default for PiiRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
