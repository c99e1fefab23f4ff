//! Fully-qualified names.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordered tuple of ancestor names from the source down to an entity.
///
/// A column's fqdn is `(source, schema, table, column)`. Displayed dot-joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Fqdn(Vec<String>);

impl Fqdn {
    #[must_use]
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Number of hierarchy levels (1 for a source, 4 for a column).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl<const N: usize> From<[&str; N]> for Fqdn {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_with_dots() {
        let fqdn = Fqdn::from(["test", "default", "page", "page_id"]);
        assert_eq!(fqdn.to_string(), "test.default.page.page_id");
        assert_eq!(fqdn.depth(), 4);
    }

    #[test]
    fn equality_is_by_parts() {
        assert_eq!(Fqdn::new(vec!["a".to_string(), "b".to_string()]), Fqdn::from(["a", "b"]));
        assert_ne!(Fqdn::from(["a", "b"]), Fqdn::from(["a.b"]));
    }
}
