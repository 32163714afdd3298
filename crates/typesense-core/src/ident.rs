//! Composite identifiers for collection-scoped resources
//!
//! Documents and synonyms live inside a collection, so their identity is the
//! pair `<collection>.<name>`. [`CompositeId`] owns both halves and rejects
//! components that would make the rendered form ambiguous.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Separator between the collection half and the local half
pub const SEPARATOR: char = '.';

/// Identity of a resource scoped to a collection
///
/// Construction validates both components, so a held `CompositeId` always
/// round-trips through its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeId {
    collection: String,
    local: String,
}

impl CompositeId {
    /// Build an identifier from its two halves.
    ///
    /// Each half must be non-empty and must not contain the separator.
    pub fn new(collection: &str, local: &str) -> Result<Self> {
        validate_part(collection)?;
        validate_part(local)?;
        Ok(Self {
            collection: collection.to_string(),
            local: local.to_string(),
        })
    }

    /// Parse the rendered `<collection>.<name>` form.
    pub fn parse(id: &str) -> Result<Self> {
        let mut parts = id.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(collection), Some(local), None) if !collection.is_empty() && !local.is_empty() => {
                Ok(Self {
                    collection: collection.to_string(),
                    local: local.to_string(),
                })
            }
            _ => Err(Error::MalformedIdentifier { id: id.to_string() }),
        }
    }

    /// Collection half of the identifier.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Local half of the identifier, unique within the collection.
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.collection, SEPARATOR, self.local)
    }
}

impl FromStr for CompositeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Persisted as the rendered `<collection>.<name>` form.
impl Serialize for CompositeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CompositeId {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let rendered = String::deserialize(deserializer)?;
        Self::parse(&rendered).map_err(D::Error::custom)
    }
}

fn validate_part(part: &str) -> Result<()> {
    if part.is_empty() || part.contains(SEPARATOR) {
        return Err(Error::InvalidIdentifierPart {
            part: part.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_valid_parts() {
        let id = CompositeId::new("books", "isbn-123").unwrap();
        assert_eq!(id.collection(), "books");
        assert_eq!(id.local(), "isbn-123");
        assert_eq!(id.to_string(), "books.isbn-123");
    }

    #[test]
    fn new_rejects_empty_parts() {
        assert!(CompositeId::new("", "name").is_err());
        assert!(CompositeId::new("books", "").is_err());
    }

    #[test]
    fn new_rejects_separator_in_part() {
        let err = CompositeId::new("books", "a.b").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifierPart { .. }));
    }

    #[test]
    fn parse_round_trips_display() {
        let id = CompositeId::new("books", "war-and-peace").unwrap();
        let reparsed = CompositeId::parse(&id.to_string()).unwrap();
        assert_eq!(id, reparsed);
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        for bad in ["books", "a.b.c", "", ".name", "books.", "."] {
            let err = CompositeId::parse(bad).unwrap_err();
            assert!(matches!(err, Error::MalformedIdentifier { .. }), "{bad:?}");
        }
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let id: CompositeId = "books.moby-dick".parse().unwrap();
        assert_eq!(id.local(), "moby-dick");
    }

    #[test]
    fn serde_round_trips_through_the_rendered_form() {
        let id = CompositeId::new("books", "moby-dick").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""books.moby-dick""#);

        let back: CompositeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_malformed_input() {
        assert!(serde_json::from_str::<CompositeId>(r#""no-separator""#).is_err());
    }
}
