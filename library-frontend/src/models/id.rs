//! Canonical identifier for categories and documents.
//!
//! The catalog service emits numeric ids while selection controls hand back
//! strings. Both are parsed once into [`CatalogId`] so that `3` and `"3"`
//! compare equal everywhere downstream.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogId(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Repr {
    Numeric(i64),
    Opaque(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier must not be blank")]
pub struct IdParseError;

impl CatalogId {
    /// Parse an identifier from user or wire input.
    ///
    /// Integer-looking input (`"3"`, `" 03 "`) becomes numeric; anything else
    /// is kept as a trimmed opaque string.
    pub fn parse(raw: &str) -> Result<Self, IdParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdParseError);
        }

        Ok(match trimmed.parse::<i64>() {
            Ok(n) => Self(Repr::Numeric(n)),
            Err(_) => Self(Repr::Opaque(trimmed.to_string())),
        })
    }
}

impl From<i64> for CatalogId {
    fn from(value: i64) -> Self {
        Self(Repr::Numeric(value))
    }
}

impl FromStr for CatalogId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Numeric(n) => write!(f, "{}", n),
            Repr::Opaque(s) => f.write_str(s),
        }
    }
}

impl Serialize for CatalogId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Repr::Numeric(n) => serializer.serialize_i64(*n),
            Repr::Opaque(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for CatalogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(Self::from(n)),
            Wire::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_forms_are_equal() {
        assert_eq!(CatalogId::from(3), CatalogId::parse("3").unwrap());
        assert_eq!(CatalogId::from(3), CatalogId::parse(" 03 ").unwrap());
        assert_ne!(CatalogId::from(3), CatalogId::parse("3a").unwrap());
    }

    #[test]
    fn test_blank_is_rejected() {
        assert_eq!(CatalogId::parse("   "), Err(IdParseError));
    }

    #[test]
    fn test_wire_forms_normalize() {
        let ids: Vec<CatalogId> = serde_json::from_str(r#"[7, "7", "abc"]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2].to_string(), "abc");
        assert_ne!(ids[2], CatalogId::from(7));
    }

    #[test]
    fn test_numeric_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&vec![CatalogId::parse("10").unwrap()]).unwrap();
        assert_eq!(json, "[10]");
    }
}
