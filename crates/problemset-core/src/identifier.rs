//! Lookup identifier for a single problem.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A problem is addressed either by its numeric id or by its slug.
///
/// Both resolve to the same record but go through different store lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Numeric(i64),
    Slug(String),
}

impl Identifier {
    /// Returns the numeric id, if this is one.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Identifier::Numeric(id) => Some(*id),
            Identifier::Slug(_) => None,
        }
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Identifier::Numeric(id)
    }
}

impl From<&str> for Identifier {
    fn from(slug: &str) -> Self {
        Identifier::Slug(slug.to_string())
    }
}

impl FromStr for Identifier {
    type Err = CoreError;

    /// All-digit segments are ids; anything else is a slug.
    ///
    /// ```
    /// use problemset_core::Identifier;
    ///
    /// assert_eq!("42".parse::<Identifier>().unwrap(), Identifier::Numeric(42));
    /// assert_eq!(
    ///     "two-sum".parse::<Identifier>().unwrap(),
    ///     Identifier::Slug("two-sum".to_string())
    /// );
    /// assert!("".parse::<Identifier>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CoreError::InvalidIdentifier(s.to_string()));
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<i64>()
                .map(Identifier::Numeric)
                .map_err(|_| CoreError::InvalidIdentifier(s.to_string()));
        }
        Ok(Identifier::Slug(s.to_string()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(id) => write!(f, "{}", id),
            Identifier::Slug(slug) => f.write_str(slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflowing_number_is_rejected() {
        let err = "99999999999999999999".parse::<Identifier>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["7", "valid-parentheses"] {
            let id: Identifier = raw.parse().unwrap();
            assert_eq!(id.to_string(), raw);
        }
    }

    #[test]
    fn test_as_id() {
        assert_eq!(Identifier::from(3).as_id(), Some(3));
        assert_eq!(Identifier::from("three").as_id(), None);
    }
}
