//! # Expandable Fields
//!
//! Provider responses carry fields that are either a bare object id or,
//! when the request asked for it, the full inlined object. [`Expandable`]
//! makes the two shapes explicit so callers must check before use.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// A field that is either a bare reference or the expanded object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    /// Bare object id (e.g. `in_1Q...`)
    Reference(String),
    /// Full inlined object
    Expanded(Box<T>),
}

impl<T> Expandable<T> {
    /// Check if the provider inlined the object
    pub fn is_expanded(&self) -> bool {
        matches!(self, Expandable::Expanded(_))
    }

    /// Get the expanded object, if present
    pub fn as_expanded(&self) -> Option<&T> {
        match self {
            Expandable::Expanded(obj) => Some(&**obj),
            Expandable::Reference(_) => None,
        }
    }

    /// Get the bare id, if this is only a reference
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Expandable::Reference(id) => Some(id),
            Expandable::Expanded(_) => None,
        }
    }

    /// Require the expanded object.
    ///
    /// `field` names the dotted path for the error message.
    pub fn expanded(&self, field: &str) -> PaymentResult<&T> {
        self.as_expanded()
            .ok_or_else(|| PaymentError::not_expanded(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    struct Thing {
        id: String,
        label: String,
    }

    #[test]
    fn test_deserialize_reference() {
        let field: Expandable<Thing> = serde_json::from_str(r#""th_123""#).unwrap();
        assert!(!field.is_expanded());
        assert_eq!(field.as_reference(), Some("th_123"));
        assert!(matches!(
            field.expanded("thing"),
            Err(PaymentError::NotExpanded { ref field }) if field == "thing"
        ));
    }

    #[test]
    fn test_deserialize_expanded() {
        let field: Expandable<Thing> =
            serde_json::from_str(r#"{"id": "th_123", "label": "full"}"#).unwrap();
        assert!(field.is_expanded());
        assert_eq!(field.as_reference(), None);
        assert_eq!(field.expanded("thing").unwrap().label, "full");
    }

    #[test]
    fn test_object_of_wrong_shape_is_rejected() {
        let result = serde_json::from_str::<Expandable<Thing>>(r#"{"unexpected": true}"#);
        assert!(result.is_err());
    }
}
