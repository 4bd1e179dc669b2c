//! Per-entity attribute storage.
//!
//! Values are `serde_json::Value`s; the engine stores and copies them but never
//! interprets them. Typed access deserializes on demand.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::error::{GraphError, GraphResult};

/// A typed attribute value.
pub type AttributeValue = serde_json::Value;

/// Attribute map in insertion order.
pub type Attributes = IndexMap<String, AttributeValue>;

/// Insert `key` only if it is not already present. Returns `true` on insert.
pub(crate) fn insert_new(attributes: &mut Attributes, key: &str, value: AttributeValue) -> bool {
    if attributes.contains_key(key) {
        return false;
    }
    attributes.insert(key.to_string(), value);
    true
}

/// Deserialize an optional attribute value into `T`.
pub(crate) fn decode<T: DeserializeOwned>(key: &str, value: Option<&AttributeValue>) -> GraphResult<T> {
    let value = value.ok_or_else(|| GraphError::AttributeNotFound { key: key.to_string() })?;
    serde_json::from_value(value.clone()).map_err(|source| GraphError::AttributeType {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_new_rejects_duplicate() {
        let mut attrs = Attributes::new();
        assert!(insert_new(&mut attrs, "name", json!("a")));
        assert!(!insert_new(&mut attrs, "name", json!("b")));
        assert_eq!(attrs["name"], json!("a"));
    }

    #[test]
    fn test_decode() {
        let value = json!(3);
        let n: u32 = decode("n", Some(&value)).unwrap();
        assert_eq!(n, 3);

        let err = decode::<u32>("n", None).unwrap_err();
        assert!(matches!(err, GraphError::AttributeNotFound { .. }));

        let text = json!("three");
        let err = decode::<u32>("n", Some(&text)).unwrap_err();
        assert!(matches!(err, GraphError::AttributeType { .. }));
    }
}
