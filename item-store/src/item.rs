//! The `Item` type: a single key/value state fact

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single key/value state fact about a device
///
/// Keys are namespaced strings (e.g. a status key, a setting key, or the
/// `connected` sentinel). Values are arbitrary JSON, since items carry
/// heterogeneous facts (enum strings, booleans, numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Namespaced item key
    pub key: String,
    /// Most recent value for the key
    pub value: Value,
}

impl Item {
    /// Create a new item
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_roundtrip() {
        let item = Item::new("BSH.Common.Setting.PowerState", json!("On"));
        let encoded = serde_json::to_string(&item).unwrap();
        let decoded: Item = serde_json::from_str(&encoded).unwrap();
        assert_eq!(item, decoded);
    }
}
