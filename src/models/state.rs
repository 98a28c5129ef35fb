//! Persisted watcher state.

use serde::{Deserialize, Serialize};

/// The single durable record: fingerprint and title of the last observed newest entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StateRecord {
    /// Hex SHA-256 of `last_title`
    pub last_hash: String,

    pub last_title: String,
}

/// On-disk shape, tolerant of missing or null fields.
#[derive(Debug, Deserialize)]
struct StoredState {
    #[serde(default)]
    last_hash: Option<String>,
    #[serde(default)]
    last_title: Option<String>,
}

impl StateRecord {
    pub fn new(last_hash: impl Into<String>, last_title: impl Into<String>) -> Self {
        Self {
            last_hash: last_hash.into(),
            last_title: last_title.into(),
        }
    }

    /// Decode a stored record. A file without a `last_hash` value (absent or
    /// null) holds no state and yields `None`; an empty string is still state.
    pub fn from_stored_json(bytes: &[u8]) -> serde_json::Result<Option<Self>> {
        let stored: StoredState = serde_json::from_slice(bytes)?;
        Ok(stored.last_hash.map(|last_hash| Self {
            last_hash,
            last_title: stored.last_title.unwrap_or_default(),
        }))
    }

    /// Render as pretty-printed JSON with non-ASCII characters kept literal.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_json_keeps_non_ascii() {
        let record = StateRecord::new("abc", "Diumenge 1, 12h. Plaça de Sant Jaume");
        let json = record.to_pretty_json().unwrap();

        assert!(json.contains("Plaça de Sant Jaume"));
        assert!(!json.contains("\\u"));
        assert!(json.contains("\n  \"last_hash\": \"abc\""));
    }

    #[test]
    fn test_exactly_two_fields() {
        let value = serde_json::to_value(StateRecord::new("h", "t")).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("last_hash"));
        assert!(object.contains_key("last_title"));
    }

    #[test]
    fn test_stored_without_hash_is_no_state() {
        assert_eq!(StateRecord::from_stored_json(b"{}").unwrap(), None);
        assert_eq!(
            StateRecord::from_stored_json(br#"{"last_title": "x"}"#).unwrap(),
            None
        );
        assert_eq!(
            StateRecord::from_stored_json(br#"{"last_hash": null, "last_title": "x"}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_stored_empty_hash_is_state() {
        assert_eq!(
            StateRecord::from_stored_json(br#"{"last_hash": ""}"#).unwrap(),
            Some(StateRecord::default())
        );
    }

    #[test]
    fn test_stored_non_object_is_error() {
        assert!(StateRecord::from_stored_json(br#""just text""#).is_err());
    }
}
