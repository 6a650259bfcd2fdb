use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One persisted knowledge record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Unique identifier, also the key of the entry in the persisted map
    pub id: String,
    /// When the entry was created
    pub timestamp: DateTime<Utc>,
    /// Coarse grouping, e.g. "interaction" or "manual"
    pub category: String,
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl KnowledgeEntry {
    /// Create a new entry with a fresh id and the current time
    pub fn new(
        category: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        metadata: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            category: category.into(),
            key: key.into(),
            value: value.into(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_for_rapid_creation() {
        let a = KnowledgeEntry::new("c", "k", "v", None);
        let b = KnowledgeEntry::new("c", "k", "v", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn metadata_is_omitted_when_absent() {
        let entry = KnowledgeEntry::new("c", "k", "v", None);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn reads_offset_timestamps() {
        let json = r#"{"id":"20240101120000-a","timestamp":"2024-01-01T12:00:00+01:00","category":"manual","key":"serveur","value":"nginx"}"#;
        let entry: KnowledgeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.timestamp.to_rfc3339(), "2024-01-01T11:00:00+00:00");
        assert_eq!(entry.metadata, None);
    }
}
