use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit fields the backend stamps on every stored record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl EntityMetadata {
    /// Last modification of the record (its creation if it was never updated)
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_ts.or(self.created_ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_modified_prefers_update() {
        let created = "2024-03-15T14:02:26Z".parse::<DateTime<Utc>>().unwrap();
        let updated = "2024-03-16T09:00:00Z".parse::<DateTime<Utc>>().unwrap();

        let mut meta = EntityMetadata {
            created_ts: Some(created),
            ..Default::default()
        };
        assert_eq!(meta.last_modified(), Some(created));

        meta.updated_ts = Some(updated);
        assert_eq!(meta.last_modified(), Some(updated));
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let meta: EntityMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, EntityMetadata::default());
    }
}
