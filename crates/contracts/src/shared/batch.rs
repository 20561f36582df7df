use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the `/batch` endpoints
///
/// `data` is a JSON *string*, not a nested object: the backend decodes it
/// separately and applies only the listed `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl BatchRequest {
    pub fn ids(ids: Vec<String>) -> Self {
        Self {
            ids,
            ..Default::default()
        }
    }

    pub fn update(ids: Vec<String>, patch: &Value, fields: Vec<String>) -> Self {
        Self {
            ids,
            data: Some(patch.to_string()),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_serializes_patch_as_string() {
        let req = BatchRequest::update(
            vec!["a".into(), "b".into()],
            &json!({"priority": 3}),
            vec!["priority".into()],
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["data"], json!(r#"{"priority":3}"#));
        assert_eq!(value["fields"], json!(["priority"]));
    }

    #[test]
    fn test_delete_body_has_only_ids() {
        let value = serde_json::to_value(BatchRequest::ids(vec!["a".into()])).unwrap();
        assert_eq!(value, json!({"ids": ["a"]}));
    }
}
