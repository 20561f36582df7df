use crate::domain::common::{EntityMetadata, Resource};
use serde::{Deserialize, Serialize};

/// How the backend picks nodes when a spider is run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    #[default]
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "all-nodes")]
    AllNodes,
    #[serde(rename = "selected-nodes")]
    SelectedNodes,
}

impl RunMode {
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Random => "Random node",
            RunMode::AllNodes => "All nodes",
            RunMode::SelectedNodes => "Selected nodes",
        }
    }
}

/// Spider: a crawler project whose code lives in a remote file tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spider {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub param: String,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub priority: i32,
    /// Result collection name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_root_path: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Resource for Spider {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn resource_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "spiders"
    }

    fn element_key() -> &'static str {
        "spider"
    }

    fn element_name() -> &'static str {
        "Spider"
    }

    fn list_name() -> &'static str {
        "Spiders"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spider_wire_format() {
        let json = r#"{"_id":"65f0c1","name":"quotes","cmd":"scrapy crawl quotes","mode":"all-nodes","created_ts":"2024-03-15T14:02:26Z"}"#;
        let spider: Spider = serde_json::from_str(json).unwrap();

        assert_eq!(spider.id(), Some("65f0c1"));
        assert_eq!(spider.mode, RunMode::AllNodes);
        assert!(spider.metadata.created_ts.is_some());
        assert_eq!(Spider::endpoint(), "/spiders");
        assert_eq!(Spider::full_name(), "a001_spider");
    }

    #[test]
    fn test_new_spider_omits_id() {
        let spider = Spider {
            name: "quotes".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&spider).unwrap();
        assert!(value.get("_id").is_none());
        assert_eq!(value["mode"], "random");
    }
}
