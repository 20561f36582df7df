use crate::domain::common::{EntityMetadata, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Offline,
    Online,
}

/// Worker or master node of the crawler cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub max_runners: u32,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Resource for Node {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn resource_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "nodes"
    }

    fn element_key() -> &'static str {
        "node"
    }

    fn element_name() -> &'static str {
        "Node"
    }

    fn list_name() -> &'static str {
        "Nodes"
    }
}
