use crate::domain::common::{EntityMetadata, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitAuthType {
    #[default]
    Public,
    Http,
    Ssh,
}

/// Git repository checked out on the backend, browsable as a file tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Git {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub auth_type: GitAuthType,
    #[serde(default)]
    pub username: String,
    /// Only sent when changed; the backend never returns it
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default)]
    pub current_branch: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: String,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Resource for Git {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }

    fn resource_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "gits"
    }

    fn element_key() -> &'static str {
        "git"
    }

    fn element_name() -> &'static str {
        "Git Repo"
    }

    fn list_name() -> &'static str {
        "Git Repos"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_url() {
        let git = Git {
            url: "https://github.com/crawlab-team/examples.git".into(),
            ..Default::default()
        };
        assert_eq!(git.display_name(), "https://github.com/crawlab-team/examples.git");
        assert!(serde_json::to_value(&git).unwrap().get("password").is_none());
    }
}
