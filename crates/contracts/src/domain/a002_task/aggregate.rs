use crate::domain::a001_spider::aggregate::RunMode;
use crate::domain::common::{EntityMetadata, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Assigned,
    Running,
    Finished,
    Error,
    Cancelled,
    Abnormal,
}

impl TaskStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            TaskStatus::Finished | TaskStatus::Error | TaskStatus::Cancelled | TaskStatus::Abnormal
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Assigned => "Assigned",
            TaskStatus::Running => "Running",
            TaskStatus::Finished => "Finished",
            TaskStatus::Error => "Error",
            TaskStatus::Cancelled => "Cancelled",
            TaskStatus::Abnormal => "Abnormal",
        }
    }
}

/// One execution of a spider on a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub spider_id: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub param: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub pid: i64,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Resource for Task {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    fn resource_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "tasks"
    }

    fn element_key() -> &'static str {
        "task"
    }

    fn element_name() -> &'static str {
        "Task"
    }

    fn list_name() -> &'static str {
        "Tasks"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status() {
        let task: Task = serde_json::from_str(r#"{"_id":"t1","spider_id":"s1","status":"cancelled"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Cancelled);
        assert!(task.status.is_finished());
        assert!(!TaskStatus::Running.is_finished());
    }
}
