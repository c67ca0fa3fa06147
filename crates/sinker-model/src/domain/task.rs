use std::fmt;

use serde::{Deserialize, Serialize};

/// One configured ingestion pipeline (topic -> table) as listed by `/api/v1/tasks`.
///
/// Snapshot owned by the backend; the console never mutates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Task {
    pub name: String,
    pub cluster: String,
    pub table: String,
    pub topic: String,
    pub consumer_group: String,
    /// Absent when the backend omits `Type`.
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskType>,
    /// Absent when the backend omits `Status`; never matches a status filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Backlog of the upstream consumer group.
    pub lag: i64,
    /// Display string produced by the backend (e.g. `"1.2k/s"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_speed: Option<String>,
    /// Epoch milliseconds of the last backend update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<i64>,
}

/// Entity of `/api/v1/tasks`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TaskList {
    #[serde(deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,
    pub total: usize,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<Task>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Data shape handled by a task.
///
/// Unknown values are kept verbatim so they can still be displayed and filtered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    Metric,
    Log,
    Other(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::Metric => "metric",
            TaskType::Log => "log",
            TaskType::Other(raw) => raw,
        }
    }
}

impl From<String> for TaskType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "metric" => TaskType::Metric,
            "log" => TaskType::Log,
            _ => TaskType::Other(raw),
        }
    }
}

impl From<&str> for TaskType {
    fn from(raw: &str) -> Self {
        TaskType::from(raw.to_string())
    }
}

impl From<TaskType> for String {
    fn from(kind: TaskType) -> Self {
        match kind {
            TaskType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime state reported for a task.
///
/// Unknown values are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Running,
    Stopped,
    Error,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Error => "error",
            TaskStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "running" => TaskStatus::Running,
            "stopped" => TaskStatus::Stopped,
            "error" => TaskStatus::Error,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        TaskStatus::from(raw.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_backend_task() {
        let task: Task = serde_json::from_value(json!({
            "Name": "orders",
            "Cluster": "ck-main",
            "Table": "orders_local",
            "Topic": "orders",
            "ConsumerGroup": "sinker-orders",
            "Type": "log",
            "ColPolicy": "strict",
            "Status": "running",
            "Rate": 10,
            "Lag": 15000,
            "DbKey": {"a": null},
            "LastUpdate": 1700000000000i64
        }))
        .unwrap();

        assert_eq!(task.name, "orders");
        assert_eq!(task.kind, Some(TaskType::Log));
        assert_eq!(task.status, Some(TaskStatus::Running));
        assert_eq!(task.lag, 15000);
        assert_eq!(task.last_update, Some(1_700_000_000_000));
        assert_eq!(task.col_policy.as_deref(), Some("strict"));
        assert!(task.write_speed.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let task: Task = serde_json::from_value(json!({"Name": "bare"})).unwrap();
        assert_eq!(task.lag, 0);
        assert_eq!(task.cluster, "");
        assert!(task.last_update.is_none());
    }

    #[test]
    fn absent_type_and_status_stay_absent() {
        let task: Task = serde_json::from_value(json!({"Name": "bare", "Lag": 1})).unwrap();
        assert_eq!(task.kind, None);
        assert_eq!(task.status, None);

        let encoded = serde_json::to_value(&task).unwrap();
        assert!(encoded.get("Type").is_none());
        assert!(encoded.get("Status").is_none());
    }

    #[test]
    fn unknown_status_passes_through() {
        let status: TaskStatus = serde_json::from_value(json!("rebalancing")).unwrap();
        assert_eq!(status, TaskStatus::Other("rebalancing".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("rebalancing"));
    }

    #[test]
    fn known_type_serializes_as_raw_string() {
        assert_eq!(serde_json::to_value(TaskType::Metric).unwrap(), json!("metric"));
        assert_eq!(TaskType::from("custom").to_string(), "custom");
    }

    #[test]
    fn null_task_list_is_empty() {
        let list: TaskList = serde_json::from_value(json!({"Tasks": null, "Total": 0})).unwrap();
        assert!(list.tasks.is_empty());
    }
}
