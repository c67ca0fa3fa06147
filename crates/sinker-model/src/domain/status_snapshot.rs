use serde::{Deserialize, Serialize};

use super::TaskStatus;

/// Live status of one task, served by `/api/v1/tasks/{name}/status`.
///
/// Always replaced as a whole; fields are never merged between fetches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskStatusSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_time: Option<TimeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages_per_sec: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kafka_lag: Option<i64>,
    pub error_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Timestamp as the backend may encode it: epoch milliseconds or a textual date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Millis(i64),
    Text(String),
}
