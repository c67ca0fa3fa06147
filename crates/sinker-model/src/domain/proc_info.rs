use serde::{Deserialize, Serialize};

/// Process summary served by `/api/v1/metrics/procinfo`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProcInfo {
    pub version: String,
    pub build_time: String,
    pub commit: String,
    pub go_version: String,
    pub record_pool_size: i64,
    pub goroutines: u64,
    #[serde(rename = "CPU")]
    pub cpu: f64,
    /// Resident memory in bytes.
    pub memory: u64,
    /// Epoch seconds.
    pub start_time: i64,
    /// Seconds since start.
    pub uptime: u64,
    pub tasks: u64,
}
