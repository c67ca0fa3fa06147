use async_trait::async_trait;
use sinker_model::{CmdLine, ConfigDoc, DebugKind, LogPage, ProcInfo, TaskList, TaskStatusSnapshot};

use crate::errors::ClientError;

/// Management API of a running sinker.
///
/// Implementations only transport and decode; interpreting failures is left to the caller.
#[async_trait]
pub trait SinkerApi: Send + Sync + 'static {
    /// GET /api/v1/metrics/procinfo
    async fn proc_info(&self) -> Result<ProcInfo, ClientError>;

    /// GET /api/v1/tasks
    async fn tasks(&self) -> Result<TaskList, ClientError>;

    /// GET /api/v1/tasks/{name}/status
    async fn task_status(&self, name: &str) -> Result<TaskStatusSnapshot, ClientError>;

    /// GET /api/v1/config
    async fn config(&self) -> Result<ConfigDoc, ClientError>;

    /// GET /api/v1/cmdline
    async fn cmdline(&self) -> Result<CmdLine, ClientError>;

    /// POST /api/v1/tasks/refresh
    async fn refresh_tasks(&self) -> Result<(), ClientError>;

    /// POST /api/v1/config/refresh
    async fn refresh_config(&self) -> Result<(), ClientError>;

    /// Raw-text diagnostic dump.
    async fn debug_text(&self, kind: DebugKind) -> Result<String, ClientError>;

    /// GET /api/v1/log?from={from}[&error=true]
    async fn log(&self, from: usize, errors_only: bool) -> Result<LogPage, ClientError>;

    /// GET /api/v1/task/{name}
    async fn task_config(&self, name: &str) -> Result<serde_json::Value, ClientError>;
}
