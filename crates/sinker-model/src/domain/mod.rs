mod task;
pub use task::{Task, TaskList, TaskStatus, TaskType};

mod status_snapshot;
pub use status_snapshot::{TaskStatusSnapshot, TimeValue};

mod proc_info;
pub use proc_info::ProcInfo;

mod cmdline;
pub use cmdline::{CmdLine, ConfigSource};

mod log_page;
pub use log_page::LogPage;

mod debug_kind;
pub use debug_kind::DebugKind;

/// Effective sinker configuration as reported by `/api/v1/config`.
///
/// The console renders it generically, so it stays an untyped JSON object.
pub type ConfigDoc = serde_json::Map<String, serde_json::Value>;
