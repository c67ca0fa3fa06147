use sinker_model::{Task, TaskStatus, TaskType};
use time::UtcOffset;

use crate::format::{self, LagLevel};

/// Display-ready cells of one task-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub name: String,
    pub cluster: String,
    pub table: String,
    pub topic: String,
    pub consumer_group: String,
    pub kind: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub status_label: String,
    pub status_class: &'static str,
    pub lag: String,
    pub lag_level: LagLevel,
    pub write_speed: String,
    pub last_update: String,
}

impl TaskRow {
    pub fn from_task(task: &Task) -> Self {
        Self::from_task_at(task, format::local_offset())
    }

    pub fn from_task_at(task: &Task, offset: UtcOffset) -> Self {
        let last_update = format::format_datetime_ms(task.last_update, offset);
        Self {
            name: task.name.clone(),
            cluster: task.cluster.clone(),
            table: task.table.clone(),
            topic: task.topic.clone(),
            consumer_group: task.consumer_group.clone(),
            kind: task.kind.clone(),
            status: task.status.clone(),
            status_label: format::status_label(task.status.as_ref()).to_string(),
            status_class: format::status_class(task.status.as_ref()),
            lag: format::format_number(task.lag),
            lag_level: format::lag_level(task.lag),
            write_speed: dash_if_empty(task.write_speed.clone().unwrap_or_default()),
            last_update: dash_if_empty(last_update),
        }
    }
}

fn dash_if_empty(s: String) -> String {
    if s.is_empty() { "-".to_string() } else { s }
}
