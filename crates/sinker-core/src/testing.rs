use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;
use sinker_client::{ClientError, SinkerApi};
use sinker_model::{
    CmdLine, ConfigDoc, DebugKind, LogPage, ProcInfo, Task, TaskList, TaskStatusSnapshot,
};

/// In-memory backend. `None` / missing entries answer with a `9999` envelope.
#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub proc_info: Option<ProcInfo>,
    pub tasks: Option<Vec<Task>>,
    pub config: Option<ConfigDoc>,
    pub cmdline: Option<CmdLine>,
    pub statuses: HashMap<String, TaskStatusSnapshot>,
    pub status_delay: HashMap<String, Duration>,
    pub debug: HashMap<DebugKind, String>,
    pub logs: Vec<String>,
    pub reject_refresh: bool,
    pub calls: Vec<String>,
}

impl FakeApi {
    pub fn with(f: impl FnOnce(&mut FakeState)) -> Self {
        let api = FakeApi::default();
        api.update(f);
        api
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn calls(&self, call: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.as_str() == call)
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }

    fn read<T>(
        &self,
        call: &str,
        f: impl FnOnce(&FakeState) -> Option<T>,
    ) -> Result<T, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        f(&state).ok_or_else(rejected)
    }
}

pub(crate) fn rejected() -> ClientError {
    ClientError::Rejected {
        code: "9999".to_string(),
        msg: "backend failure".to_string(),
    }
}

pub(crate) fn task(name: &str, lag: i64) -> Task {
    Task {
        name: name.to_string(),
        lag,
        ..Default::default()
    }
}

pub(crate) fn snapshot(total: i64) -> TaskStatusSnapshot {
    TaskStatusSnapshot {
        messages_total: Some(total),
        ..Default::default()
    }
}

#[async_trait]
impl SinkerApi for FakeApi {
    async fn proc_info(&self) -> Result<ProcInfo, ClientError> {
        self.read("procinfo", |s| s.proc_info.clone())
    }

    async fn tasks(&self) -> Result<TaskList, ClientError> {
        self.read("tasks", |s| {
            s.tasks.clone().map(|tasks| TaskList {
                total: tasks.len(),
                tasks,
            })
        })
    }

    async fn task_status(&self, name: &str) -> Result<TaskStatusSnapshot, ClientError> {
        let (delay, result) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("status:{name}"));
            (
                state.status_delay.get(name).copied(),
                state.statuses.get(name).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result.ok_or_else(rejected)
    }

    async fn config(&self) -> Result<ConfigDoc, ClientError> {
        self.read("config", |s| s.config.clone())
    }

    async fn cmdline(&self) -> Result<CmdLine, ClientError> {
        self.read("cmdline", |s| s.cmdline.clone())
    }

    async fn refresh_tasks(&self) -> Result<(), ClientError> {
        self.read("refresh:tasks", |s| (!s.reject_refresh).then_some(()))
    }

    async fn refresh_config(&self) -> Result<(), ClientError> {
        self.read("refresh:config", |s| (!s.reject_refresh).then_some(()))
    }

    async fn debug_text(&self, kind: DebugKind) -> Result<String, ClientError> {
        self.read(&format!("debug:{kind}"), |s| s.debug.get(&kind).cloned())
    }

    async fn log(&self, from: usize, errors_only: bool) -> Result<LogPage, ClientError> {
        self.record(format!("log:{from}:{errors_only}"));
        let state = self.state.lock().unwrap();
        Ok(LogPage {
            total: state.logs.len(),
            lines: state.logs.iter().skip(from).cloned().collect(),
        })
    }

    async fn task_config(&self, name: &str) -> Result<serde_json::Value, ClientError> {
        self.read(&format!("task:{name}"), |s| {
            s.tasks
                .as_ref()?
                .iter()
                .find(|t| t.name == name)
                .map(|t| serde_json::json!({ "name": t.name, "topic": t.topic }))
        })
    }
}
