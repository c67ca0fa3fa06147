use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

use sinker_client::{ClientError, HttpClient, SinkerApi};
use sinker_model::{CmdLine, ConfigDoc, DebugKind, LogPage, ProcInfo};
use sinker_view::TaskView;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{config::ConsoleConfig, error::CoreError, poll::PollHandle, poller::StatusPoller};

/// Shown for a diagnostic dump that has not been fetched yet.
pub const DEBUG_PLACEHOLDER: &str = "加载中...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Overview,
    Tasks,
    Config,
    Debug,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Tasks, Tab::Config, Tab::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Tasks => "tasks",
            Tab::Config => "config",
            Tab::Debug => "debug",
        }
    }

    fn from_u8(v: u8) -> Tab {
        match v {
            1 => Tab::Tasks,
            2 => Tab::Config,
            3 => Tab::Debug,
            _ => Tab::Overview,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Tab::Overview => 0,
            Tab::Tasks => 1,
            Tab::Config => 2,
            Tab::Debug => 3,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        Tab::ALL
            .into_iter()
            .find(|t| t.as_str() == norm)
            .ok_or_else(|| format!("unknown tab: {s}"))
    }
}

/// Per-panel "request in flight" flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingStates {
    /// Initial load of process info, config and cmdline.
    pub global: bool,
    pub overview: bool,
    pub tasks: bool,
    pub config: bool,
    pub debug: bool,
}

/// State reachable from the background overview refresh.
struct OverviewShared {
    tab: AtomicU8,
    proc_info: watch::Sender<Option<ProcInfo>>,
}

impl OverviewShared {
    fn tab(&self) -> Tab {
        Tab::from_u8(self.tab.load(Ordering::Acquire))
    }
}

/// Application shell: owns every panel's data and decides what to fetch when.
///
/// Failed fetches never clear what is already shown; they log a warning and
/// reset the panel's loading flag.
pub struct Console<A: SinkerApi> {
    api: Arc<A>,
    config: ConsoleConfig,
    loading: LoadingStates,
    overview: Arc<OverviewShared>,
    overview_poll: Option<PollHandle>,
    config_doc: Option<ConfigDoc>,
    cmdline: Option<CmdLine>,
    tasks: TaskView,
    debug: HashMap<DebugKind, String>,
    status: StatusPoller<A>,
}

impl Console<HttpClient> {
    /// Validate `config` and build a console talking HTTP to the sinker.
    pub fn connect(config: ConsoleConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = HttpClient::new(&config.client())?;
        info!(url = %client.base_url(), "console connected");
        Ok(Console::new(Arc::new(client), config))
    }
}

impl<A: SinkerApi> Console<A> {
    pub fn new(api: Arc<A>, config: ConsoleConfig) -> Self {
        let (proc_info, _) = watch::channel(None);
        let status = StatusPoller::new(Arc::clone(&api), config.status_interval());
        Self {
            api,
            config,
            loading: LoadingStates::default(),
            overview: Arc::new(OverviewShared {
                tab: AtomicU8::new(Tab::default().to_u8()),
                proc_info,
            }),
            overview_poll: None,
            config_doc: None,
            cmdline: None,
            tasks: TaskView::new(),
            debug: HashMap::new(),
            status,
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Initial load: process info, config and cmdline fetched concurrently.
    /// The global loading flag stays set until all three have settled.
    pub async fn load(&mut self) {
        self.loading.global = true;
        let (proc_info, config, cmdline) =
            tokio::join!(self.api.proc_info(), self.api.config(), self.api.cmdline());

        if let Some(info) = settle("procinfo", proc_info) {
            self.overview.proc_info.send_replace(Some(info));
        }
        if let Some(doc) = settle("config", config) {
            self.config_doc = Some(doc);
        }
        if let Some(cmd) = settle("cmdline", cmdline) {
            self.cmdline = Some(cmd);
        }
        self.loading.global = false;
        debug!("initial load finished");
    }

    pub fn loading(&self) -> LoadingStates {
        self.loading
    }

    pub fn active_tab(&self) -> Tab {
        self.overview.tab()
    }

    /// Switch tabs and fetch what the new tab shows.
    pub async fn set_active_tab(&mut self, tab: Tab) {
        self.overview.tab.store(tab.to_u8(), Ordering::Release);
        debug!(tab = %tab, "tab activated");
        match tab {
            Tab::Overview => {
                self.refresh_overview().await;
            }
            Tab::Tasks => {
                self.refresh_tasks().await;
            }
            Tab::Config => {
                self.refresh_config().await;
            }
            Tab::Debug => {
                self.debug_text(DebugKind::Heap).await;
            }
        }
    }

    pub fn proc_info(&self) -> Option<ProcInfo> {
        self.overview.proc_info.borrow().clone()
    }

    pub fn subscribe_proc_info(&self) -> watch::Receiver<Option<ProcInfo>> {
        self.overview.proc_info.subscribe()
    }

    pub async fn refresh_overview(&mut self) -> bool {
        self.loading.overview = true;
        let fetched = settle("procinfo", self.api.proc_info().await);
        self.loading.overview = false;
        match fetched {
            Some(info) => {
                self.overview.proc_info.send_replace(Some(info));
                true
            }
            None => false,
        }
    }

    /// Arm the periodic process-info refresh. Ticks are skipped while another
    /// tab is active. Calling it again replaces the running timer.
    pub fn start_overview_refresh(&mut self) {
        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.overview);
        self.overview_poll = Some(PollHandle::spawn(
            "overview",
            self.config.overview_interval(),
            move || {
                let api = Arc::clone(&api);
                let shared = Arc::clone(&shared);
                async move {
                    if shared.tab() != Tab::Overview {
                        return;
                    }
                    if let Some(info) = settle("procinfo", api.proc_info().await) {
                        shared.proc_info.send_replace(Some(info));
                    }
                }
            },
        ));
    }

    pub fn stop_overview_refresh(&mut self) {
        self.overview_poll = None;
    }

    pub fn tasks(&self) -> &TaskView {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskView {
        &mut self.tasks
    }

    /// Re-fetch the task list into the view. Filter, sort and page survive.
    pub async fn refresh_tasks(&mut self) -> bool {
        self.loading.tasks = true;
        let fetched = settle("tasks", self.api.tasks().await);
        self.loading.tasks = false;
        match fetched {
            Some(list) => {
                debug!(count = list.tasks.len(), "task list refreshed");
                self.tasks.replace_tasks(list.tasks);
                true
            }
            None => false,
        }
    }

    /// Ask the sinker to reload its tasks, then re-fetch the list.
    pub async fn reload_tasks(&mut self) -> Result<(), CoreError> {
        self.api.refresh_tasks().await.inspect_err(|e| {
            warn!(error = %e, "task reload rejected");
        })?;
        info!("sinker reloaded tasks");
        self.refresh_tasks().await;
        Ok(())
    }

    pub fn config_doc(&self) -> Option<&ConfigDoc> {
        self.config_doc.as_ref()
    }

    pub fn cmdline(&self) -> Option<&CmdLine> {
        self.cmdline.as_ref()
    }

    /// Re-fetch config and cmdline together.
    pub async fn refresh_config(&mut self) -> bool {
        self.loading.config = true;
        let (config, cmdline) = tokio::join!(self.api.config(), self.api.cmdline());
        self.loading.config = false;

        let mut ok = true;
        match settle("config", config) {
            Some(doc) => self.config_doc = Some(doc),
            None => ok = false,
        }
        match settle("cmdline", cmdline) {
            Some(cmd) => self.cmdline = Some(cmd),
            None => ok = false,
        }
        ok
    }

    /// Ask the sinker to reload its configuration, then re-fetch it.
    pub async fn reload_config(&mut self) -> Result<(), CoreError> {
        self.api.refresh_config().await.inspect_err(|e| {
            warn!(error = %e, "config reload rejected");
        })?;
        info!("sinker reloaded config");
        self.refresh_config().await;
        Ok(())
    }

    /// Diagnostic dump, fetched on first access only.
    pub async fn debug_text(&mut self, kind: DebugKind) -> &str {
        if !self.debug.contains_key(&kind) {
            self.refresh_debug(kind).await;
        }
        self.cached_debug(kind)
    }

    pub fn cached_debug(&self, kind: DebugKind) -> &str {
        self.debug
            .get(&kind)
            .map(String::as_str)
            .unwrap_or(DEBUG_PLACEHOLDER)
    }

    pub async fn refresh_debug(&mut self, kind: DebugKind) -> bool {
        self.loading.debug = true;
        let fetched = settle(kind.as_str(), self.api.debug_text(kind).await);
        self.loading.debug = false;
        match fetched {
            Some(text) => {
                self.debug.insert(kind, text);
                true
            }
            None => false,
        }
    }

    pub async fn log(&self, from: usize, errors_only: bool) -> Result<LogPage, CoreError> {
        Ok(self.api.log(from, errors_only).await?)
    }

    pub async fn task_config(&self, name: &str) -> Result<serde_json::Value, CoreError> {
        Ok(self.api.task_config(name).await?)
    }

    /// Open the status panel of `name`.
    pub fn open_status(&self, name: &str) {
        self.status.open(Some(name));
    }

    pub fn close_status(&self) {
        self.status.close();
    }

    pub fn status(&self) -> &StatusPoller<A> {
        &self.status
    }
}

fn settle<T>(what: &str, result: Result<T, ClientError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(what, error = %e, "fetch failed, keeping previous data");
            None
        }
    }
}
