use clap::{Args, Parser, Subcommand, ValueEnum};
use sinker_core::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_MS};
use sinker_model::DebugKind;
use sinker_observe::{LoggerFormat, LoggerLevel};
use sinker_view::{FilterPatch, PageSize, SortField};

#[derive(Parser, Debug)]
#[command(name = "sinker-console")]
#[command(version, about = "Monitoring console for a running clickhouse-sinker", long_about = None)]
pub struct Cli {
    /// Sinker management endpoint.
    #[arg(long, env = "SINKER_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    #[arg(long, env = "SINKER_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// `EnvFilter` directives, e.g. `warn` or `sinker_core=debug`.
    #[arg(long, env = "SINKER_LOG_LEVEL", default_value = "warn")]
    pub log_level: LoggerLevel,

    /// text | json | journald
    #[arg(long, env = "SINKER_LOG_FORMAT", default_value_t = LoggerFormat::default())]
    pub log_format: LoggerFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
pub enum Command {
    /// Process info and build details.
    Overview {
        /// Keep refreshing until Ctrl-C.
        #[arg(long)]
        watch: bool,
    },
    /// Filtered, sorted and paginated task table.
    Tasks(TasksArgs),
    /// Live status of one task.
    Status {
        name: String,
        /// Re-render on every poll until Ctrl-C.
        #[arg(long)]
        watch: bool,
    },
    /// Raw configuration of one task.
    Task { name: String },
    /// Effective configuration and its source.
    Config,
    /// Runtime diagnostic dump.
    Debug { kind: DebugKind },
    /// Tail the sinker log.
    Log {
        /// First line to return.
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// Only error lines.
        #[arg(long)]
        errors: bool,
    },
    /// Ask the sinker to reload tasks or config.
    Reload { target: ReloadTarget },
}

#[derive(Args, Debug, Default)]
pub struct TasksArgs {
    /// Case-insensitive substring of the task name.
    #[arg(long)]
    pub name: Option<String>,
    /// metric | log
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// running | stopped | error
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub sort: Option<SortField>,
    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// 10 | 20 | 50 | 100
    #[arg(long, default_value = "20", value_parser = parse_page_size)]
    pub page_size: PageSize,
}

impl TasksArgs {
    pub fn filter(&self) -> FilterPatch {
        let mut patch = FilterPatch::new();
        if let Some(name) = &self.name {
            patch = patch.name(name);
        }
        if let Some(kind) = &self.kind {
            patch = patch.kind(kind);
        }
        if let Some(status) = &self.status {
            patch = patch.status(status);
        }
        patch
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadTarget {
    Tasks,
    Config,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let n: usize = s.trim().parse().map_err(|_| format!("not a number: {s}"))?;
    PageSize::try_from(n).map_err(|e| e.to_string())
}
