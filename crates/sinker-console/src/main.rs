mod cli;
mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use sinker_client::{HttpClient, SinkerApi};
use sinker_core::{Console, ConsoleConfig};
use sinker_observe::{LoggerConfig, logger_init};
use sinker_view::format::local_offset;
use time::UtcOffset;
use tracing::{debug, info};

use crate::cli::{Cli, Command, ReloadTarget, TasksArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The local offset can only be read reliably before worker threads exist.
    let offset = local_offset();
    let log = LoggerConfig {
        format: cli.log_format,
        level: cli.log_level.clone(),
        ..Default::default()
    };
    logger_init(&log).context("failed to initialize logger")?;

    let config = ConsoleConfig {
        request_timeout_ms: cli.timeout_ms,
        ..ConsoleConfig::new(&cli.url)
    };
    let console = Console::connect(config).context("invalid console configuration")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?
        .block_on(run(console, cli.command, offset))
}

async fn run(
    mut console: Console<HttpClient>,
    command: Command,
    offset: UtcOffset,
) -> Result<()> {
    debug!(?command, "running");
    match command {
        Command::Overview { watch } => overview(&mut console, watch, offset).await,
        Command::Tasks(args) => tasks(&mut console, &args, offset).await,
        Command::Status { name, watch } => status(&console, &name, watch, offset).await,
        Command::Task { name } => {
            let doc = console.task_config(&name).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
        Command::Config => {
            if !console.refresh_config().await {
                bail!("failed to fetch configuration");
            }
            match console.config_doc() {
                Some(doc) => print!("{}", render::config(doc, console.cmdline())),
                None => bail!("configuration unavailable"),
            }
            Ok(())
        }
        Command::Debug { kind } => {
            if !console.refresh_debug(kind).await {
                bail!("failed to fetch {kind} dump");
            }
            println!("{}", console.cached_debug(kind));
            Ok(())
        }
        Command::Log { from, errors } => {
            let page = console.log(from, errors).await?;
            print!("{}", render::log(&page, from));
            Ok(())
        }
        Command::Reload { target } => {
            match target {
                ReloadTarget::Tasks => {
                    console.reload_tasks().await?;
                    println!(
                        "tasks reloaded, {} task(s) running",
                        console.tasks().store().len()
                    );
                }
                ReloadTarget::Config => {
                    console.reload_config().await?;
                    println!("configuration reloaded");
                }
            }
            Ok(())
        }
    }
}

async fn overview(
    console: &mut Console<HttpClient>,
    watch: bool,
    offset: UtcOffset,
) -> Result<()> {
    console.load().await;
    let Some(info) = console.proc_info() else {
        bail!("process info unavailable");
    };
    print!("{}", render::overview(&info, offset));
    if !watch {
        return Ok(());
    }

    let mut updates = console.subscribe_proc_info();
    console.start_overview_refresh();
    info!(
        interval_ms = console.config().overview_interval_ms,
        "watching overview, press Ctrl+C to stop"
    );
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                changed?;
                if let Some(info) = updates.borrow_and_update().clone() {
                    println!();
                    print!("{}", render::overview(&info, offset));
                }
            }
        }
    }
    console.stop_overview_refresh();
    Ok(())
}

async fn tasks(
    console: &mut Console<HttpClient>,
    args: &TasksArgs,
    offset: UtcOffset,
) -> Result<()> {
    if !console.refresh_tasks().await {
        bail!("failed to fetch task list");
    }

    let view = console.tasks_mut();
    view.set_filter(args.filter());
    if let Some(field) = args.sort {
        view.set_sort(field);
        if args.desc {
            view.set_sort(field);
        }
    }
    view.set_page_size(args.page_size);
    view.set_page(args.page);

    print!("{}", render::tasks(&view.page(), &view.state().sort, offset));
    Ok(())
}

async fn status(
    console: &Console<HttpClient>,
    name: &str,
    watch: bool,
    offset: UtcOffset,
) -> Result<()> {
    if !watch {
        let snap = console.api().task_status(name).await?;
        print!("{}", render::status(name, Some(&snap), offset));
        return Ok(());
    }

    let mut updates = console.status().subscribe();
    console.open_status(name);
    info!(
        task = name,
        interval_ms = console.status().period().as_millis() as u64,
        "watching task status, press Ctrl+C to stop"
    );
    print!("{}", render::status(name, None, offset));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                changed?;
                if let Some(snap) = updates.borrow_and_update().clone() {
                    println!();
                    print!("{}", render::status(name, Some(&snap), offset));
                }
            }
        }
    }
    console.close_status();
    Ok(())
}
