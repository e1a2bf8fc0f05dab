pub mod catalog;
pub mod daemon_path;
pub mod data;
pub mod process;
pub mod report;
pub mod timer;
pub mod workspace;

use std::{env, path::PathBuf};

use anyhow::{bail, Result};
use catalog::{process_project_command, process_task_command, ProjectCommand, TaskCommand};
use clap::{Parser, Subcommand};
use daemon_path::to_daemon_path;
use data::{process_clear, process_export, process_import, process_settings_command, SettingsCommand};
use process::{daemon_arguments, kill_previous_daemons, restart_daemon};
use report::{
    process_analytics_command, process_history_command, process_report_command,
    process_screenshots_command, HistoryGrouping, ReportCommand, ScreenshotsCommand,
};
use timer::{process_start, process_status, process_stop};
use tracing::level_filters::LevelFilter;
use workspace::Workspace;

use crate::{
    daemon::{start_daemon, DaemonConfig},
    store::Store,
    tracker::entities::{SessionId, TaskId},
    utils::{
        dir::{create_application_default_path, default_screenshots_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "timetally", version, long_about = None)]
#[command(about = "Local-first project and task time tracker", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long = "screenshots-dir",
        global = true,
        help = "Where screenshots are kept. Defaults to `screenshots` inside the application directory"
    )]
    screenshots_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct DaemonOptions {
    #[arg(
        long = "capture-command",
        help = "Program that takes a screenshot, the destination path is appended to it. For example \"grim\""
    )]
    capture_command: Option<String>,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    #[command(about = "Delete one session")]
    Delete { id: SessionId },
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    #[command(about = "Start the timer of a task, stopping whatever runs")]
    Start { task: TaskId },
    #[command(about = "Stop a task, or every running task without an argument")]
    Stop { task: Option<TaskId> },
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    #[command(about = "What is running, today's goal and this week")]
    Status,
    #[command(about = "Time per project and task in a day, week or month")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Every session grouped by date or project")]
    History {
        #[arg(long, default_value_t = HistoryGrouping::Date)]
        by: HistoryGrouping,
    },
    #[command(about = "Activity estimated from screenshots")]
    Analytics,
    #[command(about = "Screenshots and the sessions they were taken in")]
    Screenshots {
        #[command(flatten)]
        command: ScreenshotsCommand,
    },
    #[command(about = "Write a backup of all data, to stdout without a file")]
    Export { file: Option<PathBuf> },
    #[command(about = "Replace data with the contents of a backup")]
    Import { file: PathBuf },
    #[command(about = "Delete every project, task and session")]
    Clear {
        #[arg(long)]
        yes: bool,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    #[command(about = "Starts a daemon for the application")]
    Init {
        #[command(flatten)]
        daemon: DaemonOptions,
    },
    #[command(
        about = "Run a daemon directly in current console. Used for debugging"
    )]
    Serve {
        #[command(flatten)]
        daemon: DaemonOptions,
    },
    #[command(about = "Stop currently running daemon.")]
    Kill,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = args
        .dir
        .map_or_else(create_application_default_path, Ok)?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &dir.join("logs"), logging_level, args.log)?;
    let screenshots_dir = args
        .screenshots_dir
        .unwrap_or_else(|| default_screenshots_dir(&dir));

    match args.commands {
        Commands::Init { daemon } => {
            let dir = std::path::absolute(dir)?;
            let screenshots_dir = std::path::absolute(screenshots_dir)?;
            restart_daemon(
                to_daemon_path(env::current_exe()?),
                daemon_arguments(&dir, &screenshots_dir, daemon.capture_command.as_deref()),
            )?;
            println!("Started daemon");
            Ok(())
        }
        Commands::Kill => {
            let killed = kill_previous_daemons(&to_daemon_path(env::current_exe()?))?;
            println!("Stopped {killed} daemons");
            Ok(())
        }
        Commands::Serve { daemon } => {
            start_daemon(DaemonConfig {
                dir,
                screenshots_dir,
                capture_command: daemon.capture_command,
            })
            .await
        }
        command => {
            let workspace = Workspace::open(dir, screenshots_dir)?;
            process_command(&workspace, command).await
        }
    }
}

async fn process_command<S: Store + Clone>(workspace: &Workspace<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Project { command } => process_project_command(workspace, command).await,
        Commands::Task { command } => process_task_command(workspace, command).await,
        Commands::Start { task } => process_start(workspace, task).await,
        Commands::Stop { task } => process_stop(workspace, task).await,
        Commands::Session {
            command: SessionCommand::Delete { id },
        } => {
            if !workspace.mutate(|t| Ok(t.delete_session(id))).await? {
                bail!("Session {id} doesn't exist");
            }
            Ok(())
        }
        Commands::Status => process_status(workspace).await,
        Commands::Report { command } => process_report_command(workspace, command).await,
        Commands::History { by } => process_history_command(workspace, by).await,
        Commands::Analytics => process_analytics_command(workspace).await,
        Commands::Screenshots { command } => process_screenshots_command(workspace, command).await,
        Commands::Export { file } => process_export(workspace, file).await,
        Commands::Import { file } => process_import(workspace, file).await,
        Commands::Clear { yes } => process_clear(workspace, yes).await,
        Commands::Settings { command } => process_settings_command(workspace, command).await,
        Commands::Init { .. } | Commands::Serve { .. } | Commands::Kill => {
            bail!("Daemon commands don't use the data directory")
        }
    }
}
