use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
pub struct DaemonArgs {
    /// Run in the foreground instead of detaching.
    #[arg(long)]
    pub force: bool,
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
    /// Program that takes a screenshot, the destination path is appended to it. Screenshots are
    /// not taken without one.
    #[arg(long = "capture-command")]
    pub capture_command: Option<String>,
    /// Defaults to `screenshots` inside the application directory.
    #[arg(long = "screenshots-dir")]
    pub screenshots_dir: Option<PathBuf>,
}
