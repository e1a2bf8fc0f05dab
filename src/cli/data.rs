//! Backups, `clear` and settings.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;
use tracing::info;

use crate::{
    store::{
        exchange::{export_json, export_to_file, read_import_file},
        Store,
    },
    tracker::settings::Settings,
};

use super::workspace::Workspace;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    #[command(about = "Change one or more settings")]
    Set {
        #[arg(long)]
        screenshots: Option<bool>,
        #[arg(long, help = "Minutes without input before timers stop, 0 disables it")]
        idle_timeout: Option<u32>,
        #[arg(long)]
        dark_mode: Option<bool>,
        #[arg(long, help = "Hours per day")]
        daily_goal: Option<f64>,
        #[arg(long, help = "Write a backup next to the data after every change")]
        auto_export: Option<bool>,
    },
    #[command(about = "Restore the default settings")]
    Reset,
}

/// Writes the backup to `file`, or prints it when no file is given.
pub async fn process_export<S: Store + Clone>(
    workspace: &Workspace<S>,
    file: Option<PathBuf>,
) -> Result<()> {
    let data = workspace.load().await;
    match file {
        Some(path) => {
            export_to_file(&data, &path).await?;
            println!("Exported to {}", path.display());
        }
        None => println!("{}", export_json(&data)?),
    }
    Ok(())
}

pub async fn process_import<S: Store + Clone>(workspace: &Workspace<S>, file: PathBuf) -> Result<()> {
    let bundle = read_import_file(&file).await?;
    info!("Importing {file:?}");
    workspace
        .mutate(|t| {
            t.replace_all_data(bundle);
            Ok(())
        })
        .await?;
    println!("Imported {}", file.display());
    Ok(())
}

pub async fn process_clear<S: Store + Clone>(workspace: &Workspace<S>, yes: bool) -> Result<()> {
    if !yes {
        bail!("This deletes every project, task and session. Pass --yes to confirm");
    }
    workspace
        .mutate(|t| {
            t.clear_all_data();
            Ok(())
        })
        .await?;
    println!("Cleared all data");
    Ok(())
}

pub async fn process_settings_command<S: Store + Clone>(
    workspace: &Workspace<S>,
    command: SettingsCommand,
) -> Result<()> {
    let settings = match command {
        SettingsCommand::Show => workspace.load().await.settings,
        SettingsCommand::Set {
            screenshots,
            idle_timeout,
            dark_mode,
            daily_goal,
            auto_export,
        } => {
            if daily_goal.is_some_and(|v| !v.is_finite() || v < 0.) {
                bail!("Daily goal must be a positive number of hours");
            }
            workspace
                .mutate(|t| {
                    let mut settings = t.snapshot().settings.clone();
                    if let Some(v) = screenshots {
                        settings.screenshot_enabled = v;
                    }
                    if let Some(v) = idle_timeout {
                        settings.idle_timeout = v;
                    }
                    if let Some(v) = dark_mode {
                        settings.dark_mode = v;
                    }
                    if let Some(v) = daily_goal {
                        settings.daily_goal = v;
                    }
                    if let Some(v) = auto_export {
                        settings.auto_export = v;
                    }
                    t.update_settings(settings.clone());
                    Ok(settings)
                })
                .await?
        }
        SettingsCommand::Reset => {
            workspace
                .mutate(|t| {
                    t.reset_settings();
                    Ok(t.snapshot().settings.clone())
                })
                .await?
        }
    };
    print!("{}", render_settings(&settings));
    Ok(())
}

pub fn render_settings(settings: &Settings) -> String {
    format!(
        "screenshots\t{}\nidle-timeout\t{} min\ndark-mode\t{}\ndaily-goal\t{} h\nauto-export\t{}\n",
        settings.screenshot_enabled,
        settings.idle_timeout,
        settings.dark_mode,
        settings.daily_goal,
        settings.auto_export
    )
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tokio::fs;

    use crate::{
        cli::workspace::test_workspace::test_workspace, tracker::error::TrackerError,
    };

    use super::{
        process_clear, process_export, process_import, process_settings_command, SettingsCommand,
    };

    #[tokio::test]
    async fn export_then_import_restores_state() -> Result<()> {
        let test = test_workspace();
        test.workspace
            .mutate(|t| {
                let project = t.add_project("Writing")?;
                t.add_task(project, "Draft")?;
                Ok(())
            })
            .await?;
        let backup = test.dir.path().join("backup.json");
        process_export(&test.workspace, Some(backup.clone())).await?;
        let before = test.workspace.load().await;

        process_clear(&test.workspace, true).await?;
        assert!(test.workspace.load().await.projects.is_empty());

        process_import(&test.workspace, backup).await?;
        assert_eq!(test.workspace.load().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn clear_needs_confirmation() -> Result<()> {
        let test = test_workspace();
        test.workspace
            .mutate(|t| Ok(t.add_project("Writing")?))
            .await?;
        assert!(process_clear(&test.workspace, false).await.is_err());
        assert_eq!(test.workspace.load().await.projects.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn broken_backup_changes_nothing() -> Result<()> {
        let test = test_workspace();
        test.workspace
            .mutate(|t| Ok(t.add_project("Writing")?))
            .await?;
        let backup = test.dir.path().join("broken.json");
        fs::write(&backup, "[1, 2, 3]").await?;

        let error = process_import(&test.workspace, backup)
            .await
            .expect_err("not an object");
        assert!(matches!(
            error.downcast_ref::<TrackerError>(),
            Some(TrackerError::ImportFormat(_))
        ));
        assert_eq!(test.workspace.load().await.projects.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn settings_are_updated_and_reset() -> Result<()> {
        let test = test_workspace();
        process_settings_command(
            &test.workspace,
            SettingsCommand::Set {
                screenshots: Some(false),
                idle_timeout: Some(15),
                dark_mode: None,
                daily_goal: Some(4.5),
                auto_export: None,
            },
        )
        .await?;
        let settings = test.workspace.load().await.settings;
        assert!(!settings.screenshot_enabled);
        assert_eq!(settings.idle_timeout, 15);
        assert_eq!(settings.daily_goal, 4.5);
        assert!(settings.dark_mode);

        process_settings_command(&test.workspace, SettingsCommand::Reset).await?;
        assert_eq!(
            test.workspace.load().await.settings,
            crate::tracker::settings::Settings::default()
        );

        assert!(process_settings_command(
            &test.workspace,
            SettingsCommand::Set {
                screenshots: None,
                idle_timeout: None,
                dark_mode: None,
                daily_goal: Some(-1.),
                auto_export: None,
            },
        )
        .await
        .is_err());
        Ok(())
    }
}
