use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::{anyhow, bail, Result};
use sysinfo::{get_current_pid, Signal, System};
use tracing::info;

/// Terminates every process running the `daemon` executable, except this one and its children.
pub fn kill_previous_daemons(daemon: &Path) -> Result<usize> {
    let system = System::new_all();
    let current_id = get_current_pid().map_err(|e| anyhow!("Can't get current pid: {e}"))?;
    let mut killed = 0;
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| daemon == *v)
            .is_some()
        {
            info!("Stopping daemon {pid}");
            // This will forcefully terminate the process on Windows.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
            killed += 1;
        }
    }
    Ok(killed)
}

/// Arguments the daemon binary is started with.
pub fn daemon_arguments(
    dir: &Path,
    screenshots_dir: &Path,
    capture_command: Option<&str>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--dir".into(),
        dir.into(),
        "--screenshots-dir".into(),
        screenshots_dir.into(),
    ];
    if let Some(command) = capture_command {
        args.push("--capture-command".into());
        args.push(command.into());
    }
    args
}

/// Stops running daemons and starts a new one. The daemon binary detaches itself, so this only
/// waits for the launcher to finish.
pub fn restart_daemon(daemon: PathBuf, args: Vec<OsString>) -> Result<()> {
    kill_previous_daemons(&daemon)?;

    let mut command = std::process::Command::new(&daemon);
    command.args(args);
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());

    #[cfg(feature = "win")]
    {
        use std::os::windows::process::CommandExt;
        use windows::Win32::System::Threading::DETACHED_PROCESS;
        command.creation_flags(DETACHED_PROCESS.0);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    info!("Spawning {daemon:?}");
    let status = command
        .status()
        .map_err(|e| anyhow!("Failed to start {daemon:?}: {e}"))?;
    if !status.success() {
        bail!("{daemon:?} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{daemon_arguments, kill_previous_daemons};

    #[test]
    fn arguments_carry_the_directories() {
        let args = daemon_arguments(Path::new("/data"), Path::new("/shots"), Some("grim"));
        let args: Vec<_> = args.iter().map(|v| v.to_string_lossy().to_string()).collect();
        assert_eq!(
            args,
            [
                "--dir",
                "/data",
                "--screenshots-dir",
                "/shots",
                "--capture-command",
                "grim"
            ]
        );
        assert_eq!(daemon_arguments(Path::new("/data"), Path::new("/shots"), None).len(), 4);
    }

    #[test]
    fn nothing_to_kill_for_missing_binary() -> anyhow::Result<()> {
        assert_eq!(
            kill_previous_daemons(Path::new("/definitely/not/a/daemon"))?,
            0
        );
        Ok(())
    }
}
