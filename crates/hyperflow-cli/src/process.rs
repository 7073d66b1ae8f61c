//! Locating, spawning and signalling the daemon process

use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// Name of the daemon binary
const DAEMON_BINARY: &str = "hyperflowd";

/// Paths shared between the CLI and the daemon it starts
#[derive(Debug, Clone)]
pub struct DaemonPaths {
    pub config: PathBuf,
    pub pid_file: PathBuf,
}

/// True if a NUL-separated `/proc/<pid>/cmdline` belongs to the daemon
///
/// Only argv[0] is considered; other arguments may merely name the binary.
fn cmdline_is_daemon(cmdline: &[u8]) -> bool {
    let Some(program) = cmdline.split(|b| *b == 0).next() else {
        return false;
    };
    std::str::from_utf8(program)
        .ok()
        .and_then(|program| Path::new(program).file_name())
        .and_then(|name| name.to_str())
        == Some(DAEMON_BINARY)
}

fn is_daemon(pid: i32) -> bool {
    std::fs::read(format!("/proc/{}/cmdline", pid))
        .map(|cmdline| cmdline_is_daemon(&cmdline))
        .unwrap_or(false)
}

/// Read a PID from a PID file's contents
fn parse_pid(content: &str) -> Option<i32> {
    content.trim().parse().ok().filter(|pid| *pid > 0)
}

/// Find the running daemon
///
/// Trusts the PID file only if that process really is the daemon, removing
/// the file otherwise, then falls back to scanning `/proc`.
pub fn find_daemon(pid_file: &Path) -> Option<i32> {
    if let Ok(content) = std::fs::read_to_string(pid_file) {
        match parse_pid(&content) {
            Some(pid) if is_daemon(pid) => return Some(pid),
            _ => {
                tracing::debug!("Removing stale PID file {}", pid_file.display());
                let _ = std::fs::remove_file(pid_file);
            }
        }
    }

    let own_pid = std::process::id();
    std::fs::read_dir("/proc")
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().and_then(|n| n.parse::<i32>().ok()))
        .filter(|pid| u32::try_from(*pid).map_or(true, |p| p != own_pid))
        .find(|pid| is_daemon(*pid))
}

/// Send `signal` to `pid`; `None` only checks that the process exists
pub fn send_signal(pid: i32, signal: Option<Signal>) -> nix::Result<()> {
    kill(Pid::from_raw(pid), signal)
}

/// Locate the daemon binary: next to this executable if present, else `$PATH`
fn daemon_binary() -> PathBuf {
    std::env::current_exe()
        .ok()
        .map(|exe| exe.with_file_name(DAEMON_BINARY))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(DAEMON_BINARY))
}

/// Start the daemon in its own process group with stdio detached
///
/// Returns the child's PID. The daemon writes its own PID file.
pub fn spawn_daemon(paths: &DaemonPaths) -> std::io::Result<u32> {
    let child = Command::new(daemon_binary())
        .arg("--config")
        .arg(&paths.config)
        .arg("--pid-file")
        .arg(&paths.pid_file)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()?;

    Ok(child.id())
}
