//! hyperflow CLI
//!
//! Starts, stops and signals the hyperflow daemon, and checks rule documents.

mod process;

use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hyperflow_config::EventKind;
use miette::IntoDiagnostic;
use nix::sys::signal::Signal;

use crate::process::{find_daemon, send_signal, spawn_daemon, DaemonPaths};

/// Grace period between SIGTERM and SIGKILL, and between stop and start
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "hyperflow")]
#[command(about = "Hyprland event automation")]
#[command(version)]
struct Cli {
    /// Path to the rule document
    #[arg(short, long, default_value = "~/.config/hyperflow/workflows.json")]
    config: String,

    /// Path of the daemon's PID file
    #[arg(long, default_value = "~/.config/hyperflow/hyperflow.pid")]
    pid_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the daemon in the background
    Start,

    /// Stop the daemon
    Stop,

    /// Stop and start the daemon
    Restart,

    /// Show whether the daemon is running
    Status,

    /// Ask the daemon to reload its rules
    Reload,

    /// Validate the rule document
    Validate,

    /// List event types and the properties conditions can use
    Events,
}

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Expand tilde in paths
    let paths = DaemonPaths {
        config: shellexpand::tilde(&cli.config).into_owned().into(),
        pid_file: shellexpand::tilde(&cli.pid_file).into_owned().into(),
    };

    match cli.command {
        Commands::Start => cmd_start(&paths),
        Commands::Stop => cmd_stop(&paths),
        Commands::Restart => cmd_restart(&paths),
        Commands::Status => cmd_status(&paths),
        Commands::Reload => cmd_reload(&paths),
        Commands::Validate => cmd_validate(&paths.config),
        Commands::Events => cmd_events(),
    }
}

fn cmd_start(paths: &DaemonPaths) -> miette::Result<()> {
    if let Some(pid) = find_daemon(&paths.pid_file) {
        println!("hyperflow daemon is already running (PID: {})", pid);
        return Ok(());
    }

    let pid = spawn_daemon(paths).into_diagnostic()?;
    println!("Started hyperflow daemon (PID: {})", pid);
    Ok(())
}

fn cmd_stop(paths: &DaemonPaths) -> miette::Result<()> {
    let Some(pid) = find_daemon(&paths.pid_file) else {
        println!("hyperflow daemon is not running");
        remove_stale_pid_file(&paths.pid_file);
        return Ok(());
    };

    match send_signal(pid, Some(Signal::SIGTERM)) {
        Ok(()) => println!("Sent SIGTERM to hyperflow daemon (PID: {})", pid),
        Err(nix::errno::Errno::ESRCH) => {
            println!("hyperflow daemon is not running");
            remove_stale_pid_file(&paths.pid_file);
            return Ok(());
        }
        Err(e) => return Err(miette::miette!("Error stopping daemon: {}", e)),
    }

    std::thread::sleep(SHUTDOWN_GRACE);

    if send_signal(pid, None).is_ok() {
        send_signal(pid, Some(Signal::SIGKILL))
            .map_err(|e| miette::miette!("Error killing daemon: {}", e))?;
        println!("Sent SIGKILL to hyperflow daemon (PID: {})", pid);
    }

    remove_stale_pid_file(&paths.pid_file);
    Ok(())
}

fn cmd_restart(paths: &DaemonPaths) -> miette::Result<()> {
    cmd_stop(paths)?;
    std::thread::sleep(SHUTDOWN_GRACE);
    cmd_start(paths)
}

fn cmd_status(paths: &DaemonPaths) -> miette::Result<()> {
    match find_daemon(&paths.pid_file) {
        Some(pid) => println!("hyperflow daemon is running (PID: {})", pid),
        None => println!("hyperflow daemon is not running"),
    }
    Ok(())
}

fn cmd_reload(paths: &DaemonPaths) -> miette::Result<()> {
    let Some(pid) = find_daemon(&paths.pid_file) else {
        println!("hyperflow daemon is not running");
        return Ok(());
    };

    match send_signal(pid, Some(Signal::SIGHUP)) {
        Ok(()) => {
            println!(
                "Sent SIGHUP to hyperflow daemon (PID: {}) to reload configuration",
                pid
            );
            Ok(())
        }
        Err(nix::errno::Errno::ESRCH) => {
            println!("hyperflow daemon is not running");
            Ok(())
        }
        Err(e) => Err(miette::miette!("Error reloading daemon: {}", e)),
    }
}

fn cmd_validate(config_path: &Path) -> miette::Result<()> {
    println!("Validating rules: {}", config_path.display());

    let rules = hyperflow_config::parse_rules(config_path)?;

    println!("Rule document is valid!");
    println!("  Rules: {} ({} enabled)", rules.len(), rules.enabled_count());
    for rule in &rules {
        println!(
            "    - {} [{}] on {}{} ({} condition(s), {} action(s)){}",
            rule.name,
            rule.id,
            rule.trigger.event_type,
            if rule.trigger.debounce_ms > 0 {
                format!(" every {}ms", rule.trigger.debounce_ms)
            } else {
                String::new()
            },
            rule.conditions.len(),
            rule.actions.len(),
            if rule.enabled { "" } else { " disabled" }
        );
    }

    let warnings = hyperflow_config::validate(&rules);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

fn cmd_events() -> miette::Result<()> {
    println!("Event types and their properties:\n");
    for kind in EventKind::ALL {
        println!("  {:<20} {}", kind.name(), kind.fields().join(", "));
    }
    Ok(())
}

fn remove_stale_pid_file(pid_file: &Path) {
    if pid_file.exists() {
        if let Err(e) = std::fs::remove_file(pid_file) {
            tracing::warn!("Failed to remove PID file {}: {}", pid_file.display(), e);
        }
    }
}
