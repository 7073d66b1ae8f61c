//! hyperflow daemon
//!
//! Watches the Hyprland event socket and runs the actions of every rule
//! whose trigger and conditions match an event.

mod condition;
mod debounce;
mod dispatcher;
mod event_loop;
mod hypr_ipc;
mod matcher;
mod pid_file;
mod signals;
mod store;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::dispatcher::{ActionDispatcher, ShellExecutor};
use crate::event_loop::{Engine, LoopExit, CONTROL_CHANNEL_BUFFER};
use crate::hypr_ipc::HyprEventStream;
use crate::pid_file::PidFile;
use crate::store::ConfigStore;

#[derive(Parser, Debug)]
#[command(name = "hyperflowd")]
#[command(about = "Hyprland event automation daemon")]
struct Args {
    /// Path to the rule document
    #[arg(short, long, default_value = "~/.config/hyperflow/workflows.json")]
    config: String,

    /// Path of the PID file used by `hyperflow stop` and `hyperflow reload`
    #[arg(long, default_value = "~/.config/hyperflow/hyperflow.pid")]
    pid_file: String,

    /// Event socket path (defaults to the running Hyprland instance's .socket2.sock)
    #[arg(short, long)]
    socket: Option<String>,

    /// Extra connection attempts if the event socket is not ready
    #[arg(short, long, default_value_t = 0)]
    retries: u32,

    /// Run actions on background tasks instead of blocking the event loop
    #[arg(long)]
    detach_actions: bool,
}

fn expand(path: &str) -> PathBuf {
    shellexpand::tilde(path).into_owned().into()
}

/// Load the rule document, writing the default one first if none exists
fn load_rules(config_path: &Path) -> Result<ConfigStore> {
    if !config_path.exists() {
        hyperflow_config::write_default_rules(config_path).with_context(|| {
            format!("Failed to create default config at {}", config_path.display())
        })?;
    }

    ConfigStore::load(config_path)
        .with_context(|| format!("Failed to load rules from {}", config_path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config_path = expand(&args.config);
    tracing::info!("Loading rules from {}", config_path.display());
    let store = load_rules(&config_path)?;

    let socket_path = match &args.socket {
        Some(path) => expand(path),
        None => hypr_ipc::get_socket_path()?,
    };

    let (control_tx, mut control_rx) = mpsc::channel(CONTROL_CHANNEL_BUFFER);
    let signal_bridge =
        signals::spawn_signal_bridge(control_tx).context("Failed to install signal handlers")?;

    let pid_file = PidFile::create(&expand(&args.pid_file))?;
    tracing::debug!("PID file at {}", pid_file.path().display());

    let dispatcher = ActionDispatcher::new(ShellExecutor).detached(args.detach_actions);
    let mut engine = Engine::new(store, dispatcher);

    let connect = HyprEventStream::connect_with_retry(&socket_path, args.retries);
    let Some(stream) = event_loop::until_terminated(&mut engine, connect, &mut control_rx).await
    else {
        signal_bridge.abort();
        tracing::info!("Shutting down...");
        return Ok(());
    };
    let stream = stream?;
    tracing::info!(
        "Connected to Hyprland event socket at {}",
        stream.socket_path().display()
    );

    tracing::info!("hyperflow daemon started. Send SIGHUP to reload rules.");

    let exit = event_loop::run(&mut engine, stream, &mut control_rx).await;
    signal_bridge.abort();

    match exit {
        LoopExit::Terminated => tracing::info!("Shutting down..."),
        LoopExit::StreamClosed => tracing::info!("Event stream ended, shutting down..."),
        LoopExit::ReadFailed => tracing::warn!("Event stream failed, shutting down..."),
    }

    Ok(())
}
