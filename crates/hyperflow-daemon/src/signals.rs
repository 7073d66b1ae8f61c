//! Unix signal to control message bridge
//!
//! - `SIGHUP` -> `Control::Reload`
//! - `SIGTERM`, `SIGINT` -> `Control::Terminate`

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::event_loop::Control;

/// Install signal handlers and forward them to `sender`
///
/// The task ends after forwarding a terminate request, or once the
/// receiving side is gone.
///
/// # Errors
///
/// Returns an error if a signal handler cannot be registered.
pub fn spawn_signal_bridge(sender: mpsc::Sender<Control>) -> std::io::Result<JoinHandle<()>> {
    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        loop {
            let control = tokio::select! {
                _ = hangup.recv() => {
                    info!("Received SIGHUP");
                    Control::Reload
                }
                _ = terminate.recv() => {
                    info!("Received SIGTERM");
                    Control::Terminate
                }
                _ = interrupt.recv() => {
                    info!("Received SIGINT");
                    Control::Terminate
                }
            };

            if sender.send(control).await.is_err() {
                debug!("Control receiver dropped, stopping signal bridge");
                return;
            }
            if control == Control::Terminate {
                return;
            }
        }
    }))
}
