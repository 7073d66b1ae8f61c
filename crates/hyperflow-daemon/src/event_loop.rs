//! The daemon's event loop
//!
//! ```text
//! socket line -> parse_event -> RuleMatcher (each rule, in order) -> ActionDispatcher
//!                                     ^
//!            control channel ---------+  (Reload swaps the rule set, Terminate exits)
//! ```
//!
//! One line is processed to completion before the next line or control
//! message is looked at, so a reload always lands between two events.

use std::future::Future;
use std::time::Instant;

use hyperflow_config::ConfigError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::dispatcher::{ActionDispatcher, CommandExecutor};
use crate::hypr_ipc::{parse_event, HyprEventStream};
use crate::matcher::RuleMatcher;
use crate::store::ConfigStore;

/// Buffer size for the control channel
pub const CONTROL_CHANNEL_BUFFER: usize = 8;

/// Out-of-band requests delivered to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Re-read the rule document
    Reload,
    /// Stop processing and release the socket
    Terminate,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Terminated,
    /// The compositor closed the socket
    StreamClosed,
    ReadFailed,
}

/// Rule set, debounce state and dispatcher, driven one line at a time
pub struct Engine<E> {
    store: ConfigStore,
    matcher: RuleMatcher,
    dispatcher: ActionDispatcher<E>,
}

impl<E: CommandExecutor> Engine<E> {
    pub fn new(store: ConfigStore, dispatcher: ActionDispatcher<E>) -> Self {
        Self {
            store,
            matcher: RuleMatcher::new(),
            dispatcher,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &ActionDispatcher<E> {
        &self.dispatcher
    }

    /// Parse one line and dispatch every rule it fires.
    ///
    /// Returns the number of rules that fired; malformed lines fire none.
    pub async fn process_line(&mut self, line: &str) -> usize {
        let Some(event) = parse_event(line) else {
            debug!(line = %line, "Ignoring line without event delimiter");
            return 0;
        };

        debug!(event = %event.event_type, fields = ?event.fields, "Processing event");

        let rules = self.store.current();
        let fired = self.matcher.matching(&rules, &event, Instant::now());
        for rule in &fired {
            info!(rule = %rule.id, "Rule '{}' matched. Executing actions.", rule.name);
            self.dispatcher.dispatch(rule).await;
        }
        fired.len()
    }

    /// Reload the rule document.
    ///
    /// On success the debounce state starts over. On failure the current
    /// rules and debounce state are kept.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.store.reload()?;
        self.matcher.reset();
        Ok(())
    }

    fn handle_reload(&mut self) {
        info!("Reloading rules...");
        if let Err(e) = self.reload() {
            warn!(
                "Failed to reload rules from {}: {}. Keeping {} previous rule(s)",
                self.store.path().display(),
                e,
                self.store.current().len()
            );
        }
    }
}

/// Run until terminated or the socket closes
///
/// The stream is consumed and dropped on every exit path. If every control
/// sender is dropped the loop keeps reading events.
pub async fn run<E: CommandExecutor>(
    engine: &mut Engine<E>,
    mut stream: HyprEventStream,
    control: &mut mpsc::Receiver<Control>,
) -> LoopExit {
    let mut control_open = true;

    loop {
        tokio::select! {
            biased;

            message = control.recv(), if control_open => match message {
                Some(Control::Reload) => engine.handle_reload(),
                Some(Control::Terminate) => {
                    info!("Terminate requested, closing event socket");
                    return LoopExit::Terminated;
                }
                None => {
                    debug!("Control channel closed");
                    control_open = false;
                }
            },

            line = stream.next_line() => match line {
                Ok(Some(line)) => {
                    engine.process_line(&line).await;
                }
                Ok(None) => {
                    info!("Hyprland closed the event socket");
                    return LoopExit::StreamClosed;
                }
                Err(e) => {
                    warn!("Error reading from socket: {}", e);
                    return LoopExit::ReadFailed;
                }
            },
        }
    }
}

/// Drive `fut` to completion unless `Terminate` arrives first
///
/// Used while the event socket is still connecting. Reload requests received
/// meanwhile are applied to `engine`. Returns `None` when terminated.
pub async fn until_terminated<E, F>(
    engine: &mut Engine<E>,
    fut: F,
    control: &mut mpsc::Receiver<Control>,
) -> Option<F::Output>
where
    E: CommandExecutor,
    F: Future,
{
    tokio::pin!(fut);
    let mut control_open = true;

    loop {
        tokio::select! {
            biased;

            message = control.recv(), if control_open => match message {
                Some(Control::Reload) => engine.handle_reload(),
                Some(Control::Terminate) => {
                    info!("Terminate requested before the event socket connected");
                    return None;
                }
                None => control_open = false,
            },

            output = &mut fut => return Some(output),
        }
    }
}
