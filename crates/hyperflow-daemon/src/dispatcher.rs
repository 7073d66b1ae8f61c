//! Action dispatch through a command executor
//!
//! The matcher only decides that a rule fired. Running its command strings
//! is the executor's job; the dispatcher walks a rule's actions in order
//! and absorbs every failure so one bad command cannot stop the others or
//! the event loop.

use std::future::Future;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use hyperflow_config::Rule;
use thiserror::Error;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Errors from running a single action
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed with {status}")]
    ExitStatus { command: String, status: ExitStatus },
}

/// Runs an action's command string
pub trait CommandExecutor: Send + Sync + 'static {
    /// Run `command` to completion
    fn execute(&self, command: &str) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Executes commands with `sh -c`
///
/// stdin is closed; stdout and stderr are inherited from the daemon.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    async fn execute(&self, command: &str) -> Result<(), ActionError> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| ActionError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionError::ExitStatus {
                command: command.to_string(),
                status,
            })
        }
    }
}

/// Run every action of `rule` in order, logging failures
async fn run_actions<E: CommandExecutor>(executor: &E, rule: &Rule) {
    for action in &rule.actions {
        if action.command.trim().is_empty() {
            debug!(rule = %rule.id, "Skipping empty action command");
            continue;
        }

        info!(rule = %rule.id, command = %action.command, "Executing");
        if let Err(e) = executor.execute(&action.command).await {
            warn!(rule = %rule.id, "Action failed: {}", e);
        }
    }
}

/// Hands matched rules to the executor
pub struct ActionDispatcher<E> {
    executor: Arc<E>,
    detached: bool,
}

impl<E: CommandExecutor> ActionDispatcher<E> {
    /// Dispatcher that runs actions inline, blocking the caller until done
    pub fn new(executor: E) -> Self {
        Self {
            executor: Arc::new(executor),
            detached: false,
        }
    }

    /// Run each rule's actions on a background task instead of inline
    ///
    /// Actions of one rule still run in order; separate rules may overlap.
    pub fn detached(mut self, detached: bool) -> Self {
        self.detached = detached;
        self
    }

    #[cfg(test)]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run the actions of a fired rule
    pub async fn dispatch(&self, rule: &Rule) {
        if self.detached {
            self.spawn(rule);
        } else {
            run_actions(&*self.executor, rule).await;
        }
    }

    /// Run the actions of a fired rule on a background task
    pub fn spawn(&self, rule: &Rule) -> JoinHandle<()> {
        let executor = Arc::clone(&self.executor);
        let rule = rule.clone();
        tokio::spawn(async move {
            run_actions(&*executor, &rule).await;
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::os::unix::process::ExitStatusExt;
    use std::sync::Mutex;

    use super::*;

    /// Records every command and fails those listed in `failing`
    #[derive(Debug, Default)]
    pub struct RecordingExecutor {
        pub executed: Mutex<Vec<String>>,
        pub failing: Vec<String>,
    }

    impl RecordingExecutor {
        pub fn failing(commands: &[&str]) -> Self {
            Self {
                executed: Mutex::new(Vec::new()),
                failing: commands.iter().map(|c| c.to_string()).collect(),
            }
        }

        pub fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    impl CommandExecutor for RecordingExecutor {
        async fn execute(&self, command: &str) -> Result<(), ActionError> {
            self.executed.lock().unwrap().push(command.to_string());
            if self.failing.iter().any(|c| c == command) {
                return Err(ActionError::ExitStatus {
                    command: command.to_string(),
                    status: ExitStatus::from_raw(1 << 8),
                });
            }
            Ok(())
        }
    }
}
