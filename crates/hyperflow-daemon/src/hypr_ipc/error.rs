//! Error types for Hyprland IPC operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the Hyprland event socket
#[derive(Debug, Error)]
pub enum HyprError {
    /// A required environment variable is not set
    #[error("{var} environment variable not set - is Hyprland running?")]
    EnvNotSet { var: &'static str },

    /// The socket path does not exist
    #[error("Hyprland event socket not found at {path}")]
    SocketNotFound { path: PathBuf },

    /// Failed to connect to the socket
    #[error("Failed to connect to Hyprland event socket at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read from the socket
    #[error("Failed to read from Hyprland event socket: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Maximum retry attempts exceeded
    #[error("Failed to connect to Hyprland after {attempts} attempts")]
    MaxRetriesExceeded { attempts: u32 },
}
