//! Hyprland event socket discovery

use std::path::PathBuf;

use super::HyprError;

/// Environment variable naming the running Hyprland instance
const INSTANCE_SIGNATURE_ENV: &str = "HYPRLAND_INSTANCE_SIGNATURE";

/// Environment variable for the per-user runtime directory
const RUNTIME_DIR_ENV: &str = "XDG_RUNTIME_DIR";

/// File name of the event socket inside the instance directory
const EVENT_SOCKET_NAME: &str = ".socket2.sock";

/// Build the event socket path from the runtime directory and instance signature
fn event_socket_path(
    runtime_dir: Option<String>,
    signature: Option<String>,
) -> Result<PathBuf, HyprError> {
    let signature = signature
        .filter(|s| !s.is_empty())
        .ok_or(HyprError::EnvNotSet {
            var: INSTANCE_SIGNATURE_ENV,
        })?;
    let runtime_dir = runtime_dir
        .filter(|s| !s.is_empty())
        .ok_or(HyprError::EnvNotSet {
            var: RUNTIME_DIR_ENV,
        })?;

    Ok(PathBuf::from(runtime_dir)
        .join("hypr")
        .join(signature)
        .join(EVENT_SOCKET_NAME))
}

/// Discover the Hyprland event socket path from the environment
///
/// Reads `$XDG_RUNTIME_DIR` and `$HYPRLAND_INSTANCE_SIGNATURE` and checks
/// that `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`
/// exists.
///
/// # Errors
///
/// Returns `HyprError::EnvNotSet` if either variable is missing or empty.
/// Returns `HyprError::SocketNotFound` if the path doesn't exist.
pub fn get_socket_path() -> Result<PathBuf, HyprError> {
    let socket_path = event_socket_path(
        std::env::var(RUNTIME_DIR_ENV).ok(),
        std::env::var(INSTANCE_SIGNATURE_ENV).ok(),
    )?;

    if !socket_path.exists() {
        return Err(HyprError::SocketNotFound { path: socket_path });
    }

    Ok(socket_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let path = event_socket_path(
            Some("/run/user/1000".to_string()),
            Some("abc123_1700000000".to_string()),
        )
        .unwrap();

        assert_eq!(
            path,
            PathBuf::from("/run/user/1000/hypr/abc123_1700000000/.socket2.sock")
        );
    }

    #[test]
    fn test_missing_signature_is_reported_first() {
        let err = event_socket_path(None, None).unwrap_err();
        match err {
            HyprError::EnvNotSet { var } => assert_eq!(var, INSTANCE_SIGNATURE_ENV),
            other => panic!("Expected EnvNotSet, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_runtime_dir() {
        let err = event_socket_path(None, Some("sig".to_string())).unwrap_err();
        assert!(
            err.to_string().contains("XDG_RUNTIME_DIR"),
            "Error message should name the variable: {}",
            err
        );
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let err = event_socket_path(Some(String::new()), Some("sig".to_string())).unwrap_err();
        assert!(matches!(err, HyprError::EnvNotSet { .. }));
    }
}
