//! PID file bookkeeping for the CLI's start/stop/reload commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A PID file holding this process's id
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Write the current process id to `path`, creating parent directories
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory {}", parent.display())
            })?;
        }

        std::fs::write(path, std::process::id().to_string())
            .with_context(|| format!("Failed to write PID file {}", path.display()))?;

        tracing::debug!("Wrote PID file {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("Failed to remove PID file on shutdown: {}", e);
            }
        }
    }
}
