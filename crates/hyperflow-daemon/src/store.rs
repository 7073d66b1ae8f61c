//! Live rule set and its reload from disk

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyperflow_config::{parse_rules, validate, ConfigError, RuleSet};

fn log_loaded(path: &Path, rules: &RuleSet) {
    tracing::info!(
        "Loaded {} rule(s) ({} enabled) from {}",
        rules.len(),
        rules.enabled_count(),
        path.display()
    );
    for warning in validate(rules) {
        tracing::warn!("{}", warning);
    }
}

/// Owns the document path and the current rule set
///
/// A reload swaps in a complete new `RuleSet` or leaves the current one
/// untouched; readers never see a partial update.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    rules: Arc<RuleSet>,
}

impl ConfigStore {
    /// Load the document at `path`
    ///
    /// # Errors
    ///
    /// Returns the parse or IO error; there is no previous rule set to fall
    /// back on at this point.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let rules = parse_rules(path)?;
        log_loaded(path, &rules);
        Ok(Self::from_rules(path, rules))
    }

    pub fn from_rules(path: &Path, rules: RuleSet) -> Self {
        Self {
            path: path.to_path_buf(),
            rules: Arc::new(rules),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared handle to the current rule set
    pub fn current(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules)
    }

    /// Re-read the document and replace the rule set.
    ///
    /// # Errors
    ///
    /// On any error, including a missing document, the current rule set is
    /// kept and the error returned.
    pub fn reload(&mut self) -> Result<Arc<RuleSet>, ConfigError> {
        let rules = parse_rules(&self.path)?;
        log_loaded(&self.path, &rules);
        self.rules = Arc::new(rules);
        Ok(self.current())
    }
}
