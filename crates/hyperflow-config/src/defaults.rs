//! Default rule document generation

use std::path::Path;

use crate::error::ConfigError;
use crate::model::{Action, Condition, Operator, Rule, RuleSet, Trigger};

/// The document written on first start when none exists
pub fn default_rules() -> RuleSet {
    RuleSet::new(vec![Rule {
        id: "wf_001".to_string(),
        name: "Auto-move Spotify to workspace 5".to_string(),
        enabled: true,
        trigger: Trigger {
            event_type: "openwindow".to_string(),
            debounce_ms: 100,
        },
        conditions: vec![Condition {
            property: "class".to_string(),
            operator: Operator::Equals,
            value: "spotify".to_string(),
        }],
        actions: vec![Action {
            command: "hyprctl dispatch movetoworkspace 5".to_string(),
        }],
    }])
}

/// Render a rule set as a pretty-printed JSON document
pub fn render_rules(rules: &RuleSet) -> Result<String, ConfigError> {
    let mut content = serde_json::to_string_pretty(rules).map_err(ConfigError::Serialize)?;
    content.push('\n');
    Ok(content)
}

/// Write the default document to `path`, creating parent directories.
///
/// Returns the rules that were written.
pub fn write_default_rules(path: &Path) -> Result<RuleSet, ConfigError> {
    let rules = default_rules();
    let content = render_rules(&rules)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    tracing::info!(path = %path.display(), "Created default rule document");

    Ok(rules)
}
