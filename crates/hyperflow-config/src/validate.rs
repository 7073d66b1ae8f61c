//! Non-fatal checks on a loaded rule set
//!
//! None of these stop a document from loading; they point at rules that
//! can never fire or that behave surprisingly.

use std::fmt;

use crate::fields::EventKind;
use crate::model::{Operator, RuleSet};

/// A problem found in one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Id of the offending rule, or its name when the id is empty
    pub rule: String,
    pub message: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule '{}': {}", self.rule, self.message)
    }
}

pub fn validate(rules: &RuleSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for id in rules.duplicate_ids() {
        warnings.push(ValidationWarning {
            rule: id.to_string(),
            message: "id is used by more than one rule; they will share debounce state"
                .to_string(),
        });
    }

    for rule in rules {
        let label = if rule.id.is_empty() {
            rule.name.clone()
        } else {
            rule.id.clone()
        };
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                rule: label.clone(),
                message,
            })
        };

        let kind = EventKind::from_name(&rule.trigger.event_type);
        if kind.is_none() {
            warn(format!(
                "trigger type '{}' has no known fields; conditions on it never match",
                rule.trigger.event_type
            ));
        }

        for condition in &rule.conditions {
            if let Operator::Unknown(name) = &condition.operator {
                warn(format!("unknown operator '{}'", name));
            }
            if let Some(kind) = kind {
                if kind.field_index(&condition.property).is_none() {
                    warn(format!(
                        "'{}' events have no property '{}' (available: {})",
                        kind.name(),
                        condition.property,
                        kind.fields().join(", ")
                    ));
                }
            }
        }

        if rule.actions.is_empty() {
            warn("no actions".to_string());
        }
        if rule.actions.iter().any(|a| a.command.trim().is_empty()) {
            warn("empty action command will be skipped".to_string());
        }
    }

    warnings
}
