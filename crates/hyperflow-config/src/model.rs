//! Rule document data model
//!
//! The document is a JSON array of rules. Missing keys fall back to lenient
//! defaults so that hand-edited documents keep loading.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Ordered collection of rules loaded from one document
///
/// Rules are evaluated in document order. A reload builds a new `RuleSet`
/// rather than editing an existing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules with `enabled = true`
    pub fn enabled_count(&self) -> usize {
        self.rules.iter().filter(|r| r.enabled).count()
    }

    /// Rule ids that appear more than once, each reported once in first-seen order
    ///
    /// Duplicate ids share debounce state in the daemon.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) && !duplicates.contains(&rule.id.as_str()) {
                duplicates.push(rule.id.as_str());
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// A trigger-condition-action tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier, also the debounce key
    #[serde(default)]
    pub id: String,
    /// Display label
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub trigger: Trigger,
    /// ANDed; an empty list always passes
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_enabled() -> bool {
    true
}

/// The event type a rule listens for, plus its debounce window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type", default)]
    pub event_type: String,
    /// Minimum time between fires in milliseconds (0 disables debouncing)
    #[serde(rename = "debounce", default)]
    pub debounce_ms: u64,
}

/// A single predicate over one named event field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub property: String,
    #[serde(default = "Operator::missing")]
    pub operator: Operator,
    /// Expected value; numbers and booleans in the document are read as text
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: String,
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "condition value must be a string, got {other}"
        ))),
    }
}

/// Comparison applied between the event field and the expected value
///
/// Unrecognised operator names are kept as `Unknown` so the document still
/// loads; such conditions never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    Greater,
    Less,
    Unknown(String),
}

impl Operator {
    fn missing() -> Self {
        Self::Unknown(String::new())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Greater => "greater",
            Self::Less => "less",
            Self::Unknown(name) => name,
        }
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        match s {
            "equals" => Self::Equals,
            "contains" => Self::Contains,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "greater" => Self::Greater,
            "less" => Self::Less,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque shell command run when the rule fires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub command: String,
}
