//! Rule matching: trigger type, debounce, then conditions

use std::time::Instant;

use hyperflow_config::{Rule, RuleSet};

use crate::condition::evaluate_all;
use crate::debounce::Debouncer;
use crate::hypr_ipc::Event;

/// Decides which rules fire for an event
///
/// Owns the debounce state, which lives only as long as the matcher; a
/// rule set reload starts a fresh one.
#[derive(Debug, Default)]
pub struct RuleMatcher {
    debouncer: Debouncer,
}

impl RuleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `rule` fires for `event` at `now`.
    ///
    /// The debounce gate runs before the conditions, so a rule whose trigger
    /// type matches spends its debounce slot even if a condition then
    /// fails. Changing that order changes which events fire.
    pub fn matches(&mut self, rule: &Rule, event: &Event, now: Instant) -> bool {
        if !rule.enabled {
            return false;
        }

        if rule.trigger.event_type != event.event_type {
            return false;
        }

        if !self
            .debouncer
            .should_fire(&rule.id, rule.trigger.debounce_ms, now)
        {
            tracing::debug!(rule = %rule.id, "Rule debounced");
            return false;
        }

        evaluate_all(&rule.conditions, event)
    }

    /// Every rule in `rules` that fires for `event`, in document order
    pub fn matching<'a>(&mut self, rules: &'a RuleSet, event: &Event, now: Instant) -> Vec<&'a Rule> {
        rules
            .iter()
            .filter(|rule| self.matches(rule, event, now))
            .collect()
    }

    /// Drop all debounce state
    pub fn reset(&mut self) {
        self.debouncer.reset();
    }
}
