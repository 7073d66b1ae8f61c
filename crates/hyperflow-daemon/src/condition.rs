//! Condition evaluation against a single event

use hyperflow_config::{Condition, Operator};

use crate::hypr_ipc::Event;

/// Parse an operand for numeric comparison, allowing surrounding whitespace
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

/// Compare an actual event value against an expected value
pub fn compare(operator: &Operator, actual: &str, expected: &str) -> bool {
    match operator {
        Operator::Equals => actual == expected,
        Operator::Contains => actual.contains(expected),
        Operator::StartsWith => actual.starts_with(expected),
        Operator::EndsWith => actual.ends_with(expected),
        Operator::Greater => match (parse_number(actual), parse_number(expected)) {
            (Some(a), Some(e)) => a > e,
            _ => false,
        },
        Operator::Less => match (parse_number(actual), parse_number(expected)) {
            (Some(a), Some(e)) => a < e,
            _ => false,
        },
        Operator::Unknown(_) => false,
    }
}

/// Evaluate one condition against an event
///
/// A property that cannot be resolved for the event's type, or that the
/// event line was too short to carry, makes the condition false.
pub fn evaluate(condition: &Condition, event: &Event) -> bool {
    match event.field(&condition.property) {
        Some(actual) => compare(&condition.operator, actual, &condition.value),
        None => false,
    }
}

/// True if every condition holds, stopping at the first that does not
pub fn evaluate_all(conditions: &[Condition], event: &Event) -> bool {
    conditions.iter().all(|c| evaluate(c, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypr_ipc::parse_event;

    fn spotify_event() -> Event {
        parse_event("openwindow>>0xdead,1,spotify,Spotify - Song").unwrap()
    }

    fn condition(property: &str, operator: &str, value: &str) -> Condition {
        Condition {
            property: property.to_string(),
            operator: Operator::from(operator),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_equals() {
        let event = spotify_event();
        assert!(evaluate(&condition("class", "equals", "spotify"), &event));
        assert!(!evaluate(&condition("class", "equals", "firefox"), &event));
        assert!(!evaluate(&condition("class", "equals", "Spotify"), &event));
    }

    #[test]
    fn test_contains() {
        let event = spotify_event();
        assert!(evaluate(&condition("title", "contains", "Song"), &event));
        assert!(evaluate(&condition("title", "contains", ""), &event));
        assert!(!evaluate(&condition("title", "contains", "song"), &event));
    }

    #[test]
    fn test_prefix_and_suffix() {
        let event = spotify_event();
        assert!(evaluate(&condition("title", "startswith", "Spotify"), &event));
        assert!(!evaluate(&condition("title", "startswith", "Song"), &event));
        assert!(evaluate(&condition("address", "endswith", "dead"), &event));
        assert!(!evaluate(&condition("address", "endswith", "0x"), &event));
    }

    #[test]
    fn test_numeric_comparisons() {
        let event = spotify_event();
        assert!(evaluate(&condition("workspace", "greater", "0"), &event));
        assert!(!evaluate(&condition("workspace", "greater", "1"), &event));
        assert!(evaluate(&condition("workspace", "less", "1.5"), &event));
        assert!(!evaluate(&condition("workspace", "less", "-3"), &event));
    }

    #[test]
    fn test_non_numeric_operands_are_false() {
        let event = spotify_event();
        assert!(!evaluate(&condition("workspace", "greater", "abc"), &event));
        assert!(!evaluate(&condition("class", "less", "10"), &event));
        assert!(!evaluate(&condition("workspace", "less", ""), &event));
    }

    #[test]
    fn test_numeric_operands_allow_padding() {
        assert!(compare(&Operator::Greater, " 10 ", "9"));
        assert!(compare(&Operator::Less, "2", "1e3"));
    }

    #[test]
    fn test_unknown_operator_is_false() {
        let event = spotify_event();
        assert!(!evaluate(&condition("class", "matches", "spotify"), &event));
        assert!(!evaluate(&condition("class", "", "spotify"), &event));
    }

    #[test]
    fn test_unresolved_property_is_false() {
        let event = spotify_event();
        assert!(!evaluate(&condition("layout", "equals", "us"), &event));

        let unknown = parse_event("fullscreen>>1").unwrap();
        assert!(!evaluate(&condition("state", "equals", "1"), &unknown));
    }

    #[test]
    fn test_short_event_line_is_false() {
        let short = parse_event("openwindow>>0xdead,1").unwrap();
        assert!(!evaluate(&condition("title", "contains", ""), &short));
    }

    #[test]
    fn test_conditions_are_anded() {
        let event = spotify_event();
        let pass = condition("class", "equals", "spotify");
        let fail = condition("workspace", "equals", "2");

        assert!(evaluate_all(&[], &event));
        assert!(evaluate_all(&[pass.clone()], &event));
        assert!(!evaluate_all(&[pass.clone(), fail.clone()], &event));
        assert!(!evaluate_all(&[fail, pass], &event));
    }
}
