//! JSON rule document parser

use std::path::Path;

use crate::error::ConfigError;
use crate::model::RuleSet;

/// Convert a 1-indexed line and column to a byte offset
///
/// Positions past the end of the line or the document are clamped, and the
/// result always lands on a char boundary.
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;

    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within = column.saturating_sub(1).min(text.len());
            offset += within;
            break;
        }
        offset += text.len();
    }

    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn parse_error(content: &str, source: serde_json::Error) -> ConfigError {
    let line = source.line();
    let column = source.column();
    let offset = line_col_to_offset(content, line, column);
    let len = usize::from(offset < content.len());

    ConfigError::ParseError {
        line,
        column,
        src: content.to_string(),
        span: miette::SourceSpan::from((offset, len)),
        source,
    }
}

/// Parse a rule document from the given path
pub fn parse_rules(path: &Path) -> Result<RuleSet, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let rules = parse_rules_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        rules = rules.len(),
        "Parsed rule document"
    );
    Ok(rules)
}

/// Parse a rule document from a string
pub fn parse_rules_str(content: &str) -> Result<RuleSet, ConfigError> {
    serde_json::from_str(content).map_err(|e| parse_error(content, e))
}
