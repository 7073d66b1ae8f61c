use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Invalid rule document at line {line}, column {column}")]
    #[diagnostic(
        code(hyperflow::config::parse_error),
        help("the document must be a JSON array of rule objects")
    )]
    ParseError {
        line: usize,
        column: usize,
        #[source_code]
        src: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source]
        source: serde_json::Error,
    },

    #[error("Rule document not found: {}", path.display())]
    #[diagnostic(
        code(hyperflow::config::not_found),
        help("start the daemon once to create a default document")
    )]
    NotFound { path: PathBuf },

    #[error("Failed to serialize rule document: {0}")]
    #[diagnostic(code(hyperflow::config::serialize))]
    Serialize(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
