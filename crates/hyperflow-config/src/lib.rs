//! Rule document parsing for hyperflow
//!
//! This crate handles loading the JSON workflow document that drives the
//! daemon, the per-event-type field table that gives positional event data
//! its property names, and generation of the default document.

mod defaults;
mod error;
mod fields;
mod model;
mod parser;
mod validate;

pub use defaults::{default_rules, render_rules, write_default_rules};
pub use error::ConfigError;
pub use fields::{field_index, EventKind};
pub use model::*;
pub use parser::{parse_rules, parse_rules_str};
pub use validate::{validate, ValidationWarning};
