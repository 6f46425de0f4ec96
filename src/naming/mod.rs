//! Output file naming.
//!
//! # Architecture
//!
//! - **sanitize**: strips characters that are illegal in file names
//! - **template**: expands a `${TOKEN}` naming template per segment
//! - **validate**: checks a batch of candidate names for a target platform

mod sanitize;
mod template;
mod validate;

pub use sanitize::{sanitize_file_name, truncate_chars};
pub use template::{expand_template, TemplateContext, DEFAULT_TEMPLATE};
pub use validate::{
    PathProblem, PathProblemKind, PathValidator, SameNameWarning, ValidationReport,
};
