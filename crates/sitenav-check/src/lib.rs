//! sitenav Check Library
//!
//! Validates the navigation model against the collected content tree.
//!
//! # Modules
//!
//! - [`diagnostic`] - Findings and the report that gathers them
//! - [`checker`] - The individual checks

pub mod checker;
pub mod diagnostic;

pub use checker::LinkChecker;
pub use diagnostic::{Diagnostic, DiagnosticKind, Report, Severity};
