//! Error and diagnostic system for the Wirekit pipeline.
//!
//! This module provides:
//! - Stable error codes grouped in ranges
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - A bounded collector shared by every stage
//! - An injectable sink for reporting
//!
//! # Example
//!
//! ```
//! # use wirekit_parser::error::{Diagnostic, ErrorCode};
//! # use wirekit_core::span::Span;
//!
//! let diag = Diagnostic::error("duplicate id `cta`")
//!     .with_code(ErrorCode::E201)
//!     .with_label(Span::new(100..104), "duplicate id")
//!     .with_secondary_label(Span::new(50..54), "first used here")
//!     .with_help("ids must be unique within a document");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;
mod sink;

pub use collector::{DEFAULT_DIAGNOSTIC_LIMIT, DiagnosticCollector};
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
pub use sink::DiagnosticSink;
