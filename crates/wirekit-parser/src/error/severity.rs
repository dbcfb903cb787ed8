//! Severity levels for diagnostics.

use std::fmt;

/// The severity level of a diagnostic.
///
/// No severity stops a stage: even an [`Severity::Error`] is attached to an
/// otherwise complete output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Informational note, e.g. an ignored annotation.
    Info,

    /// An advisory issue; the output is still what the author meant.
    Warning,

    /// The source is malformed and part of it was skipped or replaced.
    Error,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
