//! The core diagnostic type.
//!
//! A [`Diagnostic`] is a plain value: building one has no side effects.
//! Reporting it is the job of a [`DiagnosticSink`](super::DiagnosticSink).

use std::fmt;

use wirekit_core::span::{Location, Span};

use crate::error::{ErrorCode, Label, Severity};

/// A diagnostic message with source position information.
///
/// The wire shape of a diagnostic is
/// `{code, severity, message, line, column, hint?}`; `labels` carry byte
/// spans for rich rendering.
///
/// # Example
///
/// ```text
/// error[E201]: duplicate id `cta`
///   --> login.wire:7:10
///    |
///  7 | button "Go" #cta
///    |             ^^^^ duplicate id
///    |
///  3 | button "Save" #cta
///    |               ---- first used here
///    |
///    = help: ids must be unique; rename one of them
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    location: Location,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use wirekit_parser::error::{Diagnostic, ErrorCode};
    /// # use wirekit_core::span::{Location, Span};
    ///
    /// let diag = Diagnostic::error("undefined variable `$brand`")
    ///     .with_code(ErrorCode::E202)
    ///     .with_label(Span::new(12..18), "not defined")
    ///     .with_help("declare it first with `let brand = ...`")
    ///     .at(Location::new(3, 9));
    /// assert_eq!(diag.line(), 3);
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an informational diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Create a diagnostic at the severity `code` is reported at.
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.severity(), message).with_code(code)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// 1-based line of the diagnostic.
    pub fn line(&self) -> usize {
        self.location.line()
    }

    /// 1-based column of the diagnostic.
    pub fn column(&self) -> usize {
        self.location.column()
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Get the help text (the hint), if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the line/column position.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: Location::new(1, 1),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::error("test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert_eq!((diag.line(), diag.column()), (1, 1));
    }

    #[test]
    fn test_diagnostic_from_code_uses_code_severity() {
        let diag = Diagnostic::from_code(ErrorCode::E103, "unknown style property `margin`");
        assert!(diag.severity().is_warning());
        assert_eq!(diag.code(), Some(ErrorCode::E103));

        let diag = Diagnostic::from_code(ErrorCode::E301, "placement ignored");
        assert_eq!(diag.severity(), Severity::Info);
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("duplicate id `cta`")
            .with_code(ErrorCode::E201)
            .with_label(Span::new(40..44), "duplicate id")
            .with_secondary_label(Span::new(10..14), "first used here")
            .with_help("ids must be unique")
            .at(Location::new(7, 10));

        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(40..44)));
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.help(), Some("ids must be unique"));
        assert_eq!(diag.location(), Location::new(7, 10));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::from_code(ErrorCode::E202, "undefined variable `$x`");
        assert_eq!(diag.to_string(), "error[E202]: undefined variable `$x`");
        assert_eq!(Diagnostic::info("note").to_string(), "info: note");
    }
}
