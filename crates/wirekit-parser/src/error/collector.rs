//! Bounded collector for diagnostics produced during one run.
//!
//! Every stage reports into a [`DiagnosticCollector`] instead of failing on
//! the first problem. The collector keeps at most `limit` entries; anything
//! emitted after that is dropped without a marker.

use crate::error::{Diagnostic, ParseError};

/// Default number of diagnostics kept per run.
pub const DEFAULT_DIAGNOSTIC_LIMIT: usize = 10;

/// A bounded, append-only collection of diagnostics.
///
/// # Example
///
/// ```
/// # use wirekit_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};
///
/// let mut collector = DiagnosticCollector::with_limit(1);
/// assert!(collector.emit(Diagnostic::from_code(ErrorCode::E012, "unknown component `rect`")));
/// assert!(!collector.emit(Diagnostic::from_code(ErrorCode::E012, "unknown component `oval`")));
/// assert_eq!(collector.len(), 1);
/// ```
#[derive(Debug)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    limit: usize,
    error_count: usize,
    warning_count: usize,
    dropped: usize,
}

impl Default for DiagnosticCollector {
    fn default() -> Self {
        Self::with_limit(DEFAULT_DIAGNOSTIC_LIMIT)
    }
}

impl DiagnosticCollector {
    /// Create a new empty collector with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty collector that keeps at most `limit` diagnostics.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            diagnostics: Vec::new(),
            limit,
            error_count: 0,
            warning_count: 0,
            dropped: 0,
        }
    }

    /// Emit a diagnostic to this collector.
    ///
    /// Returns `false` if the collector was full and the diagnostic dropped.
    pub fn emit(&mut self, diagnostic: Diagnostic) -> bool {
        if self.is_full() {
            self.dropped += 1;
            return false;
        }
        if diagnostic.severity().is_error() {
            self.error_count += 1;
        } else if diagnostic.severity().is_warning() {
            self.warning_count += 1;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    /// Emit every diagnostic in `diagnostics`, in order, until full.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    pub fn is_full(&self) -> bool {
        self.diagnostics.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of error-severity diagnostics kept.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of warning-severity diagnostics kept.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Number of diagnostics dropped because the collector was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector and return the kept diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection and return a result.
    ///
    /// - If any error was kept, returns `Err(ParseError)` with all diagnostics.
    /// - Otherwise returns `Ok` with the remaining warnings and infos.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.error_count > 0 {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
