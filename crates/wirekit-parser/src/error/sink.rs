//! Injected reporting of diagnostics.

use crate::error::Diagnostic;

/// Receives diagnostics as they are reported.
///
/// Stages never log diagnostics themselves; hosts that want them logged,
/// printed or forwarded install a sink.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);

    /// Report every diagnostic in `diagnostics`, in order.
    fn report_all(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&Diagnostic),
{
    fn report(&mut self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_receives_all() {
        let mut seen = Vec::new();
        let mut sink = |diagnostic: &Diagnostic| seen.push(diagnostic.message().to_string());

        sink.report_all(&[Diagnostic::error("a"), Diagnostic::warning("b")]);

        assert_eq!(seen, vec!["a", "b"]);
    }
}
