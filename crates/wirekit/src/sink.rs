//! A [`DiagnosticSink`] that forwards to the `log` facade.

use log::Level;

use wirekit_parser::error::{Diagnostic, DiagnosticSink, Severity};

/// Logs each diagnostic at a level derived from its severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    fn level(severity: Severity) -> Level {
        match severity {
            Severity::Error => Level::Error,
            Severity::Warning => Level::Warn,
            Severity::Info => Level::Info,
        }
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        let code = diagnostic.code().map_or("-", |code| code.as_str());
        log::log!(
            Self::level(diagnostic.severity()),
            code,
            line = diagnostic.line(),
            column = diagnostic.column();
            "{}",
            diagnostic.message()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_follows_severity() {
        assert_eq!(LogSink::level(Severity::Error), Level::Error);
        assert_eq!(LogSink::level(Severity::Warning), Level::Warn);
        assert_eq!(LogSink::level(Severity::Info), Level::Info);
    }
}
