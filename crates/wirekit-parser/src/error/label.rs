//! Labeled source spans for diagnostic messages.

use wirekit_core::span::Span;

/// A labeled span in source code.
///
/// - **Primary labels** mark the main location of a diagnostic.
/// - **Secondary labels** add context, such as "first used here".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(10..20), "duplicate here");
        let secondary = Label::secondary(Span::new(5..15), "first used here");

        assert_eq!(primary.span().start(), 10);
        assert_eq!(primary.message(), "duplicate here");
        assert!(primary.is_primary());
        assert!(secondary.is_secondary());
    }
}
