//! Error codes for the Wirekit diagnostic system.
//!
//! Codes are grouped in stable ranges that editor gutters and CI linters may
//! rely on:
//! - `E001`-`E010` - Lexical errors
//! - `E011`-`E020` - Parser syntax errors
//! - `E101`-`E199` - Property validation
//! - `E201`-`E299` - Semantic errors
//! - `E301`-`E399` - Layout errors
//! - `W501`-`W599` - Performance and overlap warnings

use std::fmt;

use crate::error::Severity;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E001-E010)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but the line ended first.
    E001,

    /// Invalid token.
    ///
    /// A character that starts no token, or a dedent to an indentation level
    /// that was never opened.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are `\\`, `\"`, `\n` and `\t`. Unknown escapes are kept
    /// literally.
    E003,

    /// Invalid number.
    ///
    /// A number runs directly into letters, e.g. `12abc`. A trailing `px`
    /// unit is accepted.
    E004,

    // =========================================================================
    // Parser Syntax Errors (E011-E020)
    // =========================================================================
    /// Unexpected token.
    E011,

    /// Unknown component.
    ///
    /// A line does not start with a component keyword, `style`, `let` or `when`.
    E012,

    /// Missing label.
    ///
    /// The component requires a quoted label.
    E013,

    /// Unclosed block.
    ///
    /// A `{` was never matched by `}`.
    E014,

    /// Invalid selector.
    E015,

    /// Invalid breakpoint condition.
    E016,

    /// Unexpected indent.
    ///
    /// An indented block has no container to belong to.
    E017,

    // =========================================================================
    // Property Validation (E101-E199)
    // =========================================================================
    /// Unknown property for this component.
    E101,

    /// Property value has the wrong kind.
    E102,

    /// Style declaration outside the allowed set.
    E103,

    /// Placement value below 1.
    E104,

    // =========================================================================
    // Semantic Errors (E201-E299)
    // =========================================================================
    /// Duplicate id.
    E201,

    /// Undefined variable.
    E202,

    /// Breakpoint conditions can never hold together.
    E203,

    /// A `let` value references another variable.
    E204,

    // =========================================================================
    // Layout Errors (E301-E399)
    // =========================================================================
    /// Placement tokens on a node whose parent is not a grid.
    E301,

    /// Placement does not fit in the grid.
    E302,

    /// Placement overlaps cells already taken.
    E303,

    /// Children overflow the content box after shrinking.
    E304,

    // =========================================================================
    // Performance and Overlap Warnings (W501-W599)
    // =========================================================================
    /// Node count above the warning threshold.
    W501,

    /// Node count above the limit.
    W502,

    /// Two breakpoints can match the same width.
    W503,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E011 => "E011",
            ErrorCode::E012 => "E012",
            ErrorCode::E013 => "E013",
            ErrorCode::E014 => "E014",
            ErrorCode::E015 => "E015",
            ErrorCode::E016 => "E016",
            ErrorCode::E017 => "E017",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::W501 => "W501",
            ErrorCode::W502 => "W502",
            ErrorCode::W503 => "W503",
        }
    }

    /// Returns the symbolic name of the code (e.g., "DUPLICATE_ID").
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "UNTERMINATED_STRING",
            ErrorCode::E002 => "INVALID_TOKEN",
            ErrorCode::E003 => "INVALID_ESCAPE",
            ErrorCode::E004 => "INVALID_NUMBER",
            ErrorCode::E011 => "UNEXPECTED_TOKEN",
            ErrorCode::E012 => "UNKNOWN_COMPONENT",
            ErrorCode::E013 => "MISSING_LABEL",
            ErrorCode::E014 => "UNCLOSED_BLOCK",
            ErrorCode::E015 => "INVALID_SELECTOR",
            ErrorCode::E016 => "INVALID_CONDITION",
            ErrorCode::E017 => "UNEXPECTED_INDENT",
            ErrorCode::E101 => "UNKNOWN_PROPERTY",
            ErrorCode::E102 => "INVALID_PROPERTY_VALUE",
            ErrorCode::E103 => "UNKNOWN_STYLE_PROPERTY",
            ErrorCode::E104 => "INVALID_PLACEMENT",
            ErrorCode::E201 => "DUPLICATE_ID",
            ErrorCode::E202 => "UNDEFINED_VARIABLE",
            ErrorCode::E203 => "UNSATISFIABLE_BREAKPOINT",
            ErrorCode::E204 => "NESTED_VARIABLE",
            ErrorCode::E301 => "PLACEMENT_WITHOUT_GRID",
            ErrorCode::E302 => "PLACEMENT_OUT_OF_BOUNDS",
            ErrorCode::E303 => "INVALID_PLACEMENT_COMBINATION",
            ErrorCode::E304 => "CONTENT_OVERFLOW",
            ErrorCode::W501 => "NODE_COUNT_WARNING",
            ErrorCode::W502 => "NODE_COUNT_LIMIT",
            ErrorCode::W503 => "BREAKPOINT_OVERLAP",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "invalid token",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid number",
            ErrorCode::E011 => "unexpected token",
            ErrorCode::E012 => "unknown component",
            ErrorCode::E013 => "missing label",
            ErrorCode::E014 => "unclosed block",
            ErrorCode::E015 => "invalid selector",
            ErrorCode::E016 => "invalid condition",
            ErrorCode::E017 => "unexpected indent",
            ErrorCode::E101 => "unknown property",
            ErrorCode::E102 => "invalid property value",
            ErrorCode::E103 => "unknown style property",
            ErrorCode::E104 => "invalid placement",
            ErrorCode::E201 => "duplicate id",
            ErrorCode::E202 => "undefined variable",
            ErrorCode::E203 => "unsatisfiable breakpoint",
            ErrorCode::E204 => "nested variable reference",
            ErrorCode::E301 => "placement outside a grid",
            ErrorCode::E302 => "placement out of bounds",
            ErrorCode::E303 => "overlapping placement",
            ErrorCode::E304 => "content overflow",
            ErrorCode::W501 => "node count above warning threshold",
            ErrorCode::W502 => "node count above limit",
            ErrorCode::W503 => "overlapping breakpoints",
        }
    }

    /// The severity diagnostics with this code are reported at.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorCode::E003
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E203
            | ErrorCode::E302
            | ErrorCode::E303
            | ErrorCode::E304
            | ErrorCode::W501
            | ErrorCode::W502
            | ErrorCode::W503 => Severity::Warning,
            ErrorCode::E301 => Severity::Info,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E201.to_string(), "E201");
        assert_eq!(ErrorCode::W503.to_string(), "W503");
    }

    #[test]
    fn test_error_code_name() {
        assert_eq!(ErrorCode::E201.name(), "DUPLICATE_ID");
        assert_eq!(ErrorCode::E302.name(), "PLACEMENT_OUT_OF_BOUNDS");
    }

    #[test]
    fn test_error_code_severity() {
        assert!(ErrorCode::E001.severity().is_error());
        assert!(ErrorCode::E103.severity().is_warning());
        assert_eq!(ErrorCode::E301.severity(), Severity::Info);
        assert!(ErrorCode::W502.severity().is_warning());
    }
}
