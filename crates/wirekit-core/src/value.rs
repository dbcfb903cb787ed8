//! Literal values carried by component properties, style declarations and
//! variables.

use std::fmt;

use serde::Serialize;

/// A property or declaration value.
///
/// Identifiers and color literals are both stored as [`Value::Text`]; the
/// consumer decides how to interpret them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f32),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// A short name of the value's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "a number",
            Value::Text(_) => "text",
            Value::Bool(_) => "a boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(number) if number.fract() == 0.0 => write!(f, "{}", *number as i64),
            Value::Number(number) => write!(f, "{number}"),
            Value::Text(text) => write!(f, "{text}"),
            Value::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<f32> for Value {
    fn from(number: f32) -> Self {
        Value::Number(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_drops_integral_fraction() {
        assert_eq!(Value::Number(12.0).to_string(), "12");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::from("brand").to_string(), "brand");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Number(3.0).as_number(), Some(3.0));
        assert_eq!(Value::Number(3.0).as_text(), None);
        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
    }
}
