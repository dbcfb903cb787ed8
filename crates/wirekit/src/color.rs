//! CSS color values.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS color such as `#4f46e5`, `rgb(0, 0, 0)` or `tomato`.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parse a CSS color string.
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Color { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        svg::node::Value::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_css_colors() {
        assert!(Color::new("#4f46e5").is_ok());
        assert!(Color::new("#fff").is_ok());
        assert!(Color::new("tomato").is_ok());
        assert!(Color::new("rgb(10, 20, 30)").is_ok());
    }

    #[test]
    fn test_rejects_non_colors() {
        let err = Color::new("brand").unwrap_err();
        assert!(err.contains("`brand`"));
    }
}
