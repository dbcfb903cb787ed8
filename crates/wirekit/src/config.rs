//! Configuration types for Wirekit compilation.
//!
//! Every section is optional when deserialized; missing sections and fields
//! fall back to the defaults documented on each field.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`ParseConfig`] - Node-count thresholds and the diagnostic cap.
//! - [`LayoutConfig`] - Viewport size and spacing unit.
//! - [`StyleConfig`] - Background color and default skin.
//!
//! # Example
//!
//! ```
//! # use wirekit::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().viewport_width(), 1024.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use wirekit_parser::ParseOptions;

use crate::{color::Color, layout::LayoutOptions};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    parse: ParseConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(parse: ParseConfig, layout: LayoutConfig, style: StyleConfig) -> Self {
        Self {
            parse,
            layout,
            style,
        }
    }

    pub fn parse(&self) -> &ParseConfig {
        &self.parse
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replace the configured viewport size.
    pub fn with_viewport(mut self, width: Option<f32>, height: Option<f32>) -> Self {
        if let Some(width) = width {
            self.layout.viewport_width = width;
        }
        if let Some(height) = height {
            self.layout.viewport_height = height;
        }
        self
    }
}

/// `[parse]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Node count that triggers `NODE_COUNT_LIMIT`. Default 1000.
    max_nodes: usize,
    /// Node count that triggers `NODE_COUNT_WARNING`. Default 300.
    warn_threshold: usize,
    /// Maximum diagnostics kept per stage. Default 10.
    max_diagnostics: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            max_nodes: options.max_nodes,
            warn_threshold: options.warn_threshold,
            max_diagnostics: options.max_diagnostics,
        }
    }
}

impl ParseConfig {
    pub fn max_diagnostics(&self) -> usize {
        self.max_diagnostics
    }

    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            max_nodes: self.max_nodes,
            warn_threshold: self.warn_threshold,
            max_diagnostics: self.max_diagnostics,
        }
    }
}

/// `[layout]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    viewport_width: f32,
    viewport_height: f32,
    /// Pixels per spacing unit.
    unit: f32,
    /// Gap between top-level nodes, in units.
    root_gap_units: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let options = LayoutOptions::default();
        Self {
            viewport_width: options.viewport_width,
            viewport_height: options.viewport_height,
            unit: options.unit,
            root_gap_units: options.root_gap_units,
        }
    }
}

impl LayoutConfig {
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            unit: self.unit,
            root_gap_units: self.root_gap_units,
            ..LayoutOptions::default()
        }
    }
}

/// `[style]` section. Unset fields fall back to the document's own styles.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    /// Skin used when the document does not choose one.
    #[serde(default)]
    skin: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid CSS color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("invalid background color in config: {err}"))
    }

    pub fn skin(&self) -> Option<&str> {
        self.skin.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stage_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.parse().options(), ParseOptions::default());
        assert_eq!(config.layout().options(), LayoutOptions::default());
        assert_eq!(config.style().skin(), None);
        assert!(matches!(config.style().background_color(), Ok(None)));
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = toml::from_str(
            r##"
            [parse]
            max_diagnostics = 25

            [layout]
            viewport_width = 390

            [style]
            background_color = "#f8fafc"
            skin = "sketch"
            "##,
        )
        .expect("valid config");

        assert_eq!(config.parse().max_diagnostics(), 25);
        assert_eq!(config.parse().options().max_nodes, 1000);
        assert_eq!(config.layout().viewport_width(), 390.0);
        assert_eq!(config.layout().viewport_height(), 768.0);
        assert_eq!(config.style().skin(), Some("sketch"));
        assert!(matches!(config.style().background_color(), Ok(Some(_))));
    }

    #[test]
    fn test_invalid_background_color() {
        let config: AppConfig =
            toml::from_str("[style]\nbackground_color = \"not-a-color\"\n").expect("valid toml");

        let err = config.style().background_color().unwrap_err();
        assert!(err.starts_with("invalid background color in config"));
    }

    #[test]
    fn test_viewport_override() {
        let config = AppConfig::default().with_viewport(Some(400.0), None);

        assert_eq!(config.layout().viewport_width(), 400.0);
        assert_eq!(config.layout().viewport_height(), 768.0);
    }
}
