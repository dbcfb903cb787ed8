//! The component catalog.
//!
//! Every node in a document is one of the [`ComponentKind`]s listed here. The
//! catalog is closed: it fixes which kinds are containers, which require a
//! label, their default geometry, and which properties each kind accepts
//! ([`ComponentKind::prop_kind`]). [`Props`] only admits properties that pass
//! this schema.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::{geometry::Size, value::Value};

/// The kind of a component, parsed from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    // Containers
    Grid,
    HStack,
    VStack,
    ZStack,
    Section,
    Card,

    // Text
    Text,
    Heading,
    Link,
    Badge,

    // Controls
    Button,
    Input,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Toggle,

    // Media and decoration
    Image,
    Avatar,
    Icon,
    Progress,
    Spacer,
    Divider,
}

/// The value kind a property accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Number,
    Text,
    Flag,
    /// One of a fixed set of identifiers.
    Keyword(&'static [&'static str]),
}

impl PropKind {
    /// Human-readable description of the expected value.
    pub fn describe(&self) -> String {
        match self {
            PropKind::Number => "a number".to_string(),
            PropKind::Text => "text".to_string(),
            PropKind::Flag => "`true` or `false`".to_string(),
            PropKind::Keyword(options) => format!("one of `{}`", options.join("|")),
        }
    }
}

/// Horizontal alignment keywords accepted by `at:`.
pub const HORIZONTAL_ALIGNMENTS: &[&str] = &["start", "center", "end", "stretch"];

/// Vertical alignment keywords accepted by `valign:`.
pub const VERTICAL_ALIGNMENTS: &[&str] = &["start", "center", "end"];

/// Visual variants accepted by `variant:`.
pub const VARIANTS: &[&str] = &["primary", "secondary", "ghost", "danger"];

/// Default padding and gap of a container, in spacing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub pad: f32,
    pub gap: f32,
}

impl ComponentKind {
    /// Every component kind, in catalog order.
    pub const ALL: &'static [ComponentKind] = &[
        ComponentKind::Grid,
        ComponentKind::HStack,
        ComponentKind::VStack,
        ComponentKind::ZStack,
        ComponentKind::Section,
        ComponentKind::Card,
        ComponentKind::Text,
        ComponentKind::Heading,
        ComponentKind::Link,
        ComponentKind::Badge,
        ComponentKind::Button,
        ComponentKind::Input,
        ComponentKind::Textarea,
        ComponentKind::Select,
        ComponentKind::Checkbox,
        ComponentKind::Radio,
        ComponentKind::Toggle,
        ComponentKind::Image,
        ComponentKind::Avatar,
        ComponentKind::Icon,
        ComponentKind::Progress,
        ComponentKind::Spacer,
        ComponentKind::Divider,
    ];

    /// The keyword that introduces this component in source text.
    pub fn keyword(self) -> &'static str {
        match self {
            ComponentKind::Grid => "grid",
            ComponentKind::HStack => "hstack",
            ComponentKind::VStack => "vstack",
            ComponentKind::ZStack => "zstack",
            ComponentKind::Section => "section",
            ComponentKind::Card => "card",
            ComponentKind::Text => "text",
            ComponentKind::Heading => "heading",
            ComponentKind::Link => "link",
            ComponentKind::Badge => "badge",
            ComponentKind::Button => "button",
            ComponentKind::Input => "input",
            ComponentKind::Textarea => "textarea",
            ComponentKind::Select => "select",
            ComponentKind::Checkbox => "checkbox",
            ComponentKind::Radio => "radio",
            ComponentKind::Toggle => "toggle",
            ComponentKind::Image => "image",
            ComponentKind::Avatar => "avatar",
            ComponentKind::Icon => "icon",
            ComponentKind::Progress => "progress",
            ComponentKind::Spacer => "spacer",
            ComponentKind::Divider => "divider",
        }
    }

    /// Returns `true` if this kind lays out indented children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ComponentKind::Grid
                | ComponentKind::HStack
                | ComponentKind::VStack
                | ComponentKind::ZStack
                | ComponentKind::Section
                | ComponentKind::Card
        )
    }

    /// Returns `true` if a declaration of this kind must carry a label.
    pub fn requires_label(self) -> bool {
        matches!(
            self,
            ComponentKind::Text
                | ComponentKind::Heading
                | ComponentKind::Link
                | ComponentKind::Badge
                | ComponentKind::Button
                | ComponentKind::Input
                | ComponentKind::Textarea
                | ComponentKind::Select
                | ComponentKind::Checkbox
                | ComponentKind::Radio
                | ComponentKind::Toggle
        )
    }

    /// Returns `true` for controls that accept `disabled`.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            ComponentKind::Button
                | ComponentKind::Link
                | ComponentKind::Input
                | ComponentKind::Textarea
                | ComponentKind::Select
                | ComponentKind::Checkbox
                | ComponentKind::Radio
                | ComponentKind::Toggle
        )
    }

    /// Default pixel size of a leaf.
    ///
    /// A width of `None` means the leaf fills the available width. Containers
    /// have no default size and return `None`.
    pub fn default_size(self) -> Option<(Option<f32>, f32)> {
        let (width, height) = match self {
            ComponentKind::Text => (Some(160.0), 24.0),
            ComponentKind::Heading => (Some(240.0), 32.0),
            ComponentKind::Button => (Some(144.0), 40.0),
            ComponentKind::Link => (Some(96.0), 24.0),
            ComponentKind::Badge => (Some(64.0), 24.0),
            ComponentKind::Input => (Some(240.0), 40.0),
            ComponentKind::Textarea => (Some(240.0), 96.0),
            ComponentKind::Select => (Some(200.0), 40.0),
            ComponentKind::Checkbox | ComponentKind::Radio => (Some(160.0), 24.0),
            ComponentKind::Toggle => (Some(56.0), 32.0),
            ComponentKind::Image => (Some(240.0), 160.0),
            ComponentKind::Avatar => (Some(40.0), 40.0),
            ComponentKind::Icon => (Some(24.0), 24.0),
            ComponentKind::Progress => (Some(200.0), 8.0),
            ComponentKind::Spacer => (Some(16.0), 16.0),
            ComponentKind::Divider => (None, 1.0),
            _ => return None,
        };
        Some((width, height))
    }

    /// Natural size of a leaf within `available` pixels of width.
    pub fn natural_size(self, available: f32) -> Size {
        match self.default_size() {
            Some((width, height)) => {
                Size::new(width.unwrap_or(available).min(available).max(0.0), height)
            }
            None => Size::new(available.max(0.0), 0.0),
        }
    }

    /// Default container spacing in units.
    pub fn default_spacing(self) -> Spacing {
        let (pad, gap) = match self {
            ComponentKind::Section => (1.0, 1.0),
            ComponentKind::Card => (2.0, 1.0),
            ComponentKind::ZStack => (0.0, 0.0),
            ComponentKind::Grid | ComponentKind::HStack | ComponentKind::VStack => (0.0, 1.0),
            _ => (0.0, 0.0),
        };
        Spacing { pad, gap }
    }

    /// The value kind of property `key` on this component, or `None` if the
    /// component does not accept it.
    pub fn prop_kind(self, key: &str) -> Option<PropKind> {
        let kind = match key {
            "w" | "h" => PropKind::Number,
            "grow" | "shrink" => PropKind::Flag,
            "tone" => PropKind::Text,
            "gap" | "pad" if self.is_container() => PropKind::Number,
            "at" if self.is_container() => PropKind::Keyword(HORIZONTAL_ALIGNMENTS),
            "valign" if self.is_container() => PropKind::Keyword(VERTICAL_ALIGNMENTS),
            "cols" if self == ComponentKind::Grid => PropKind::Number,
            "disabled" if self.is_interactive() => PropKind::Flag,
            "checked"
                if matches!(
                    self,
                    ComponentKind::Checkbox | ComponentKind::Radio | ComponentKind::Toggle
                ) =>
            {
                PropKind::Flag
            }
            "placeholder"
                if matches!(
                    self,
                    ComponentKind::Input | ComponentKind::Textarea | ComponentKind::Select
                ) =>
            {
                PropKind::Text
            }
            "value" if self == ComponentKind::Input => PropKind::Text,
            "value" if self == ComponentKind::Progress => PropKind::Number,
            "src" if matches!(self, ComponentKind::Image | ComponentKind::Avatar) => PropKind::Text,
            "name" if self == ComponentKind::Icon => PropKind::Text,
            "level" if self == ComponentKind::Heading => PropKind::Number,
            "variant" if matches!(self, ComponentKind::Button | ComponentKind::Badge) => {
                PropKind::Keyword(VARIANTS)
            }
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Error returned when a keyword is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component `{0}`")]
pub struct UnknownComponent(pub String);

impl FromStr for ComponentKind {
    type Err = UnknownComponent;

    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.keyword() == keyword)
            .ok_or_else(|| UnknownComponent(keyword.to_string()))
    }
}

/// Rejection of a property by the catalog schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropError {
    #[error("`{key}` is not a property of `{kind}`")]
    Unknown { kind: ComponentKind, key: String },

    #[error("`{key}` expects {expected}, found {found}")]
    InvalidValue {
        key: String,
        expected: String,
        found: String,
    },
}

/// Schema-checked properties of a node.
///
/// Entries keep declaration order; re-declaring a key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Props(IndexMap<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `value` against the schema of `kind` and store it.
    ///
    /// Text values are coerced where the schema allows it: `true`/`false`
    /// become flags and numbers become text for text properties.
    pub fn insert_checked(
        &mut self,
        kind: ComponentKind,
        key: &str,
        value: Value,
    ) -> Result<(), PropError> {
        let prop_kind = kind.prop_kind(key).ok_or_else(|| PropError::Unknown {
            kind,
            key: key.to_string(),
        })?;

        let coerced = match (prop_kind, value) {
            (PropKind::Number, Value::Number(number)) if number >= 0.0 => Value::Number(number),
            (PropKind::Text, Value::Text(text)) => Value::Text(text),
            (PropKind::Text, Value::Number(number)) => Value::Text(Value::Number(number).to_string()),
            (PropKind::Flag, Value::Bool(flag)) => Value::Bool(flag),
            (PropKind::Keyword(options), Value::Text(text)) if options.contains(&text.as_str()) => {
                Value::Text(text)
            }
            (expected, found) => {
                return Err(PropError::InvalidValue {
                    key: key.to_string(),
                    expected: expected.describe(),
                    found: format!("`{found}`"),
                });
            }
        };

        self.0.insert(key.to_string(), coerced);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric value of `key`, if present.
    pub fn number(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(Value::as_number)
    }

    /// Text value of `key`, if present.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    /// Returns `true` if flag `key` is set.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_round_trip_through_from_str() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.keyword().parse::<ComponentKind>(), Ok(*kind));
        }
        assert!("rectangle".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_containers_have_no_default_size() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.is_container(), kind.default_size().is_none(), "{kind}");
        }
    }

    #[test]
    fn test_natural_size_clamps_to_available_width() {
        assert_eq!(ComponentKind::Button.natural_size(400.0), Size::new(144.0, 40.0));
        assert_eq!(ComponentKind::Button.natural_size(100.0), Size::new(100.0, 40.0));
        assert_eq!(ComponentKind::Divider.natural_size(320.0), Size::new(320.0, 1.0));
    }

    #[test]
    fn test_props_accept_schema_values() {
        let mut props = Props::new();
        props
            .insert_checked(ComponentKind::Button, "grow", Value::Bool(true))
            .unwrap();
        props
            .insert_checked(ComponentKind::Button, "variant", Value::from("primary"))
            .unwrap();
        props
            .insert_checked(ComponentKind::Button, "cols", Value::Number(3.0))
            .unwrap_err();
        props
            .insert_checked(ComponentKind::Heading, "tone", Value::Number(2.0))
            .unwrap();

        assert!(props.flag("grow"));
        assert_eq!(props.text("variant"), Some("primary"));
        assert_eq!(props.text("tone"), Some("2"));
    }

    #[test]
    fn test_props_reject_unknown_keys() {
        let mut props = Props::new();
        let err = props
            .insert_checked(ComponentKind::Text, "cols", Value::Number(3.0))
            .unwrap_err();

        assert!(matches!(err, PropError::Unknown { .. }));
        assert_eq!(err.to_string(), "`cols` is not a property of `text`");
        assert!(props.is_empty());
    }

    #[test]
    fn test_props_reject_wrong_value_kinds() {
        let mut props = Props::new();

        let err = props
            .insert_checked(ComponentKind::VStack, "at", Value::from("middle"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "`at` expects one of `start|center|end|stretch`, found `middle`"
        );

        let err = props
            .insert_checked(ComponentKind::VStack, "gap", Value::from("wide"))
            .unwrap_err();
        assert!(matches!(err, PropError::InvalidValue { .. }));
    }
}
