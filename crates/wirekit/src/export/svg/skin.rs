//! Skin token tables.

/// Visual tokens of a skin.
#[derive(Debug, Clone, PartialEq)]
pub struct Skin {
    pub name: &'static str,
    /// Canvas color.
    pub canvas: &'static str,
    /// Fill of boxes without a tone.
    pub surface: &'static str,
    /// Strokes and text.
    pub ink: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub danger: &'static str,
    /// Corner radius in pixels.
    pub radius: f32,
    pub stroke_width: f32,
    pub font_family: &'static str,
    pub font_size: f32,
    /// `stroke-dasharray` of containers.
    pub container_dash: Option<&'static str>,
}

const WIRE: Skin = Skin {
    name: "wire",
    canvas: "#ffffff",
    surface: "#f8fafc",
    ink: "#1f2937",
    muted: "#9ca3af",
    accent: "#4f46e5",
    danger: "#dc2626",
    radius: 4.0,
    stroke_width: 1.0,
    font_family: "Inter, Helvetica, Arial, sans-serif",
    font_size: 14.0,
    container_dash: Some("4 4"),
};

const SKETCH: Skin = Skin {
    name: "sketch",
    canvas: "#fffdf7",
    surface: "#fffdf7",
    ink: "#2b2b2b",
    muted: "#8a8a8a",
    accent: "#e07a1f",
    danger: "#c0392b",
    radius: 10.0,
    stroke_width: 2.0,
    font_family: "'Comic Neue', 'Comic Sans MS', cursive",
    font_size: 15.0,
    container_dash: Some("6 3"),
};

const BLUEPRINT: Skin = Skin {
    name: "blueprint",
    canvas: "#0b3d91",
    surface: "#0f4aa8",
    ink: "#e8f1ff",
    muted: "#8fb3e8",
    accent: "#ffd166",
    danger: "#ff6b6b",
    radius: 0.0,
    stroke_width: 1.0,
    font_family: "'Courier New', monospace",
    font_size: 13.0,
    container_dash: None,
};

impl Skin {
    pub const NAMES: &'static [&'static str] = &["wire", "sketch", "blueprint"];

    /// The skin called `name`, if there is one.
    pub fn named(name: &str) -> Option<Skin> {
        match name {
            "wire" => Some(WIRE),
            "sketch" => Some(SKETCH),
            "blueprint" => Some(BLUEPRINT),
            _ => None,
        }
    }

    /// Fill color of a box with `tone`.
    pub fn tone_fill(&self, tone: Option<&str>) -> &'static str {
        match tone {
            Some("brand" | "primary" | "accent") => self.accent,
            Some("danger") => self.danger,
            Some("muted" | "ghost") => self.canvas,
            _ => self.surface,
        }
    }

    /// Text color on a box filled with `fill`.
    pub fn text_on(&self, fill: &str) -> &'static str {
        if fill == self.accent || fill == self.danger {
            self.canvas
        } else {
            self.ink
        }
    }
}

impl Default for Skin {
    fn default() -> Self {
        WIRE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in Skin::NAMES {
            assert_eq!(Skin::named(name).map(|skin| skin.name), Some(*name));
        }
        assert!(Skin::named("neon").is_none());
        assert_eq!(Skin::default().name, "wire");
    }

    #[test]
    fn test_tone_fill() {
        let skin = Skin::default();
        assert_eq!(skin.tone_fill(Some("brand")), skin.accent);
        assert_eq!(skin.tone_fill(Some("unknown")), skin.surface);
        assert_eq!(skin.text_on(skin.accent), skin.canvas);
    }
}
