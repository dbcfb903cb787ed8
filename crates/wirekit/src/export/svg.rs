//! SVG rendering of a box tree.
//!
//! Boxes are drawn in z-index order. Each box contributes its fill to the
//! background layer, strokes and glyphs to the outline layer and its label to
//! the text layer, so labels are never hidden by a later sibling's fill.
//!
//! Colors come from the active [`Skin`], overridden by the resolved style
//! declarations of the node (`fill`, `stroke`, `text`, `radius`, `font`).
//! A declaration value that names a `color.<name>` (or `radius.<name>`)
//! global resolves through that global first.

mod layer;
mod skin;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use skin::Skin;

use log::{debug, trace};
use svg::{
    Document as SvgDocument,
    node::element::{Circle, Line, Rectangle, Text},
};

use wirekit_core::{
    component::ComponentKind,
    document::{Document, Node, StyleMap, walk_nodes},
    layout_box::LayoutBox,
    value::Value,
};

use crate::{color::Color, style::StyleResolution};

/// Height of the title band drawn for labelled sections and cards.
const TITLE_BAND: f32 = 24.0;
const TEXT_INSET: f32 = 8.0;
const GLYPH_SIZE: f32 = 16.0;

/// Paint of one box after skin and style resolution.
#[derive(Debug, Clone)]
struct Paint {
    fill: String,
    stroke: String,
    text: String,
    radius: f32,
    font_family: String,
}

/// Renders [`LayoutBox`] trees to SVG markup.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer<'a> {
    skin: Skin,
    background: Option<Color>,
    styles: Option<&'a StyleResolution>,
    /// Source nodes indexed by `node_ref`.
    nodes: Vec<&'a Node>,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(skin: Skin) -> Self {
        Self {
            skin,
            ..Self::default()
        }
    }

    /// Paint the canvas with `color` instead of the skin's canvas color.
    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    /// Apply the resolved styles of `document`, the tree the boxes were laid
    /// out from.
    pub fn with_styles(mut self, document: &'a Document, styles: &'a StyleResolution) -> Self {
        let mut nodes = Vec::with_capacity(document.node_count());
        walk_nodes(&document.nodes, |node| nodes.push(node));
        self.nodes = nodes;
        self.styles = Some(styles);
        self
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    /// Render `boxes` on a canvas of `width` by `height` pixels.
    pub fn render(&self, boxes: &[LayoutBox], width: f32, height: f32) -> String {
        let width = width.max(1.0);
        let height = height.max(1.0);

        let mut ordered: Vec<&LayoutBox> = boxes.iter().flat_map(LayoutBox::iter).collect();
        ordered.sort_by_key(|layout_box| layout_box.z_index);

        let mut output = LayeredOutput::new();
        let canvas = self
            .background
            .as_ref()
            .map_or_else(|| self.skin.canvas.to_string(), Color::to_string);
        output.add_to_layer(
            RenderLayer::Background,
            Box::new(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", canvas),
            ),
        );
        for layout_box in &ordered {
            output.merge(self.render_box(layout_box));
        }

        let mut document = SvgDocument::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
            .set("data-skin", self.skin.name);
        for group in output.render() {
            document = document.add(group);
        }
        debug!(boxes = ordered.len(), skin = self.skin.name; "SVG document rendered");
        document.to_string()
    }

    fn node_styles(&self, layout_box: &LayoutBox) -> StyleMap {
        match (self.styles, self.nodes.get(layout_box.node_ref)) {
            (Some(styles), Some(node)) => styles.node_styles(node),
            _ => StyleMap::new(),
        }
    }

    fn globals(&self) -> Option<&StyleMap> {
        self.styles.map(StyleResolution::globals)
    }

    /// Resolve a color declaration, following `color.<name>` globals.
    fn color(&self, value: Option<&Value>) -> Option<String> {
        let raw = value?.as_text()?;
        let named = self
            .globals()
            .and_then(|globals| globals.get(&format!("color.{raw}")))
            .and_then(Value::as_text)
            .unwrap_or(raw);
        match Color::new(named) {
            Ok(color) => Some(color.to_string()),
            Err(err) => {
                trace!(value = raw; "Ignoring color: {err}");
                None
            }
        }
    }

    fn radius(&self, value: Option<&Value>) -> Option<f32> {
        match value? {
            Value::Number(radius) => Some(*radius),
            Value::Text(name) => self
                .globals()?
                .get(&format!("radius.{name}"))
                .and_then(Value::as_number),
            Value::Bool(_) => None,
        }
    }

    fn paint(&self, layout_box: &LayoutBox) -> Paint {
        let styles = self.node_styles(layout_box);
        let tone = layout_box
            .tone
            .as_deref()
            .or_else(|| layout_box.props.text("variant"));
        let tone_fill = tone
            .and_then(|tone| self.color(Some(&Value::Text(tone.to_string()))))
            .unwrap_or_else(|| self.skin.tone_fill(tone).to_string());
        let fill = self.color(styles.get("fill")).unwrap_or(tone_fill);
        let text = self
            .color(styles.get("text"))
            .unwrap_or_else(|| self.skin.text_on(&fill).to_string());

        Paint {
            stroke: self
                .color(styles.get("stroke"))
                .unwrap_or_else(|| self.skin.ink.to_string()),
            text,
            fill,
            radius: self.radius(styles.get("radius")).unwrap_or(self.skin.radius),
            font_family: styles
                .get("font")
                .and_then(Value::as_text)
                .unwrap_or(self.skin.font_family)
                .to_string(),
        }
    }

    fn render_box(&self, layout_box: &LayoutBox) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let paint = self.paint(layout_box);
        let LayoutBox {
            x,
            y,
            width,
            height,
            ..
        } = *layout_box;
        let opacity = if layout_box.props.flag("disabled") { 0.5 } else { 1.0 };
        let label = layout_box.label.as_deref().unwrap_or_default();

        match layout_box.kind {
            kind if kind.is_container() => {
                if kind == ComponentKind::Card || layout_box.tone.is_some() {
                    output.add_to_layer(
                        RenderLayer::Background,
                        Box::new(self.rect(layout_box, &paint).set("fill", paint.fill.as_str())),
                    );
                }
                let mut outline = self
                    .rect(layout_box, &paint)
                    .set("fill", "none")
                    .set("stroke", paint.stroke.as_str())
                    .set("stroke-width", self.skin.stroke_width);
                if kind != ComponentKind::Card {
                    if let Some(dash) = self.skin.container_dash {
                        outline = outline.set("stroke-dasharray", dash);
                    }
                }
                output.add_to_layer(RenderLayer::Outline, Box::new(outline));
                if !label.is_empty() {
                    let title = self
                        .text(label, x + TEXT_INSET, y + TITLE_BAND / 2.0, &paint)
                        .set("font-weight", "bold");
                    output.add_to_layer(RenderLayer::Text, Box::new(title));
                }
            }
            ComponentKind::Text | ComponentKind::Heading | ComponentKind::Link => {
                let mut text = self
                    .text(label, x, y + height / 2.0, &paint)
                    .set("opacity", opacity);
                match layout_box.kind {
                    ComponentKind::Heading => {
                        let level = layout_box.props.number("level").unwrap_or(1.0).clamp(1.0, 6.0);
                        text = text
                            .set("font-weight", "bold")
                            .set("font-size", self.skin.font_size * (1.0 + (7.0 - level) * 0.1));
                    }
                    ComponentKind::Link => {
                        text = text
                            .set("fill", self.skin.accent)
                            .set("text-decoration", "underline");
                    }
                    _ => {}
                }
                output.add_to_layer(RenderLayer::Text, Box::new(text));
            }
            ComponentKind::Button | ComponentKind::Badge => {
                let radius = if layout_box.kind == ComponentKind::Badge {
                    height / 2.0
                } else {
                    paint.radius
                };
                self.filled_shape(&mut output, layout_box, &paint, radius, opacity);
                let text = self
                    .text(label, x + width / 2.0, y + height / 2.0, &paint)
                    .set("text-anchor", "middle")
                    .set("opacity", opacity);
                output.add_to_layer(RenderLayer::Text, Box::new(text));
            }
            ComponentKind::Input | ComponentKind::Textarea | ComponentKind::Select => {
                self.filled_shape(&mut output, layout_box, &paint, paint.radius, opacity);
                let (content, color) = match (
                    layout_box.props.text("value"),
                    layout_box.props.text("placeholder"),
                ) {
                    (Some(value), _) => (value, paint.text.clone()),
                    (None, Some(placeholder)) => (placeholder, self.skin.muted.to_string()),
                    (None, None) => (label, self.skin.muted.to_string()),
                };
                let baseline = if layout_box.kind == ComponentKind::Textarea {
                    y + TITLE_BAND / 2.0
                } else {
                    y + height / 2.0
                };
                let text = self
                    .text(content, x + TEXT_INSET, baseline, &paint)
                    .set("fill", color)
                    .set("opacity", opacity);
                output.add_to_layer(RenderLayer::Text, Box::new(text));
                if layout_box.kind == ComponentKind::Select {
                    let chevron = svg::node::element::Polyline::new()
                        .set(
                            "points",
                            format!(
                                "{},{} {},{} {},{}",
                                x + width - 20.0,
                                y + height / 2.0 - 3.0,
                                x + width - 15.0,
                                y + height / 2.0 + 3.0,
                                x + width - 10.0,
                                y + height / 2.0 - 3.0
                            ),
                        )
                        .set("fill", "none")
                        .set("stroke", paint.stroke.as_str());
                    output.add_to_layer(RenderLayer::Outline, Box::new(chevron));
                }
            }
            ComponentKind::Checkbox | ComponentKind::Radio | ComponentKind::Toggle => {
                self.control_glyph(&mut output, layout_box, &paint);
                let glyph_width = if layout_box.kind == ComponentKind::Toggle {
                    GLYPH_SIZE * 2.0
                } else {
                    GLYPH_SIZE
                };
                let text = self
                    .text(label, x + glyph_width + TEXT_INSET, y + height / 2.0, &paint)
                    .set("opacity", opacity);
                output.add_to_layer(RenderLayer::Text, Box::new(text));
            }
            ComponentKind::Image => {
                output.add_to_layer(
                    RenderLayer::Background,
                    Box::new(self.rect(layout_box, &paint).set("fill", paint.fill.as_str())),
                );
                output.add_to_layer(
                    RenderLayer::Outline,
                    Box::new(
                        self.rect(layout_box, &paint)
                            .set("fill", "none")
                            .set("stroke", paint.stroke.as_str()),
                    ),
                );
                for (x1, y1, x2, y2) in [(x, y, x + width, y + height), (x, y + height, x + width, y)] {
                    output.add_to_layer(RenderLayer::Outline, Box::new(self.line(x1, y1, x2, y2, &paint)));
                }
            }
            ComponentKind::Avatar | ComponentKind::Icon => {
                let circle = Circle::new()
                    .set("cx", x + width / 2.0)
                    .set("cy", y + height / 2.0)
                    .set("r", width.min(height) / 2.0)
                    .set("fill", paint.fill.as_str())
                    .set("stroke", paint.stroke.as_str())
                    .set("stroke-width", self.skin.stroke_width);
                output.add_to_layer(RenderLayer::Outline, Box::new(circle));
            }
            ComponentKind::Progress => {
                let fraction = layout_box.props.number("value").unwrap_or(0.0).clamp(0.0, 100.0) / 100.0;
                output.add_to_layer(
                    RenderLayer::Background,
                    Box::new(
                        self.rect(layout_box, &paint)
                            .set("rx", height / 2.0)
                            .set("fill", self.skin.muted),
                    ),
                );
                let bar = Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", width * fraction)
                    .set("height", height)
                    .set("rx", height / 2.0)
                    .set("fill", self.skin.accent);
                output.add_to_layer(RenderLayer::Outline, Box::new(bar));
            }
            ComponentKind::Divider => {
                let middle = y + height / 2.0;
                output.add_to_layer(
                    RenderLayer::Outline,
                    Box::new(self.line(x, middle, x + width, middle, &paint).set("stroke", self.skin.muted)),
                );
            }
            _ => {}
        }
        output
    }

    fn rect(&self, layout_box: &LayoutBox, paint: &Paint) -> Rectangle {
        Rectangle::new()
            .set("x", layout_box.x)
            .set("y", layout_box.y)
            .set("width", layout_box.width)
            .set("height", layout_box.height)
            .set("rx", paint.radius)
            .set("data-id", layout_box.id.as_str())
    }

    fn filled_shape(
        &self,
        output: &mut LayeredOutput,
        layout_box: &LayoutBox,
        paint: &Paint,
        radius: f32,
        opacity: f32,
    ) {
        output.add_to_layer(
            RenderLayer::Background,
            Box::new(
                self.rect(layout_box, paint)
                    .set("rx", radius)
                    .set("fill", paint.fill.as_str())
                    .set("opacity", opacity),
            ),
        );
        output.add_to_layer(
            RenderLayer::Outline,
            Box::new(
                self.rect(layout_box, paint)
                    .set("rx", radius)
                    .set("fill", "none")
                    .set("stroke", paint.stroke.as_str())
                    .set("stroke-width", self.skin.stroke_width)
                    .set("opacity", opacity),
            ),
        );
    }

    /// Box, dot or switch drawn at the left edge of a toggle-like control.
    fn control_glyph(&self, output: &mut LayeredOutput, layout_box: &LayoutBox, paint: &Paint) {
        let checked = layout_box.props.flag("checked");
        let top = layout_box.y + (layout_box.height - GLYPH_SIZE) / 2.0;
        let left = layout_box.x;
        let fill = if checked { self.skin.accent } else { self.skin.canvas };
        let (width, radius) = match layout_box.kind {
            ComponentKind::Radio => (GLYPH_SIZE, GLYPH_SIZE / 2.0),
            ComponentKind::Toggle => (GLYPH_SIZE * 2.0, GLYPH_SIZE / 2.0),
            _ => (GLYPH_SIZE, paint.radius.min(3.0)),
        };
        let glyph = Rectangle::new()
            .set("x", left)
            .set("y", top)
            .set("width", width)
            .set("height", GLYPH_SIZE)
            .set("rx", radius)
            .set("fill", fill)
            .set("stroke", paint.stroke.as_str())
            .set("stroke-width", self.skin.stroke_width);
        output.add_to_layer(RenderLayer::Outline, Box::new(glyph));

        if layout_box.kind == ComponentKind::Toggle {
            let knob_x = if checked { left + width - GLYPH_SIZE / 2.0 } else { left + GLYPH_SIZE / 2.0 };
            let knob = Circle::new()
                .set("cx", knob_x)
                .set("cy", top + GLYPH_SIZE / 2.0)
                .set("r", GLYPH_SIZE / 2.0 - 2.0)
                .set("fill", self.skin.surface)
                .set("stroke", paint.stroke.as_str());
            output.add_to_layer(RenderLayer::Outline, Box::new(knob));
        }
    }

    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32, paint: &Paint) -> Line {
        Line::new()
            .set("x1", x1)
            .set("y1", y1)
            .set("x2", x2)
            .set("y2", y2)
            .set("stroke", paint.stroke.as_str())
            .set("stroke-width", self.skin.stroke_width)
    }

    fn text(&self, content: &str, x: f32, y: f32, paint: &Paint) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("dominant-baseline", "central")
            .set("font-family", paint.font_family.as_str())
            .set("font-size", self.skin.font_size)
            .set("fill", paint.text.as_str())
    }
}
