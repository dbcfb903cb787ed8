//! Layout engine.
//!
//! Walks a node tree and computes absolute pixel geometry for every node,
//! producing a [`LayoutBox`] tree. Dispatch is by component kind:
//!
//! - `grid` places children on a column grid with auto-placement ([`grid`])
//! - `hstack` distributes width among children with grow/shrink ([`stack`])
//! - `vstack`, `section` and `card` stack children vertically ([`stack`])
//! - `zstack` layers children on top of each other
//! - every other kind is a leaf sized from `w`/`h` or its default size
//!
//! Top-level nodes are stacked vertically at the full viewport width. Layout
//! never fails: placement problems become diagnostics and the offending box
//! is still produced with clamped geometry.

mod grid;
mod memo;
mod stack;

pub use memo::{LayoutMemo, MemoCache, node_signature};

use std::time::Instant;

use log::{debug, trace};

use wirekit_core::{
    component::ComponentKind,
    document::{Document, Node},
    geometry::Insets,
    layout_box::LayoutBox,
};
use wirekit_parser::error::{
    DEFAULT_DIAGNOSTIC_LIMIT, Diagnostic, DiagnosticCollector, ErrorCode,
};

use crate::style::StyleResolution;

/// Height of the title band of labelled sections and cards, in units.
const TITLE_BAND_UNITS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Pixels per spacing unit.
    pub unit: f32,
    /// Gap between top-level nodes, in units.
    pub root_gap_units: f32,
    pub max_diagnostics: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            unit: 8.0,
            root_gap_units: 2.0,
            max_diagnostics: DEFAULT_DIAGNOSTIC_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMetrics {
    pub layout_time_ms: f64,
    /// Number of boxes produced.
    pub node_count: usize,
    pub warning_count: usize,
    /// Grid children placed over already occupied cells.
    pub collision_count: usize,
    pub memo_hit_count: usize,
}

#[derive(Debug, Clone)]
pub struct LayoutOutput {
    pub boxes: Vec<LayoutBox>,
    pub diagnostics: Vec<Diagnostic>,
    pub metrics: LayoutMetrics,
}

impl LayoutOutput {
    /// Bottom-right extent of every box.
    pub fn content_size(&self) -> (f32, f32) {
        self.boxes.iter().fold((0.0_f32, 0.0_f32), |(width, height), root| {
            (width.max(root.right()), height.max(root.bottom()))
        })
    }
}

/// Lay out `document` with `options` and no style resolution or memo.
pub fn layout_document(document: &Document, options: &LayoutOptions) -> LayoutOutput {
    LayoutEngine::new(*options).layout(document)
}

/// Configurable entry point of the layout engine.
///
/// The memo is called without synchronization; callers sharing one across
/// threads must lock around the whole layout.
pub struct LayoutEngine<'a> {
    options: LayoutOptions,
    styles: Option<&'a StyleResolution>,
    memo: Option<&'a mut dyn LayoutMemo>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            styles: None,
            memo: None,
        }
    }

    /// Use resolved styles as fallback for `gap`, `pad` and `tone`.
    pub fn with_styles(mut self, styles: &'a StyleResolution) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Reuse leaf boxes across layouts.
    pub fn with_memo(mut self, memo: &'a mut dyn LayoutMemo) -> Self {
        self.memo = Some(memo);
        self
    }

    pub fn layout(self, document: &Document) -> LayoutOutput {
        let started = Instant::now();
        let mut pass = Pass {
            options: self.options,
            styles: self.styles,
            memo: self.memo,
            diagnostics: DiagnosticCollector::with_limit(self.options.max_diagnostics),
            next_ref: 0,
            next_z: 0,
            node_count: 0,
            collision_count: 0,
            memo_hit_count: 0,
        };

        let gap = self.options.root_gap_units * self.options.unit;
        let mut boxes = Vec::with_capacity(document.nodes.len());
        let mut cursor = 0.0;
        for (index, node) in document.nodes.iter().enumerate() {
            if index > 0 {
                cursor += gap;
            }
            pass.check_placement_ignored(node);
            let root = pass.layout_node(node, 0.0, cursor, self.options.viewport_width, None);
            cursor += root.height;
            boxes.push(root);
        }

        let metrics = LayoutMetrics {
            layout_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            node_count: pass.node_count,
            warning_count: pass.diagnostics.warning_count(),
            collision_count: pass.collision_count,
            memo_hit_count: pass.memo_hit_count,
        };
        debug!(
            boxes = metrics.node_count,
            collisions = metrics.collision_count,
            memo_hits = metrics.memo_hit_count,
            elapsed_ms = metrics.layout_time_ms;
            "Layout complete"
        );

        LayoutOutput {
            boxes,
            diagnostics: pass.diagnostics.into_diagnostics(),
            metrics,
        }
    }
}

/// Mutable state of one layout run.
struct Pass<'a> {
    options: LayoutOptions,
    styles: Option<&'a StyleResolution>,
    memo: Option<&'a mut dyn LayoutMemo>,
    diagnostics: DiagnosticCollector,
    next_ref: usize,
    next_z: i32,
    node_count: usize,
    collision_count: usize,
    memo_hit_count: usize,
}

impl Pass<'_> {
    /// Lay out `node` with its origin at `(x, y)`.
    ///
    /// `available` is the width offered by the parent; `forced` is an exact
    /// width assigned by the parent (stretch, grid cell, distributed hstack
    /// share).
    fn layout_node(
        &mut self,
        node: &Node,
        x: f32,
        y: f32,
        available: f32,
        forced: Option<f32>,
    ) -> LayoutBox {
        let node_ref = self.next_ref;
        self.next_ref += 1;
        let z_index = self.next_z;
        self.next_z += 1;
        self.node_count += 1;

        let mut layout_box = LayoutBox {
            id: box_id(node, node_ref),
            node_ref,
            kind: node.kind,
            label: node.label.clone(),
            x,
            y,
            width: 0.0,
            height: 0.0,
            z_index,
            tone: self.tone(node),
            props: node.props.clone(),
            children: Vec::new(),
            signature: node_signature(node),
        };

        match node.kind {
            ComponentKind::Grid => self.layout_grid(node, &mut layout_box, available, forced),
            ComponentKind::HStack => self.layout_hstack(node, &mut layout_box, available, forced),
            ComponentKind::VStack | ComponentKind::Section | ComponentKind::Card => {
                self.layout_vstack(node, &mut layout_box, available, forced)
            }
            ComponentKind::ZStack => self.layout_zstack(node, &mut layout_box, available, forced),
            _ => return self.layout_leaf(node, layout_box, available, forced),
        }

        trace!(
            id = layout_box.id.as_str(),
            x = layout_box.x,
            y = layout_box.y,
            width = layout_box.width,
            height = layout_box.height;
            "Laid out container"
        );
        layout_box
    }

    fn layout_leaf(
        &mut self,
        node: &Node,
        mut layout_box: LayoutBox,
        available: f32,
        forced: Option<f32>,
    ) -> LayoutBox {
        let width = self.resolve_width(node, available, forced);
        let key = memo::memo_key(layout_box.signature, width, layout_box.tone.as_deref());

        let cached = self.memo.as_deref_mut().and_then(|memo| memo.get(key));
        if let Some(mut cached) = cached {
            self.memo_hit_count += 1;
            cached.move_to(layout_box.x, layout_box.y);
            cached.id = layout_box.id;
            cached.node_ref = layout_box.node_ref;
            cached.z_index = layout_box.z_index;
            return cached;
        }

        layout_box.width = width;
        layout_box.height = node
            .props
            .number("h")
            .unwrap_or_else(|| node.kind.natural_size(available).height());

        if let Some(memo) = self.memo.as_deref_mut() {
            memo.set(key, layout_box.clone());
        }
        layout_box
    }

    fn layout_zstack(
        &mut self,
        node: &Node,
        layout_box: &mut LayoutBox,
        available: f32,
        forced: Option<f32>,
    ) {
        let (pad, _) = self.spacing(node);
        let insets = Insets::uniform(pad);
        let inner_available = (available - insets.horizontal_sum()).max(0.0);
        let origin_x = layout_box.x + insets.left();
        let origin_y = layout_box.y + insets.top();

        let mut content_width: f32 = 0.0;
        let mut content_height: f32 = 0.0;
        for child in &node.children {
            self.check_placement_ignored(child);
            let child_box = self.layout_node(child, origin_x, origin_y, inner_available, None);
            content_width = content_width.max(child_box.width);
            content_height = content_height.max(child_box.height);
            layout_box.children.push(child_box);
        }

        layout_box.width = match (forced, node.props.number("w")) {
            (Some(width), _) => width,
            (None, Some(width)) => width.min(available),
            (None, None) => content_width + insets.horizontal_sum(),
        }
        .max(0.0);
        layout_box.height = node
            .props
            .number("h")
            .unwrap_or(content_height + insets.vertical_sum());
    }

    /// Width of `node` given the parent's offer.
    fn resolve_width(&self, node: &Node, available: f32, forced: Option<f32>) -> f32 {
        if let Some(width) = forced {
            return width.max(0.0);
        }
        match node.props.number("w") {
            Some(width) => width.min(available).max(0.0),
            None if node.kind.is_container() => available.max(0.0),
            None => node.kind.natural_size(available).width(),
        }
    }

    /// Padding and gap of a container in pixels: props first, then resolved
    /// styles, then the component defaults.
    fn spacing(&self, node: &Node) -> (f32, f32) {
        let defaults = node.kind.default_spacing();
        let units = |name: &str, default: f32| {
            node.props
                .number(name)
                .or_else(|| self.style_number(node, name))
                .unwrap_or(default)
        };
        (
            units("pad", defaults.pad) * self.options.unit,
            units("gap", defaults.gap) * self.options.unit,
        )
    }

    /// Insets of a stack-like container, including the title band.
    fn container_insets(&self, node: &Node, pad: f32) -> Insets {
        let insets = Insets::uniform(pad);
        let titled = matches!(node.kind, ComponentKind::Section | ComponentKind::Card)
            && node.label.as_deref().is_some_and(|label| !label.is_empty());
        if titled {
            insets.grow_top(TITLE_BAND_UNITS * self.options.unit)
        } else {
            insets
        }
    }

    fn style_number(&self, node: &Node, name: &str) -> Option<f32> {
        self.styles?.node_style(node, name)?.as_number()
    }

    fn tone(&self, node: &Node) -> Option<String> {
        if let Some(tone) = node.props.text("tone") {
            return Some(tone.to_string());
        }
        self.styles?
            .node_style(node, "tone")?
            .as_text()
            .map(str::to_string)
    }

    /// Placement tokens only mean something inside a grid.
    fn check_placement_ignored(&mut self, node: &Node) {
        let Some(place) = node.place else {
            return;
        };
        self.diagnostics.emit(
            Diagnostic::from_code(
                ErrorCode::E301,
                format!("placement `{place}` on `{}` is ignored outside a grid", node.kind),
            )
            .with_label(node.span, "not inside a grid")
            .at(node.location),
        );
    }

    fn warn(&mut self, code: ErrorCode, node: &Node, message: String, label: &str) {
        self.diagnostics.emit(
            Diagnostic::from_code(code, message)
                .with_label(node.span, label.to_string())
                .at(node.location),
        );
    }
}

fn box_id(node: &Node, node_ref: usize) -> String {
    node.id
        .clone()
        .unwrap_or_else(|| format!("{}-{node_ref}", node.kind))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use wirekit_core::layout_box::find_box;
    use wirekit_parser::parse;

    use super::*;
    use crate::style::evaluate_styles;

    pub(super) fn document(source: &str) -> Document {
        let output = parse(source);
        assert!(!output.has_errors(), "{:#?}", output.diagnostics);
        output.document
    }

    pub(super) fn layout_at(source: &str, viewport_width: f32) -> LayoutOutput {
        let options = LayoutOptions {
            viewport_width,
            ..LayoutOptions::default()
        };
        layout_document(&document(source), &options)
    }

    pub(super) fn codes(output: &LayoutOutput) -> Vec<ErrorCode> {
        output
            .diagnostics
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_top_level_nodes_stack_with_root_gap() {
        let output = layout_at("heading \"Title\"\ndivider\ntext \"Body\"\n", 800.0);

        let ys: Vec<f32> = output.boxes.iter().map(|layout_box| layout_box.y).collect();
        assert_eq!(ys, [0.0, 48.0, 65.0]);
        assert_approx_eq!(f32, output.boxes[1].width, 800.0);
        assert_eq!(output.metrics.node_count, 3);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_leaf_sizes() {
        let output = layout_at("button \"Go\"\nbutton \"Wide\" w:300 h:48\nimage\n", 200.0);

        let sizes: Vec<(f32, f32)> = output
            .boxes
            .iter()
            .map(|layout_box| (layout_box.width, layout_box.height))
            .collect();
        // Explicit and default widths are clamped to the available width.
        assert_eq!(sizes, [(144.0, 40.0), (200.0, 48.0), (200.0, 160.0)]);
    }

    #[test]
    fn test_generated_ids_and_node_refs() {
        let output = layout_at("vstack\n  button \"A\" #a\n  button \"B\"\n", 400.0);

        let root = &output.boxes[0];
        assert_eq!(root.id, "vstack-0");
        assert_eq!(root.children[0].id, "a");
        assert_eq!(root.children[1].id, "button-2");
        assert_eq!(root.children[1].node_ref, 2);
        assert!(root.children[1].z_index > root.children[0].z_index);
    }

    #[test]
    fn test_zstack_layers_children() {
        let output = layout_at("zstack\n  image\n  badge \"New\"\n", 1024.0);

        let root = &output.boxes[0];
        assert_eq!((root.width, root.height), (240.0, 160.0));
        assert_eq!(root.children[0].origin(), root.children[1].origin());
        assert!(root.children[1].z_index > root.children[0].z_index);
    }

    #[test]
    fn test_labelled_card_reserves_title_band() {
        let output = layout_at("card \"Profile\"\n  avatar\n", 1024.0);

        let card = &output.boxes[0];
        let avatar = &card.children[0];
        // pad 2u on every side plus a 3u title band.
        assert_eq!(avatar.origin().x(), 16.0);
        assert_eq!(avatar.origin().y(), 40.0);
        assert_eq!(card.height, 40.0 + 40.0 + 16.0);
    }

    #[test]
    fn test_placement_outside_grid_is_ignored() {
        let output = layout_at("vstack\n  button \"A\" @c2\n", 400.0);

        assert_eq!(codes(&output), [ErrorCode::E301]);
        assert_eq!(output.metrics.warning_count, 0);
        assert_eq!(output.boxes[0].children[0].x, 0.0);
    }

    #[test]
    fn test_styles_supply_spacing_and_tone() {
        let document = document(
            "style type(vstack) { gap: 3; tone: muted }\nvstack\n  text \"A\"\n  text \"B\" tone:brand\n",
        );
        let styles = evaluate_styles(&document);
        let output = LayoutEngine::new(LayoutOptions::default())
            .with_styles(&styles)
            .layout(&document);

        let root = &output.boxes[0];
        assert_eq!(root.tone.as_deref(), Some("muted"));
        assert_eq!(root.children[1].y, 24.0 + 24.0);
        assert_eq!(root.children[1].tone.as_deref(), Some("brand"));
    }

    #[test]
    fn test_memo_hits_on_repeated_layout() {
        let document = document("vstack\n  button \"A\" #a\n  button \"B\"\n");
        let mut memo = MemoCache::new();

        let first = LayoutEngine::new(LayoutOptions::default())
            .with_memo(&mut memo)
            .layout(&document);
        let second = LayoutEngine::new(LayoutOptions::default())
            .with_memo(&mut memo)
            .layout(&document);

        assert_eq!(first.metrics.memo_hit_count, 0);
        assert_eq!(second.metrics.memo_hit_count, 2);
        assert_eq!(first.boxes, second.boxes);
        assert_eq!(memo.len(), 2);
        assert!(find_box(&second.boxes, "a").is_some());
    }

    #[test]
    fn test_content_size() {
        let output = layout_at("button \"A\"\nbutton \"B\"\n", 1024.0);
        assert_eq!(output.content_size(), (144.0, 40.0 + 16.0 + 40.0));
    }
}
