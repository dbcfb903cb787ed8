//! Vertical and horizontal stacks.

use wirekit_core::{document::Node, layout_box::LayoutBox};
use wirekit_parser::error::ErrorCode;

use super::Pass;

/// Offset of an item of size `size` aligned within `space`.
fn align_offset(alignment: &str, space: f32, size: f32) -> f32 {
    let free = space - size;
    let offset = match alignment {
        "center" => free / 2.0,
        "end" => free,
        _ => 0.0,
    };
    offset.max(0.0)
}

impl Pass<'_> {
    /// Children top to bottom. `at` aligns each child horizontally, `valign`
    /// shifts the whole column when an explicit height leaves free space.
    pub(super) fn layout_vstack(
        &mut self,
        node: &Node,
        layout_box: &mut LayoutBox,
        available: f32,
        forced: Option<f32>,
    ) {
        let (pad, gap) = self.spacing(node);
        let insets = self.container_insets(node, pad);
        let width = self.resolve_width(node, available, forced);
        let content_width = (width - insets.horizontal_sum()).max(0.0);
        let origin_x = layout_box.x + insets.left();
        let origin_y = layout_box.y + insets.top();
        let align = node.props.text("at").unwrap_or("start");
        let stretch = (align == "stretch").then_some(content_width);

        let mut cursor = 0.0;
        for (index, child) in node.children.iter().enumerate() {
            if index > 0 {
                cursor += gap;
            }
            self.check_placement_ignored(child);
            let mut child_box =
                self.layout_node(child, origin_x, origin_y + cursor, content_width, stretch);
            let offset = align_offset(align, content_width, child_box.width);
            if offset > 0.0 {
                child_box.translate(offset, 0.0);
            }
            cursor += child_box.height;
            layout_box.children.push(child_box);
        }

        let content_height = cursor;
        layout_box.width = width;
        layout_box.height = node
            .props
            .number("h")
            .unwrap_or(content_height + insets.vertical_sum());

        let inner_height = layout_box.height - insets.vertical_sum();
        let valign = node.props.text("valign").unwrap_or("start");
        let shift = align_offset(valign, inner_height, content_height);
        if shift > 0.0 {
            for child in &mut layout_box.children {
                child.translate(0.0, shift);
            }
        }
    }

    /// Children left to right. Free width goes to `grow` children, missing
    /// width is taken from `shrink` children; `at` shifts the whole row and
    /// `valign` aligns each child within the row height.
    pub(super) fn layout_hstack(
        &mut self,
        node: &Node,
        layout_box: &mut LayoutBox,
        available: f32,
        forced: Option<f32>,
    ) {
        let (pad, gap) = self.spacing(node);
        let insets = self.container_insets(node, pad);
        let width = self.resolve_width(node, available, forced);
        let content_width = (width - insets.horizontal_sum()).max(0.0);
        let origin_x = layout_box.x + insets.left();
        let origin_y = layout_box.y + insets.top();

        let mut widths: Vec<f32> = node
            .children
            .iter()
            .map(|child| self.resolve_width(child, content_width, None))
            .collect();
        let gaps = gap * node.children.len().saturating_sub(1) as f32;
        let delta = content_width - (widths.iter().sum::<f32>() + gaps);

        let flagged = |flag: &str| -> Vec<usize> {
            node.children
                .iter()
                .enumerate()
                .filter(|(_, child)| child.props.flag(flag))
                .map(|(index, _)| index)
                .collect()
        };
        if delta > 0.0 {
            let growers = flagged("grow");
            if !growers.is_empty() {
                let share = delta / growers.len() as f32;
                for index in growers {
                    widths[index] += share;
                }
            }
        } else if delta < 0.0 {
            let shrinkers = flagged("shrink");
            if !shrinkers.is_empty() {
                let share = -delta / shrinkers.len() as f32;
                for index in shrinkers {
                    widths[index] = (widths[index] - share).max(0.0);
                }
            }
        }

        let used = widths.iter().sum::<f32>() + gaps;
        if used > content_width + 0.5 {
            self.warn(
                ErrorCode::E304,
                node,
                format!(
                    "children of `{}` need {used}px but only {content_width}px are available",
                    node.kind
                ),
                "content overflows",
            );
        }

        let mut cursor = 0.0;
        let mut row_height: f32 = 0.0;
        for (index, (child, child_width)) in node.children.iter().zip(&widths).enumerate() {
            if index > 0 {
                cursor += gap;
            }
            self.check_placement_ignored(child);
            let child_box = self.layout_node(
                child,
                origin_x + cursor,
                origin_y,
                *child_width,
                Some(*child_width),
            );
            cursor += *child_width;
            row_height = row_height.max(child_box.height);
            layout_box.children.push(child_box);
        }

        let valign = node.props.text("valign").unwrap_or("start");
        let at = node.props.text("at").unwrap_or("start");
        let shift = align_offset(at, content_width, used);
        for child in &mut layout_box.children {
            let offset = align_offset(valign, row_height, child.height);
            if shift > 0.0 || offset > 0.0 {
                child.translate(shift, offset);
            }
        }

        layout_box.width = width;
        layout_box.height = node
            .props
            .number("h")
            .unwrap_or(row_height + insets.vertical_sum());
    }
}
