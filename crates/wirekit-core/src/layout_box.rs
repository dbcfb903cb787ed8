//! The positioned output tree of the layout engine.

use serde::Serialize;

use crate::{component::ComponentKind, component::Props, geometry::Point};

/// An absolutely positioned, sized node.
///
/// Coordinates are canvas pixels. `signature` is a cache key derived from the
/// node's kind, id, label, props, placement and child count; it is not unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    pub id: String,
    /// Pre-order index of the source node in the laid out tree.
    pub node_ref: usize,
    pub kind: ComponentKind,
    pub label: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub z_index: i32,
    pub tone: Option<String>,
    pub props: Props,
    pub children: Vec<LayoutBox>,
    pub signature: u64,
}

impl LayoutBox {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Move this box and its whole subtree by `(dx, dy)`.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }

    /// Move this box and its subtree so its origin is `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.translate(x - self.x, y - self.y);
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Find a box with the given id in this subtree.
    pub fn find(&self, id: &str) -> Option<&LayoutBox> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Iterate over this box and its descendants in pre-order.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }
}

/// Pre-order iterator over a box subtree.
pub struct Preorder<'a> {
    stack: Vec<&'a LayoutBox>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a LayoutBox;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

/// Find a box by id across a forest of root boxes.
pub fn find_box<'a>(boxes: &'a [LayoutBox], id: &str) -> Option<&'a LayoutBox> {
    boxes.iter().find_map(|root| root.find(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, x: f32, y: f32) -> LayoutBox {
        LayoutBox {
            id: id.to_string(),
            node_ref: 0,
            kind: ComponentKind::Button,
            label: None,
            x,
            y,
            width: 10.0,
            height: 10.0,
            z_index: 0,
            tone: None,
            props: Props::new(),
            children: Vec::new(),
            signature: 0,
        }
    }

    #[test]
    fn test_translate_moves_subtree() {
        let mut root = leaf("root", 0.0, 0.0);
        root.children.push(leaf("child", 4.0, 6.0));

        root.translate(10.0, 20.0);

        assert_eq!(root.origin(), Point::new(10.0, 20.0));
        assert_eq!(root.children[0].origin(), Point::new(14.0, 26.0));
    }

    #[test]
    fn test_move_to() {
        let mut root = leaf("root", 5.0, 5.0);
        root.children.push(leaf("child", 7.0, 9.0));

        root.move_to(0.0, 0.0);

        assert_eq!(root.children[0].origin(), Point::new(2.0, 4.0));
        assert_eq!(root.bottom(), 10.0);
    }

    #[test]
    fn test_find_and_preorder() {
        let mut root = leaf("root", 0.0, 0.0);
        let mut middle = leaf("middle", 0.0, 0.0);
        middle.children.push(leaf("deep", 0.0, 0.0));
        root.children.push(middle);
        root.children.push(leaf("last", 0.0, 0.0));

        assert!(root.find("deep").is_some());
        assert!(root.find("missing").is_none());

        let ids: Vec<&str> = root.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "middle", "deep", "last"]);
        assert!(find_box(std::slice::from_ref(&root), "last").is_some());
    }
}
