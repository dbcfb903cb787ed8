//! Leaf box memoization.

use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
};

use wirekit_core::{document::Node, layout_box::LayoutBox};

/// A cache of laid out leaf boxes, keyed by memo key.
///
/// The engine performs an unsynchronized `get` followed by `set`.
pub trait LayoutMemo {
    fn get(&self, signature: u64) -> Option<LayoutBox>;
    fn set(&mut self, signature: u64, layout_box: LayoutBox);
}

/// A [`LayoutMemo`] backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoCache {
    entries: HashMap<u64, LayoutBox>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl LayoutMemo for MemoCache {
    fn get(&self, signature: u64) -> Option<LayoutBox> {
        self.entries.get(&signature).cloned()
    }

    fn set(&mut self, signature: u64, layout_box: LayoutBox) {
        self.entries.insert(signature, layout_box);
    }
}

/// Cache key of a node: kind, id, label, props, placement and child count.
pub fn node_signature(node: &Node) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.kind.hash(&mut hasher);
    node.id.hash(&mut hasher);
    node.label.hash(&mut hasher);
    for (key, value) in node.props.iter() {
        key.hash(&mut hasher);
        value.to_string().hash(&mut hasher);
    }
    node.place.hash(&mut hasher);
    node.children.len().hash(&mut hasher);
    hasher.finish()
}

/// Key of a leaf laid out at `width` with `tone`.
pub(super) fn memo_key(signature: u64, width: f32, tone: Option<&str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    signature.hash(&mut hasher);
    width.to_bits().hash(&mut hasher);
    tone.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use wirekit_core::component::ComponentKind;

    use super::*;

    #[test]
    fn test_signature_tracks_node_contents() {
        let mut first = Node::new(ComponentKind::Button);
        first.label = Some("Go".to_string());
        let second = first.clone();
        assert_eq!(node_signature(&first), node_signature(&second));

        let mut relabelled = first.clone();
        relabelled.label = Some("Stop".to_string());
        assert_ne!(node_signature(&first), node_signature(&relabelled));
    }

    #[test]
    fn test_memo_key_depends_on_width() {
        assert_ne!(memo_key(7, 100.0, None), memo_key(7, 120.0, None));
        assert_ne!(memo_key(7, 100.0, None), memo_key(7, 100.0, Some("brand")));
    }
}
