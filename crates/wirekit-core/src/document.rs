//! The parsed document model.
//!
//! A [`Document`] is produced once per parse and treated as immutable input by
//! every later stage. Stages that need a different document (the breakpoint
//! evaluator) build a new one instead of mutating it in place.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::{
    component::{ComponentKind, Props},
    span::{Location, Span},
    value::Value,
};

/// Style declarations keyed by property name, in declaration order.
pub type StyleMap = IndexMap<String, Value>;

/// Current document model version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Grid placement annotations, 1-indexed. Every present value is at least 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlacementTokens {
    /// Column start (`@c<n>`).
    pub c: Option<u32>,
    /// Column span (`s<n>`).
    pub s: Option<u32>,
    /// Row start (`r<n>`).
    pub r: Option<u32>,
    /// Row span (`rs<n>`).
    pub rs: Option<u32>,
}

impl PlacementTokens {
    pub fn is_empty(&self) -> bool {
        self.c.is_none() && self.s.is_none() && self.r.is_none() && self.rs.is_none()
    }

    pub fn column_span(&self) -> u32 {
        self.s.unwrap_or(1)
    }

    pub fn row_span(&self) -> u32 {
        self.rs.unwrap_or(1)
    }
}

impl fmt::Display for PlacementTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            self.c.map(|n| format!("@c{n}")),
            self.s.map(|n| format!("s{n}")),
            self.r.map(|n| format!("r{n}")),
            self.rs.map(|n| format!("rs{n}")),
        ];
        let rendered: Vec<String> = parts.into_iter().flatten().collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// A component declaration and its indented children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: ComponentKind,
    pub id: Option<String>,
    pub classes: IndexSet<String>,
    pub label: Option<String>,
    pub place: Option<PlacementTokens>,
    pub props: Props,
    pub children: Vec<Node>,
    pub location: Location,
    pub span: Span,
}

impl Node {
    /// Create a node of `kind` with no attributes.
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            id: None,
            classes: IndexSet::new(),
            label: None,
            place: None,
            props: Props::new(),
            children: Vec::new(),
            location: Location::default(),
            span: Span::default(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Visit this node and all of its descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_size).sum::<usize>()
    }
}

/// Visit every node of `nodes` in pre-order.
pub fn walk_nodes<'a>(nodes: &'a [Node], mut visit: impl FnMut(&'a Node)) {
    for node in nodes {
        node.walk(&mut visit);
    }
}

/// A style rule selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Default,
    Type(ComponentKind),
    Class(String),
    Id(String),
}

impl Selector {
    /// Fixed precedence weight of the selector variant.
    pub fn specificity(&self) -> u32 {
        match self {
            Selector::Default => 0,
            Selector::Type(_) => 1,
            Selector::Class(_) => 10,
            Selector::Id(_) => 100,
        }
    }

    /// Returns `true` if this selector applies to `node`.
    ///
    /// `Default` matches every node.
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Selector::Default => true,
            Selector::Type(kind) => node.kind == *kind,
            Selector::Class(class) => node.has_class(class),
            Selector::Id(id) => node.id.as_deref() == Some(id.as_str()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Default => write!(f, "default"),
            Selector::Type(kind) => write!(f, "type({kind})"),
            Selector::Class(class) => write!(f, ".{class}"),
            Selector::Id(id) => write!(f, "#{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: Selector,
    pub declarations: StyleMap,
    pub location: Location,
}

/// Returns `true` if `name` may appear as a style declaration.
pub fn is_style_property(name: &str) -> bool {
    const ALLOWED: &[&str] = &[
        "skin", "font", "u", "fill", "stroke", "text", "shadow", "radius", "tone", "gap", "pad",
    ];
    const PREFIXES: &[&str] = &["color.", "radius.", "shadow.", "stroke."];

    ALLOWED.contains(&name)
        || PREFIXES
            .iter()
            .any(|prefix| name.len() > prefix.len() && name.starts_with(prefix))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Comparison {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
        }
    }
}

/// One comparison against the viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub op: Comparison,
    pub value: f32,
}

impl Condition {
    pub fn new(op: Comparison, value: f32) -> Self {
        Self { op, value }
    }

    pub fn holds(&self, width: f32) -> bool {
        match self.op {
            Comparison::Less => width < self.value,
            Comparison::LessEqual => width <= self.value,
            Comparison::Greater => width > self.value,
            Comparison::GreaterEqual => width >= self.value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), Value::Number(self.value))
    }
}

/// A bound of a [`WidthRange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f32,
    pub inclusive: bool,
}

/// The normalized AND-combination of a breakpoint's conditions.
///
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WidthRange {
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl WidthRange {
    /// Combine `conditions` into a single range, keeping the tightest bound on
    /// each side. At equal values an exclusive bound is tighter.
    pub fn from_conditions(conditions: &[Condition]) -> Self {
        conditions
            .iter()
            .fold(WidthRange::default(), |range, condition| {
                let bound = |inclusive| Bound {
                    value: condition.value,
                    inclusive,
                };
                let single = match condition.op {
                    Comparison::Less => WidthRange {
                        min: None,
                        max: Some(bound(false)),
                    },
                    Comparison::LessEqual => WidthRange {
                        min: None,
                        max: Some(bound(true)),
                    },
                    Comparison::Greater => WidthRange {
                        min: Some(bound(false)),
                        max: None,
                    },
                    Comparison::GreaterEqual => WidthRange {
                        min: Some(bound(true)),
                        max: None,
                    },
                };
                range.intersect(&single)
            })
    }

    /// The range of widths contained in both `self` and `other`.
    pub fn intersect(&self, other: &WidthRange) -> WidthRange {
        let min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(if a.value > b.value || (a.value == b.value && !a.inclusive)
            {
                a
            } else {
                b
            }),
            (a, b) => a.or(b),
        };
        let max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(if a.value < b.value || (a.value == b.value && !a.inclusive)
            {
                a
            } else {
                b
            }),
            (a, b) => a.or(b),
        };
        WidthRange { min, max }
    }

    /// Returns `true` if at least one width lies in the range.
    pub fn is_satisfiable(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                min.value < max.value || (min.value == max.value && min.inclusive && max.inclusive)
            }
            _ => true,
        }
    }

    /// Returns `true` if some width satisfies both ranges.
    pub fn overlaps(&self, other: &WidthRange) -> bool {
        self.intersect(other).is_satisfiable()
    }

    pub fn contains(&self, width: f32) -> bool {
        let above_min = self.min.is_none_or(|min| {
            if min.inclusive {
                width >= min.value
            } else {
                width > min.value
            }
        });
        let below_max = self.max.is_none_or(|max| {
            if max.inclusive {
                width <= max.value
            } else {
                width < max.value
            }
        });
        above_min && below_max
    }
}

/// A viewport-gated override block (`when <600 { ... }`).
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoint {
    /// Conditions as written, e.g. `"<600 >=320"`.
    pub condition_text: String,
    pub conditions: Vec<Condition>,
    pub range: WidthRange,
    /// Replacement nodes, if the block declares any.
    pub nodes: Option<Vec<Node>>,
    /// Additional style rules, if the block declares any.
    pub styles: Option<Vec<StyleRule>>,
    pub location: Location,
    pub span: Span,
}

impl Breakpoint {
    /// Returns `true` when every condition holds for `width`.
    pub fn matches(&self, width: f32) -> bool {
        self.conditions.iter().all(|condition| condition.holds(width))
    }
}

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub version: u32,
    pub nodes: Vec<Node>,
    pub styles: Vec<StyleRule>,
    pub variables: IndexMap<String, Value>,
    pub breakpoints: Vec<Breakpoint>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            nodes: Vec::new(),
            styles: Vec::new(),
            variables: IndexMap::new(),
            breakpoints: Vec::new(),
        }
    }
}

impl Document {
    /// Total number of nodes in the base tree.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Node::subtree_size).sum()
    }

    /// Find the first node in the base tree with the given id.
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        let mut found = None;
        walk_nodes(&self.nodes, |node| {
            if found.is_none() && node.id.as_deref() == Some(id) {
                found = Some(node);
            }
        });
        found
    }
}
