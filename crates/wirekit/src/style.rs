//! Style cascade evaluation.
//!
//! `default` rules merge into a set of globals in source order. Every other
//! rule applies to the nodes its selector matches, ordered by specificity
//! and then by source order, so that among equally specific rules the later
//! one wins.

use log::debug;

use wirekit_core::{
    document::{Document, Node, Selector, StyleMap, StyleRule, walk_nodes},
    value::Value,
};

/// Counters describing one cascade evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMetrics {
    pub total_rules: usize,
    /// Targeted rules that match at least one node.
    pub matched_rules: usize,
    /// Selectors of targeted rules that match no node, in source order.
    pub unmatched_selectors: Vec<String>,
}

/// The result of [`evaluate_styles`].
///
/// Holds the merged globals and the targeted rules, so the style of any node
/// can be resolved on demand.
#[derive(Debug, Clone)]
pub struct StyleResolution {
    globals: StyleMap,
    /// Targeted rules with their source index.
    rules: Vec<(usize, StyleRule)>,
    metrics: StyleMetrics,
}

/// Resolve the cascade of `document`.
pub fn evaluate_styles(document: &Document) -> StyleResolution {
    let mut globals = StyleMap::new();
    let mut rules = Vec::new();
    for (index, rule) in document.styles.iter().enumerate() {
        if rule.selector == Selector::Default {
            for (name, value) in &rule.declarations {
                globals.insert(name.clone(), value.clone());
            }
        } else {
            rules.push((index, rule.clone()));
        }
    }

    let mut matched = vec![false; rules.len()];
    walk_nodes(&document.nodes, |node| {
        for (slot, (_, rule)) in matched.iter_mut().zip(&rules) {
            if !*slot && rule.selector.matches(node) {
                *slot = true;
            }
        }
    });

    let unmatched_selectors: Vec<String> = rules
        .iter()
        .zip(&matched)
        .filter(|(_, matched)| !**matched)
        .map(|((_, rule), _)| rule.selector.to_string())
        .collect();
    let metrics = StyleMetrics {
        total_rules: document.styles.len(),
        matched_rules: rules.len() - unmatched_selectors.len(),
        unmatched_selectors,
    };
    debug!(
        total_rules = metrics.total_rules,
        matched_rules = metrics.matched_rules,
        globals = globals.len();
        "Evaluated styles"
    );

    StyleResolution {
        globals,
        rules,
        metrics,
    }
}

impl StyleResolution {
    /// Declarations of every `default` rule, later rules winning.
    pub fn globals(&self) -> &StyleMap {
        &self.globals
    }

    /// The skin chosen by the `default` rules, if any.
    pub fn skin(&self) -> Option<&str> {
        self.globals.get("skin").and_then(Value::as_text)
    }

    pub fn metrics(&self) -> &StyleMetrics {
        &self.metrics
    }

    /// The resolved declarations of `node`: globals overlaid with every
    /// matching rule by ascending specificity, then source order.
    pub fn node_styles(&self, node: &Node) -> StyleMap {
        let mut matching: Vec<&(usize, StyleRule)> = self
            .rules
            .iter()
            .filter(|(_, rule)| rule.selector.matches(node))
            .collect();
        matching.sort_by_key(|(index, rule)| (rule.selector.specificity(), *index));

        let mut styles = self.globals.clone();
        for (_, rule) in matching {
            for (name, value) in &rule.declarations {
                styles.insert(name.clone(), value.clone());
            }
        }
        styles
    }

    /// A single resolved declaration of `node`.
    pub fn node_style(&self, node: &Node, name: &str) -> Option<Value> {
        self.rules
            .iter()
            .filter(|(_, rule)| rule.selector.matches(node))
            .filter_map(|(index, rule)| {
                rule.declarations
                    .get(name)
                    .map(|value| ((rule.selector.specificity(), *index), value))
            })
            .max_by_key(|(order, _)| *order)
            .map(|(_, value)| value)
            .or_else(|| self.globals.get(name))
            .cloned()
    }
}
