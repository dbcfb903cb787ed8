//! Viewport-dependent breakpoint evaluation.
//!
//! The last breakpoint in document order whose conditions all hold wins.
//! Its nodes replace the base nodes and its styles are appended after the
//! base styles. The input document is never modified; the evaluation owns a
//! derived copy.

use log::{debug, trace};

use wirekit_core::document::{Breakpoint, Document, Node, StyleRule};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointMetrics {
    /// Number of breakpoints tested.
    pub evaluated: usize,
    /// Index of the winning breakpoint.
    pub matched_index: Option<usize>,
    pub used_fallback: bool,
    /// Fallback count of the owning [`BreakpointContext`] after this run.
    pub fallback_activations: usize,
}

/// Caller-owned evaluation state.
///
/// Counts how often evaluation fell back to the base document. One context
/// is typically kept per host session.
#[derive(Debug, Clone, Default)]
pub struct BreakpointContext {
    fallback_activations: usize,
}

/// The document as seen at one viewport width.
#[derive(Debug, Clone)]
pub struct BreakpointEvaluation {
    document: Document,
    active: Option<Breakpoint>,
    metrics: BreakpointMetrics,
}

impl BreakpointContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fallback_activations(&self) -> usize {
        self.fallback_activations
    }

    /// Select the breakpoint active at `viewport_width` and derive the
    /// document it produces.
    pub fn evaluate(&mut self, document: &Document, viewport_width: f32) -> BreakpointEvaluation {
        let matched_index = document
            .breakpoints
            .iter()
            .rposition(|breakpoint| breakpoint.matches(viewport_width));

        let mut derived = document.clone();
        let active = matched_index.map(|index| document.breakpoints[index].clone());
        match &active {
            Some(breakpoint) => {
                if let Some(nodes) = &breakpoint.nodes {
                    derived.nodes = nodes.clone();
                }
                if let Some(styles) = &breakpoint.styles {
                    derived.styles.extend(styles.iter().cloned());
                }
                debug!(
                    viewport_width,
                    conditions = breakpoint.condition_text.as_str();
                    "Breakpoint active"
                );
            }
            None => {
                self.fallback_activations += 1;
                trace!(viewport_width; "No breakpoint matched, using base document");
            }
        }

        let metrics = BreakpointMetrics {
            evaluated: document.breakpoints.len(),
            matched_index,
            used_fallback: active.is_none(),
            fallback_activations: self.fallback_activations,
        };

        BreakpointEvaluation {
            document: derived,
            active,
            metrics,
        }
    }
}

/// Evaluate `document` at `viewport_width` against `context`.
pub fn evaluate_breakpoints(
    document: &Document,
    viewport_width: f32,
    context: &mut BreakpointContext,
) -> BreakpointEvaluation {
    context.evaluate(document, viewport_width)
}

impl BreakpointEvaluation {
    /// The derived document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn nodes(&self) -> &[Node] {
        &self.document.nodes
    }

    pub fn styles(&self) -> &[StyleRule] {
        &self.document.styles
    }

    pub fn active_breakpoint(&self) -> Option<&Breakpoint> {
        self.active.as_ref()
    }

    pub fn metrics(&self) -> &BreakpointMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use wirekit_parser::parse;

    use super::*;

    const RESPONSIVE: &str = r#"style default { skin: wire }
vstack
  button "Desktop"
when <600 {
  style .compact { pad: 1 }
  vstack
    button "Mobile"
}
when >=1024 { text "Wide" }
"#;

    fn document(source: &str) -> Document {
        let output = parse(source);
        assert!(!output.has_errors(), "{:#?}", output.diagnostics);
        output.document
    }

    fn first_label(nodes: &[Node]) -> Option<&str> {
        nodes.first().and_then(|node| {
            node.label
                .as_deref()
                .or_else(|| node.children.first().and_then(|child| child.label.as_deref()))
        })
    }

    #[test]
    fn test_fallback_between_breakpoints() {
        let document = document(RESPONSIVE);
        let mut context = BreakpointContext::new();

        let evaluation = evaluate_breakpoints(&document, 800.0, &mut context);

        assert_eq!(evaluation.nodes(), document.nodes.as_slice());
        assert!(evaluation.active_breakpoint().is_none());
        assert!(evaluation.metrics().used_fallback);
        assert_eq!(evaluation.metrics().evaluated, 2);
        assert_eq!(context.fallback_activations(), 1);
    }

    #[test]
    fn test_matching_breakpoint_replaces_nodes_and_appends_styles() {
        let document = document(RESPONSIVE);
        let mut context = BreakpointContext::new();

        let evaluation = context.evaluate(&document, 375.0);

        assert_eq!(evaluation.metrics().matched_index, Some(0));
        assert_eq!(first_label(evaluation.nodes()), Some("Mobile"));
        assert_eq!(evaluation.styles().len(), 2);
        assert_eq!(context.fallback_activations(), 0);

        // Styles-free breakpoint keeps the base styles.
        let wide = context.evaluate(&document, 1280.0);
        assert_eq!(first_label(wide.nodes()), Some("Wide"));
        assert_eq!(wide.styles().len(), 1);
    }

    #[test]
    fn test_last_matching_breakpoint_wins() {
        let document = document("text \"Base\"\nwhen <800 { text \"A\" }\nwhen <600 { text \"B\" }\n");
        let mut context = BreakpointContext::new();

        assert_eq!(first_label(context.evaluate(&document, 500.0).nodes()), Some("B"));
        assert_eq!(first_label(context.evaluate(&document, 700.0).nodes()), Some("A"));
    }

    #[test]
    fn test_contexts_do_not_share_counters() {
        let document = document(RESPONSIVE);

        let mut first = BreakpointContext::new();
        first.evaluate(&document, 800.0);
        first.evaluate(&document, 900.0);
        let mut second = BreakpointContext::new();
        let evaluation = second.evaluate(&document, 800.0);

        assert_eq!(first.fallback_activations(), 2);
        assert_eq!(evaluation.metrics().fallback_activations, 1);
    }

    #[test]
    fn test_input_document_is_untouched() {
        let document = document(RESPONSIVE);
        let before = document.clone();

        let _ = BreakpointContext::new().evaluate(&document, 375.0);

        assert_eq!(document, before);
    }
}
