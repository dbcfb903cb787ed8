//! Wirekit - a layout language that compiles wireframe declarations into
//! positioned boxes.
//!
//! Source text goes through the parser, the breakpoint evaluator, the style
//! cascade and the layout engine. [`Compiler`] runs the whole pipeline and
//! returns a [`Compilation`]; [`Compiler::render_svg`] turns one into SVG.
//!
//! ```
//! use wirekit::Compiler;
//!
//! let mut compiler = Compiler::default();
//! let compilation = compiler.compile("card \"Login\"\n  input \"Email\"\n  button \"Sign in\"\n", None);
//! assert!(!compilation.has_errors());
//!
//! let svg = compiler.render_svg(&compilation).unwrap();
//! assert!(svg.contains("Sign in"));
//! ```

pub mod breakpoint;
pub mod color;
pub mod config;
pub mod export;
pub mod layout;
pub mod sink;
pub mod style;

mod error;

pub use wirekit_core::{component, document, layout_box, span, value};
pub use wirekit_parser::error::{Diagnostic, DiagnosticSink, ErrorCode, Severity};

pub use error::{ConfigError, WirekitError};

use log::{debug, info, trace, warn};

use wirekit_core::{document::Document, layout_box::LayoutBox};
use wirekit_parser::{ParseMetrics, parse_document};

use breakpoint::{BreakpointContext, BreakpointMetrics};
use config::AppConfig;
use export::svg::{Skin, SvgRenderer};
use layout::{LayoutEngine, LayoutMetrics, MemoCache};
use style::{StyleMetrics, StyleResolution, evaluate_styles};

/// Runs the compilation pipeline.
///
/// A compiler keeps state across calls: the breakpoint fallback counter and
/// the leaf layout memo. Reuse one compiler per edited document. The memo is
/// emptied whenever the viewport width changes or it reaches
/// [`MAX_MEMO_ENTRIES`].
///
/// ```
/// use wirekit::{Compiler, config::AppConfig, sink::LogSink};
///
/// let mut compiler = Compiler::new(AppConfig::default()).with_sink(LogSink);
/// let compilation = compiler.compile("button \"Go\"\n", Some(375.0));
/// assert_eq!(compilation.viewport_width(), 375.0);
/// ```
#[derive(Default)]
pub struct Compiler {
    config: AppConfig,
    sink: Option<Box<dyn DiagnosticSink>>,
    breakpoints: BreakpointContext,
    memo: MemoCache,
    /// Viewport width the memo entries were laid out at.
    memo_viewport: Option<f32>,
}

/// Memo size at which a [`Compiler`] starts over with an empty memo.
pub const MAX_MEMO_ENTRIES: usize = 4096;

/// Everything one compilation produced.
#[derive(Debug, Clone)]
pub struct Compilation {
    document: Document,
    styles: StyleResolution,
    boxes: Vec<LayoutBox>,
    diagnostics: Vec<Diagnostic>,
    viewport_width: f32,
    parse_metrics: ParseMetrics,
    breakpoint_metrics: BreakpointMetrics,
    layout_metrics: LayoutMetrics,
}

impl Compiler {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Report every diagnostic of later compilations to `sink`.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn breakpoint_context(&self) -> &BreakpointContext {
        &self.breakpoints
    }

    pub fn memo(&self) -> &MemoCache {
        &self.memo
    }

    fn prepare_memo(&mut self, viewport_width: f32) {
        if self.memo_viewport != Some(viewport_width) || self.memo.len() >= MAX_MEMO_ENTRIES {
            trace!(entries = self.memo.len(), viewport_width; "Clearing layout memo");
            self.memo.clear();
            self.memo_viewport = Some(viewport_width);
        }
    }

    /// Compile `source` at `viewport_width`, or at the configured width when
    /// `None`.
    ///
    /// Never fails: problems in the source are returned as diagnostics.
    pub fn compile(&mut self, source: &str, viewport_width: Option<f32>) -> Compilation {
        let viewport_width = viewport_width.unwrap_or(self.config.layout().viewport_width());
        info!(viewport_width, bytes = source.len(); "Compiling");

        let parsed = parse_document(source, &self.config.parse().options());
        let evaluation = self
            .breakpoints
            .evaluate(&parsed.document, viewport_width);
        let breakpoint_metrics = evaluation.metrics().clone();
        let document = evaluation.into_document();
        let styles = evaluate_styles(&document);

        let mut options = self.config.layout().options();
        options.viewport_width = viewport_width;
        options.max_diagnostics = self.config.parse().max_diagnostics();
        if let Some(unit) = styles.globals().get("u").and_then(|value| value.as_number()) {
            if unit > 0.0 {
                options.unit = unit;
            }
        }
        self.prepare_memo(viewport_width);
        let laid_out = LayoutEngine::new(options)
            .with_styles(&styles)
            .with_memo(&mut self.memo)
            .layout(&document);

        let mut diagnostics = parsed.diagnostics;
        diagnostics.extend(laid_out.diagnostics);
        diagnostics.truncate(self.config.parse().max_diagnostics());
        if let Some(sink) = self.sink.as_mut() {
            for diagnostic in &diagnostics {
                sink.report(diagnostic);
            }
        }
        debug!(
            diagnostics = diagnostics.len(),
            boxes = laid_out.metrics.node_count;
            "Compilation finished"
        );

        Compilation {
            document,
            styles,
            boxes: laid_out.boxes,
            diagnostics,
            viewport_width,
            parse_metrics: parsed.metrics,
            breakpoint_metrics,
            layout_metrics: laid_out.metrics,
        }
    }

    /// Render `compilation` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`WirekitError::Config`] if the configured background color or
    /// skin is invalid.
    pub fn render_svg(&self, compilation: &Compilation) -> Result<String, WirekitError> {
        render_svg(compilation, &self.config)
    }
}

/// Render `compilation` with the style settings of `config`.
///
/// The document's `skin` global wins over the configured skin. An unknown
/// skin in the document falls back to the default one.
///
/// # Errors
///
/// Returns [`WirekitError::Config`] if the configured background color or
/// skin is invalid.
pub fn render_svg(compilation: &Compilation, config: &AppConfig) -> Result<String, WirekitError> {
    let background = config
        .style()
        .background_color()
        .map_err(ConfigError::Invalid)?;
    let configured = match config.style().skin() {
        Some(name) => Some(Skin::named(name).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "unknown skin `{name}`, expected one of {}",
                Skin::NAMES.join(", ")
            ))
        })?),
        None => None,
    };

    let skin = match compilation.styles.skin() {
        Some(name) => Skin::named(name).unwrap_or_else(|| {
            warn!(skin = name; "Unknown skin, using the default");
            configured.clone().unwrap_or_default()
        }),
        None => configured.unwrap_or_default(),
    };

    let (width, height) = compilation.content_size();
    let svg = SvgRenderer::new(skin)
        .with_background(background)
        .with_styles(&compilation.document, &compilation.styles)
        .render(&compilation.boxes, width, height);
    info!(bytes = svg.len(); "SVG rendered");
    Ok(svg)
}

impl Compilation {
    /// The document after breakpoint evaluation.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn styles(&self) -> &StyleResolution {
        &self.styles
    }

    pub fn boxes(&self) -> &[LayoutBox] {
        &self.boxes
    }

    /// Parser diagnostics followed by layout diagnostics.
    ///
    /// At most `max_diagnostics` entries are kept for the whole run; parser
    /// diagnostics come first, so layout diagnostics are the ones dropped.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity() == Severity::Error)
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn parse_metrics(&self) -> &ParseMetrics {
        &self.parse_metrics
    }

    pub fn breakpoint_metrics(&self) -> &BreakpointMetrics {
        &self.breakpoint_metrics
    }

    pub fn style_metrics(&self) -> &StyleMetrics {
        self.styles.metrics()
    }

    pub fn layout_metrics(&self) -> &LayoutMetrics {
        &self.layout_metrics
    }

    /// Canvas size: the viewport width, or wider when content overflows it,
    /// by the height of the content.
    pub fn content_size(&self) -> (f32, f32) {
        self.boxes
            .iter()
            .fold((self.viewport_width, 0.0_f32), |(width, height), root| {
                (width.max(root.right()), height.max(root.bottom()))
            })
    }

    /// Turn a compilation with error-severity diagnostics into an error
    /// carrying `source`.
    ///
    /// # Errors
    ///
    /// Returns [`WirekitError::Diagnostics`] if any diagnostic is an error.
    pub fn into_result(self, source: &str) -> Result<Compilation, WirekitError> {
        if self.has_errors() {
            return Err(WirekitError::new_diagnostics_error(self.diagnostics, source));
        }
        Ok(self)
    }
}
