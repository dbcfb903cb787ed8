//! CLI logic for the Wirekit layout tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use wirekit::{Compiler, Diagnostic, Severity, WirekitError};

/// What a successful run produced.
///
/// The SVG is written even when the source has error diagnostics; the
/// caller decides whether those fail the run.
#[derive(Debug, Clone)]
pub struct Report {
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity() == Severity::Error)
    }
}

/// Run the Wirekit CLI application
///
/// Compiles the input file and writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `WirekitError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid style settings in the configuration
pub fn run(args: &Args) -> Result<Report, WirekitError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing layout"
    );

    let app_config = config::load_config(args.config.as_ref())?.with_viewport(args.width, args.height);
    let source = fs::read_to_string(&args.input)?;

    let mut compiler = Compiler::new(app_config);
    let compilation = compiler.compile(&source, None);
    debug!(
        diagnostics = compilation.diagnostics().len(),
        boxes = compilation.layout_metrics().node_count;
        "Compiled"
    );

    let svg = compiler.render_svg(&compilation)?;
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(Report {
        diagnostics: compilation.diagnostics().to_vec(),
        source,
    })
}
