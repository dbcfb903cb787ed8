//! Command-line argument definitions for the Wirekit CLI.

use clap::Parser;

/// Compile a Wirekit layout file to SVG
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input `.wire` file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Viewport width in pixels, overriding the configuration
    #[arg(long)]
    pub width: Option<f32>,

    /// Viewport height in pixels, overriding the configuration
    #[arg(long)]
    pub height: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["wirekit", "page.wire"]);

        assert_eq!(args.input, "page.wire");
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.config, None);
        assert_eq!(args.width, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_viewport_flags() {
        let args = Args::parse_from([
            "wirekit", "page.wire", "-o", "page.svg", "--width", "375", "--height", "640",
        ]);

        assert_eq!(args.output, "page.svg");
        assert_eq!(args.width, Some(375.0));
        assert_eq!(args.height, Some(640.0));
    }
}
