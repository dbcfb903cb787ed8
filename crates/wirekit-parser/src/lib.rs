//! Wirekit Parser - tokenizer and parser for the Wirekit layout language.
//!
//! The entry point is [`parse_document`], which turns source text into a
//! [`wirekit_core::document::Document`] together with every diagnostic
//! produced along the way. Parsing never aborts: malformed lines are
//! reported and skipped, so callers always receive a usable document.
//!
//! # Example
//!
//! ```
//! use wirekit_parser::{ParseOptions, parse_document};
//!
//! let output = parse_document("card \"Login\"\n  button \"Go\" #go\n", &ParseOptions::default());
//! assert!(!output.has_errors());
//! assert_eq!(output.document.nodes[0].children.len(), 1);
//! ```

pub mod error;
pub mod lexer;
mod parser;
pub mod tokens;

pub use lexer::{Tokenizer, tokenize, tokenize_with_diagnostics};
pub use parser::{ParseMetrics, ParseOptions, ParseOutput, parse, parse_document};
