//! Rendering of laid out documents.

pub mod svg;
