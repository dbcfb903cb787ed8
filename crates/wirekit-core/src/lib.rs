//! Wirekit Core Types and Definitions
//!
//! This crate provides the foundational types shared by every stage of the
//! Wirekit pipeline. It includes:
//!
//! - **Source positions**: byte spans and line/column locations ([`span`] module)
//! - **Values**: the literal values carried by properties and declarations ([`value::Value`])
//! - **Components**: the closed component catalog and its property schema ([`component`] module)
//! - **Document**: the parsed document model ([`document`] module)
//! - **Geometry**: basic geometric types ([`geometry`] module)
//! - **Layout boxes**: the positioned output tree ([`layout_box::LayoutBox`])

pub mod component;
pub mod document;
pub mod geometry;
pub mod layout_box;
pub mod span;
pub mod value;
