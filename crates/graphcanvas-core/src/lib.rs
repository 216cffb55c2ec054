//! GraphCanvas Core Types and Definitions
//!
//! This crate provides the foundational types shared by the GraphCanvas
//! layout pipeline and its rendering sinks:
//!
//! - **Units**: [`units::Points`], [`units::Pixels`] and [`units::Inches`] with explicit conversions
//! - **Geometry**: canvas-space points, sizes and bounds ([`geometry`] module)
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Graph**: the graph model handed to a render pass ([`graph`] module)
//! - **Draw**: primitives, strokes, text measurement and SVG layers ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod graph;
pub mod units;
