//! Drawing primitives and their visual definitions.
//!
//! The interpreter in the `graphcanvas` crate turns layout output into
//! [`Primitive`]s styled with [`StrokeDefinition`] and [`TextDefinition`].
//! SVG-producing sinks group their output with [`LayeredOutput`].
mod layer;
mod primitive;
mod stroke;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use primitive::{BezierPath, BezierSegment, Primitive, TextRun};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::TextDefinition;
