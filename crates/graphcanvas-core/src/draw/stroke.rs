//! Stroke definitions for replayed edge geometry.
//!
//! Every primitive produced from an edge's draw commands is outlined with a
//! [`StrokeDefinition`] derived from the edge itself: its color, its width and,
//! for the main curve only, its line style. The layout engine's output never
//! decides how a line looks, only where it goes.
//!
//! # Dash patterns
//!
//! | [`StrokeStyle`] | dash pattern | SVG `stroke-dasharray` |
//! |-----------------|--------------|------------------------|
//! | `Solid`         | `[]`         | *(omitted)*            |
//! | `Dashed`        | `[6, 2]`     | `"6,2"`                |
//! | `Dotted`        | `[1]`        | `"1"`                  |
//!
//! A single-entry pattern repeats with an equal gap, so `[1]` reads as
//! one unit on, one unit off.
//!
//! # Applying to SVG elements
//!
//! ```
//! use graphcanvas_core::{color::Color, draw::StrokeDefinition};
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::dashed(Color::new("navy").unwrap(), 1.5);
//! let line = svg_element::Polyline::new().set("points", "0,0 10,10");
//! let line = graphcanvas_core::apply_stroke!(line, &stroke);
//! ```

use std::str::FromStr;

use crate::{color::Color, graph::LineStyle};

const DASHED: [f32; 2] = [6.0, 2.0];
const DOTTED: [f32; 1] = [1.0];

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    /// Continuous line
    #[default]
    Solid,
    /// 6 units on, 2 units off
    Dashed,
    /// 1 unit on, 1 unit off
    Dotted,
}

impl StrokeStyle {
    /// Returns the repeating dash pattern, empty for a continuous line
    pub fn dash_pattern(self) -> &'static [f32] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &DASHED,
            Self::Dotted => &DOTTED,
        }
    }

    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(self) -> Option<String> {
        let pattern = self.dash_pattern();
        if pattern.is_empty() {
            return None;
        }
        let parts: Vec<String> = pattern.iter().map(f32::to_string).collect();
        Some(parts.join(","))
    }
}

impl From<LineStyle> for StrokeStyle {
    fn from(style: LineStyle) -> Self {
        match style {
            LineStyle::Solid => Self::Solid,
            LineStyle::Dashed => Self::Dashed,
            LineStyle::Dotted => Self::Dotted,
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<LineStyle>().map(Self::from)
    }
}

/// Color, width and dash pattern of an outline.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke with the given color and width in pixels.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    pub fn dotted(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dotted)
    }

    /// Returns a copy of this stroke with a different line pattern.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Shorthand for `self.style().dash_pattern()`
    pub fn dash_pattern(&self) -> &'static [f32] {
        self.style.dash_pattern()
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity and width, plus `stroke-dasharray` when the stroke is
/// not solid.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
