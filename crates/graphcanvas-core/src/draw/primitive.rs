//! Concrete geometry handed to a rendering sink.
//!
//! A [`Primitive`] is fully resolved: coordinates are in canvas space
//! (top-left origin, pixels) and every visual attribute is decided. A sink
//! only has to paint it.

use crate::{
    color::Color,
    draw::{StrokeDefinition, TextDefinition},
    geometry::Point,
    units::Pixels,
};

/// One cubic Bézier segment continuing from the previous end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSegment {
    control1: Point,
    control2: Point,
    end: Point,
}

impl BezierSegment {
    pub fn new(control1: Point, control2: Point, end: Point) -> Self {
        Self {
            control1,
            control2,
            end,
        }
    }

    pub fn control1(&self) -> Point {
        self.control1
    }

    pub fn control2(&self) -> Point {
        self.control2
    }

    pub fn end(&self) -> Point {
        self.end
    }
}

/// A start point followed by a chain of cubic segments.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPath {
    start: Point,
    segments: Vec<BezierSegment>,
}

impl BezierPath {
    pub fn new(start: Point, segments: Vec<BezierSegment>) -> Self {
        Self { start, segments }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[BezierSegment] {
        &self.segments
    }

    /// The point where the path ends, the start point for an empty path
    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, BezierSegment::end)
    }
}

/// A positioned, styled piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    top_left: Point,
    content: String,
    font: TextDefinition,
}

impl TextRun {
    pub fn new(top_left: Point, content: impl Into<String>, font: TextDefinition) -> Self {
        Self {
            top_left,
            content: content.into(),
            font,
        }
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn font(&self) -> &TextDefinition {
        &self.font
    }
}

/// A drawable shape in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Ellipse {
        center: Point,
        radius_x: Pixels,
        radius_y: Pixels,
        stroke: StrokeDefinition,
        fill: Color,
    },
    /// Closed outline; the last point connects back to the first.
    Polygon {
        points: Vec<Point>,
        stroke: StrokeDefinition,
        fill: Color,
    },
    /// Open outline.
    Polyline {
        points: Vec<Point>,
        stroke: StrokeDefinition,
    },
    Bezier {
        path: BezierPath,
        stroke: StrokeDefinition,
    },
    Text(TextRun),
}

impl Primitive {
    /// Stroke of a shape primitive, `None` for text
    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        match self {
            Self::Ellipse { stroke, .. }
            | Self::Polygon { stroke, .. }
            | Self::Polyline { stroke, .. }
            | Self::Bezier { stroke, .. } => Some(stroke),
            Self::Text(_) => None,
        }
    }

    /// Fill of a fillable primitive, `None` otherwise
    pub fn fill(&self) -> Option<Color> {
        match self {
            Self::Ellipse { fill, .. } | Self::Polygon { fill, .. } => Some(*fill),
            Self::Polyline { .. } | Self::Bezier { .. } | Self::Text(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ellipse { .. } => "ellipse",
            Self::Polygon { .. } => "polygon",
            Self::Polyline { .. } => "polyline",
            Self::Bezier { .. } => "bezier",
            Self::Text(_) => "text",
        }
    }
}
