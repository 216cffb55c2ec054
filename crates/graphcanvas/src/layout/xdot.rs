//! Decoding of xdot draw operations.
//!
//! Graphviz describes how to paint every part of an edge as a list of
//! operations, each tagged with a one-letter code:
//!
//! | op         | meaning          | fields used       |
//! |------------|------------------|-------------------|
//! | `e`, `E`   | ellipse          | `rect`            |
//! | `p`, `P`   | polygon          | `points`          |
//! | `L`        | polyline         | `points`          |
//! | `b`, `B`   | B-spline         | `points` (3n+1)   |
//! | `T`        | text             | `pt` `width` `text` |
//! | `C`        | fill color       | `color`           |
//!
//! Upper- and lower-case shape codes decode identically. Whether a shape is
//! filled is decided by the preceding `C` operation, not by the code. Every
//! other code (pen color, font, style, ...) decodes to [`DrawCommand::NoOp`].

use graphcanvas_core::{
    draw::{BezierPath, BezierSegment},
    geometry::{PageFlip, Point},
    units::{Pixels, Points},
};

use super::{ContractError, json::RawDrawCommand};

/// One decoded draw operation, in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Ellipse {
        center: Point,
        radius_x: Pixels,
        radius_y: Pixels,
    },
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
    BSpline(BezierPath),
    Text {
        center: Point,
        width: Pixels,
        text: String,
    },
    SetFillColor(String),
    NoOp,
}

/// Decodes one draw-command array; an absent array decodes to an empty list.
///
/// `object` names the owning edge in error messages.
pub(super) fn decode_list(
    raw: Option<&[RawDrawCommand]>,
    flip: PageFlip,
    object: &str,
) -> Result<Vec<DrawCommand>, ContractError> {
    raw.unwrap_or_default()
        .iter()
        .map(|command| decode(command, flip, object))
        .collect()
}

fn decode(raw: &RawDrawCommand, flip: PageFlip, object: &str) -> Result<DrawCommand, ContractError> {
    let missing = |field| ContractError::MissingField {
        object: object.to_string(),
        field,
    };
    let to_point = |[x, y]: [f32; 2]| flip.point(Points::new(x), Points::new(y));

    let command = match raw.op.as_str() {
        "e" | "E" => {
            let [cx, cy, rx, ry] = raw.rect.ok_or_else(|| missing("rect"))?;
            DrawCommand::Ellipse {
                center: to_point([cx, cy]),
                radius_x: Pixels::from(Points::new(rx)),
                radius_y: Pixels::from(Points::new(ry)),
            }
        }
        "p" | "P" => DrawCommand::Polygon(points(raw, to_point).ok_or_else(|| missing("points"))?),
        "L" => DrawCommand::Polyline(points(raw, to_point).ok_or_else(|| missing("points"))?),
        "b" | "B" => {
            let points = points(raw, to_point).ok_or_else(|| missing("points"))?;
            DrawCommand::BSpline(bezier_path(&points).ok_or_else(|| {
                ContractError::MalformedSpline {
                    object: object.to_string(),
                    points: points.len(),
                }
            })?)
        }
        "T" => DrawCommand::Text {
            center: to_point(raw.pt.ok_or_else(|| missing("pt"))?),
            width: Pixels::from(Points::new(raw.width.ok_or_else(|| missing("width"))?)),
            text: raw.text.clone().ok_or_else(|| missing("text"))?,
        },
        "C" => DrawCommand::SetFillColor(raw.color.clone().ok_or_else(|| missing("color"))?),
        _ => DrawCommand::NoOp,
    };

    Ok(command)
}

fn points(raw: &RawDrawCommand, to_point: impl Fn([f32; 2]) -> Point) -> Option<Vec<Point>> {
    raw.points
        .as_ref()
        .map(|points| points.iter().copied().map(to_point).collect())
}

/// Splits a flattened `3n+1` control-point stream into a start point and `n`
/// cubic segments. Returns `None` for any other length.
fn bezier_path(points: &[Point]) -> Option<BezierPath> {
    let (&start, rest) = points.split_first()?;
    if rest.len() % 3 != 0 {
        return None;
    }
    let segments = rest
        .chunks_exact(3)
        .map(|chunk| BezierSegment::new(chunk[0], chunk[1], chunk[2]))
        .collect();
    Some(BezierPath::new(start, segments))
}
