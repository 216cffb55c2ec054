//! Replay of decoded draw commands as styled primitives.
//!
//! Each draw-command list is interpreted on its own by a small state machine
//! whose only state is the current fill color. The state starts transparent
//! for every list and changes on [`DrawCommand::SetFillColor`]:
//!
//! - white means "no fill" and makes the fill transparent,
//! - any other color fills with the edge's own color.
//!
//! The engine is never asked for a fill color, so white only shows up for
//! hollow arrowheads. An explicit white fill is indistinguishable and is
//! rendered transparent as well.
//!
//! Geometry comes from the commands; stroke color, width and dash pattern
//! always come from the [`Edge`].

use graphcanvas_core::{
    color::Color,
    draw::{Primitive, StrokeDefinition, StrokeStyle, TextDefinition, TextRun},
    geometry::Point,
    graph::Edge,
    units::Pixels,
};

use crate::layout::{DrawCommand, EdgeLayout, EdgePart};

/// Distance from a text's vertical center to its top, as a fraction of the
/// font size.
const BASELINE_FACTOR: f32 = 0.8;

/// Running fill color of one draw-command list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillState {
    current: Color,
}

impl Default for FillState {
    fn default() -> Self {
        Self {
            current: Color::transparent(),
        }
    }
}

impl FillState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Color {
        self.current
    }

    /// Reacts to a fill color reported by the engine.
    pub fn set_reported(&mut self, reported: &str, edge_color: Color) {
        self.current = if is_white(reported) {
            Color::transparent()
        } else {
            edge_color
        };
    }
}

fn is_white(color: &str) -> bool {
    let color = color.trim();
    ["#ffffff", "#ffffffff", "white"]
        .iter()
        .any(|white| color.eq_ignore_ascii_case(white))
}

/// Interprets every part of an edge in replay order.
pub fn interpret_edge(edge: &Edge, layout: &EdgeLayout) -> Vec<Primitive> {
    EdgePart::REPLAY_ORDER
        .into_iter()
        .flat_map(|part| interpret_part(edge, part, layout.part(part)))
        .collect()
}

/// Interprets one draw-command list with a fresh [`FillState`].
pub fn interpret_part(edge: &Edge, part: EdgePart, commands: &[DrawCommand]) -> Vec<Primitive> {
    let style = if part.uses_line_style() {
        StrokeStyle::from(edge.line_style())
    } else {
        StrokeStyle::Solid
    };
    let stroke = StrokeDefinition::new(edge.color(), edge.line_width()).with_style(style);

    let mut fill = FillState::new();
    let mut primitives = Vec::new();

    for command in commands {
        let primitive = match command {
            DrawCommand::SetFillColor(reported) => {
                fill.set_reported(reported, edge.color());
                continue;
            }
            DrawCommand::NoOp => continue,
            DrawCommand::Ellipse {
                center,
                radius_x,
                radius_y,
            } => Primitive::Ellipse {
                center: *center,
                radius_x: *radius_x,
                radius_y: *radius_y,
                stroke: stroke.clone(),
                fill: fill.current(),
            },
            DrawCommand::Polygon(points) => Primitive::Polygon {
                points: points.clone(),
                stroke: stroke.clone(),
                fill: fill.current(),
            },
            DrawCommand::Polyline(points) => Primitive::Polyline {
                points: points.clone(),
                stroke: stroke.clone(),
            },
            DrawCommand::BSpline(path) => Primitive::Bezier {
                path: path.clone(),
                stroke: stroke.clone(),
            },
            DrawCommand::Text {
                center,
                width,
                text,
            } => Primitive::Text(text_run(edge, *center, *width, text)),
        };
        primitives.push(primitive);
    }

    primitives
}

fn text_run(edge: &Edge, center: Point, width: Pixels, text: &str) -> TextRun {
    let mut font = TextDefinition::with_font(edge.font_name(), edge.font_size());
    font.set_color(edge.color());

    let top_left = Point::new(
        center.x() - width / 2,
        center.y() - Pixels::new(edge.font_size().value() * BASELINE_FACTOR),
    );
    TextRun::new(top_left, text, font)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use graphcanvas_core::{
        draw::{BezierPath, BezierSegment},
        graph::{Graph, LineStyle},
    };

    use super::*;

    fn edge_with(style: LineStyle, color: &str) -> Edge {
        let mut graph = Graph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph
            .add_edge(a, b)
            .unwrap()
            .set_line_style(style)
            .set_line_width(2.0)
            .set_color(Color::new(color).unwrap());
        graph.edges()[0].clone()
    }

    fn triangle() -> DrawCommand {
        DrawCommand::Polygon(vec![
            Point::from_px(0.0, 0.0),
            Point::from_px(4.0, 0.0),
            Point::from_px(2.0, 4.0),
        ])
    }

    fn fills(primitives: &[Primitive]) -> Vec<Color> {
        primitives.iter().filter_map(Primitive::fill).collect()
    }

    #[test]
    fn test_fill_starts_transparent() {
        let edge = edge_with(LineStyle::Solid, "red");
        let out = interpret_part(&edge, EdgePart::HeadArrow, &[triangle()]);
        assert!(fills(&out)[0].is_transparent());
    }

    #[test]
    fn test_white_means_transparent_other_means_edge_color() {
        let edge = edge_with(LineStyle::Solid, "red");
        let commands = [
            DrawCommand::SetFillColor("#000000".into()),
            triangle(),
            DrawCommand::SetFillColor("#ffffff".into()),
            triangle(),
            triangle(),
            DrawCommand::SetFillColor("blue".into()),
            triangle(),
        ];
        let out = interpret_part(&edge, EdgePart::HeadArrow, &commands);
        let fills = fills(&out);
        assert_eq!(fills.len(), 4);
        assert_eq!(fills[0], edge.color());
        assert!(fills[1].is_transparent());
        assert!(fills[2].is_transparent());
        assert_eq!(fills[3], edge.color());
    }

    #[test]
    fn test_fill_resets_between_parts() {
        let edge = edge_with(LineStyle::Solid, "red");
        let mut layout_commands = vec![DrawCommand::SetFillColor("#000000".into()), triangle()];
        let first = interpret_part(&edge, EdgePart::HeadArrow, &layout_commands);
        layout_commands.remove(0);
        let second = interpret_part(&edge, EdgePart::TailArrow, &layout_commands);
        assert_eq!(fills(&first)[0], edge.color());
        assert!(fills(&second)[0].is_transparent());
    }

    #[test]
    fn test_only_curve_uses_line_style() {
        let edge = edge_with(LineStyle::Dashed, "red");
        let spline = DrawCommand::BSpline(BezierPath::new(
            Point::from_px(0.0, 0.0),
            vec![BezierSegment::new(
                Point::from_px(1.0, 1.0),
                Point::from_px(2.0, 2.0),
                Point::from_px(3.0, 3.0),
            )],
        ));

        let curve = interpret_part(&edge, EdgePart::Curve, &[spline]);
        let stroke = curve[0].stroke().unwrap();
        assert_eq!(stroke.dash_pattern(), &[6.0, 2.0]);
        assert_eq!(stroke.width(), 2.0);
        assert_eq!(stroke.color(), edge.color());

        let arrow = interpret_part(&edge, EdgePart::HeadArrow, &[triangle()]);
        assert!(arrow[0].stroke().unwrap().dash_pattern().is_empty());
    }

    #[test]
    fn test_text_anchor() {
        let edge = edge_with(LineStyle::Solid, "green");
        let commands = [DrawCommand::Text {
            center: Point::from_px(100.0, 50.0),
            width: Pixels::new(40.0),
            text: "label".into(),
        }];
        let out = interpret_part(&edge, EdgePart::CurveLabel, &commands);
        let Primitive::Text(run) = &out[0] else {
            panic!("expected text, got {:?}", out[0]);
        };
        // font size defaults to 12 px
        assert_approx_eq!(f32, run.top_left().x().value(), 80.0);
        assert_approx_eq!(f32, run.top_left().y().value(), 50.0 - 9.6, epsilon = 1e-4);
        assert_eq!(run.content(), "label");
        assert_eq!(run.font().font_family(), "Consolas");
        assert_eq!(run.font().color(), edge.color());
    }

    #[test]
    fn test_noops_produce_nothing() {
        let edge = edge_with(LineStyle::Dotted, "red");
        let out = interpret_part(&edge, EdgePart::Curve, &[DrawCommand::NoOp]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_edge_replay_order() {
        let json = r#"{
            "bb": "0,0,100,100",
            "edges": [{
                "id": "edge_0",
                "_hdraw_": [{"op": "p", "points": [[0,0],[1,0],[0,1]]}],
                "_tdraw_": [{"op": "L", "points": [[0,0],[1,1]]}],
                "_ldraw_": [{"op": "T", "pt": [5,5], "width": 10, "text": "x"}],
                "_draw_": [{"op": "b", "points": [[0,0],[1,1],[2,2],[3,3]]}]
            }]
        }"#;
        let layout = crate::layout::LayoutResult::from_json(json).unwrap();
        let edge = edge_with(LineStyle::Solid, "red");

        let kinds: Vec<&str> = interpret_edge(&edge, layout.edge("edge_0").unwrap())
            .iter()
            .map(Primitive::kind)
            .collect();
        assert_eq!(kinds, ["bezier", "text", "polyline", "polygon"]);
    }
}
