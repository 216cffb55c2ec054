//! SVG rendering sink.
//!
//! [`SvgSink`] implements [`RenderSink`] for [`Label`] payloads. Nodes are
//! drawn as labeled rectangles, clusters as labeled frames, and edge
//! primitives as their SVG counterparts. Output is grouped with
//! [`LayeredOutput`] so clusters sit below nodes, and edge labels sit on top.

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info, warn};
use svg::{
    self,
    node::{Text as SvgText, element as svg_element},
};

use graphcanvas_core::{
    apply_stroke,
    color::Color,
    draw::{BezierPath, LayeredOutput, Primitive, RenderLayer, SvgNode, TextDefinition, TextRun},
    geometry::{Bounds, Insets, Point, Size},
    graph::{EdgeId, ElementId},
    units::Pixels,
};

use super::Error;
use crate::sink::RenderSink;

/// Payload rendered by [`SvgSink`]: a caption with optional colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    fill: Option<Color>,
    stroke: Option<Color>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fill: None,
            stroke: None,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<Color> {
        self.stroke
    }
}

#[derive(Debug)]
struct Visual {
    label: Label,
    bounds: Option<Bounds>,
}

/// Collects a committed scene and renders it as an SVG document.
#[derive(Debug)]
pub struct SvgSink {
    text: TextDefinition,
    padding: Insets,
    background: Option<Color>,
    canvas_size: Option<Size>,
    visuals: IndexMap<ElementId, Visual>,
    primitives: Vec<(EdgeId, Primitive)>,
}

impl Default for SvgSink {
    fn default() -> Self {
        Self {
            text: TextDefinition::with_font("sans-serif", Pixels::new(14.0)),
            padding: Insets::uniform(8.0),
            background: None,
            canvas_size: None,
            visuals: IndexMap::new(),
            primitives: Vec::new(),
        }
    }
}

impl SvgSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Font used for node and cluster captions.
    pub fn with_text(mut self, text: TextDefinition) -> Self {
        self.text = text;
        self
    }

    /// Space between a caption and its node's outline.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// Bounds of a placed visual
    pub fn placement(&self, id: ElementId) -> Option<Bounds> {
        self.visuals.get(&id).and_then(|visual| visual.bounds)
    }

    pub fn primitives(&self) -> &[(EdgeId, Primitive)] {
        &self.primitives
    }

    /// Renders everything committed so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if no scene has been committed.
    pub fn to_document(&self) -> Result<svg::Document, Error> {
        let size = self
            .canvas_size
            .ok_or_else(|| Error::Render("no scene has been committed to the sink".to_string()))?;
        let (width, height) = (size.width().value(), size.height().value());

        let mut doc = svg::Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(color) = self.background {
            let background = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
            doc = doc.add(background);
        }

        let mut output = LayeredOutput::new();
        for (id, visual) in &self.visuals {
            let Some(bounds) = visual.bounds else {
                debug!(element:% = id; "Skipping unplaced visual");
                continue;
            };
            match id {
                ElementId::Node(_) => output.merge(self.render_node(*id, &visual.label, bounds)),
                ElementId::Cluster(_) => {
                    output.merge(self.render_cluster(*id, &visual.label, bounds))
                }
            }
        }
        for (_, primitive) in &self.primitives {
            let (layer, node) = render_primitive(primitive);
            output.add_to_layer(layer, node);
        }

        for group in output.render() {
            doc = doc.add(group);
        }
        Ok(doc)
    }

    /// Renders everything committed so far to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if no scene has been committed.
    pub fn to_svg_string(&self) -> Result<String, Error> {
        self.to_document().map(|doc| doc.to_string())
    }

    /// Writes the SVG document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if no scene has been committed, or
    /// [`Error::Io`] if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let doc = self.to_document()?;
        svg::save(path.as_ref(), &doc).map_err(Error::Io)?;
        info!(path:? = path.as_ref(); "SVG written");
        Ok(())
    }

    fn render_node(&self, id: ElementId, label: &Label, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let top_left = bounds.top_left();
        let fill = label.fill.unwrap_or_else(|| Color::new("white").unwrap_or_default());
        let stroke = label.stroke.unwrap_or_default();

        let rect = svg_element::Rectangle::new()
            .set("id", id.to_string())
            .set("x", top_left.x().value())
            .set("y", top_left.y().value())
            .set("width", bounds.width().value())
            .set("height", bounds.height().value())
            .set("fill", fill.to_string())
            .set("fill-opacity", fill.alpha())
            .set("stroke", stroke.to_string())
            .set("stroke-width", 1);
        output.add_to_layer(RenderLayer::Content, Box::new(rect));

        if !label.text.is_empty() {
            let center = bounds.center();
            let text = self
                .caption(&label.text, center)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central");
            output.add_to_layer(RenderLayer::Content, Box::new(text));
        }
        output
    }

    fn render_cluster(&self, id: ElementId, label: &Label, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let top_left = bounds.top_left();
        let stroke = label
            .stroke
            .unwrap_or_else(|| Color::new("gray").unwrap_or_default());

        let mut frame = svg_element::Rectangle::new()
            .set("id", id.to_string())
            .set("x", top_left.x().value())
            .set("y", top_left.y().value())
            .set("width", bounds.width().value())
            .set("height", bounds.height().value())
            .set("rx", 4)
            .set("stroke", stroke.to_string())
            .set("stroke-width", 1);
        frame = match label.fill {
            Some(fill) => frame
                .set("fill", fill.to_string())
                .set("fill-opacity", fill.alpha()),
            None => frame.set("fill", "none"),
        };
        output.add_to_layer(RenderLayer::Background, Box::new(frame));

        if !label.text.is_empty() {
            let anchor = Point::from_px(
                top_left.x().value() + self.padding.left(),
                top_left.y().value() + self.padding.top(),
            );
            let text = self
                .caption(&label.text, anchor)
                .set("dominant-baseline", "hanging");
            output.add_to_layer(RenderLayer::Background, Box::new(text));
        }
        output
    }

    fn caption(&self, content: &str, at: Point) -> svg_element::Text {
        svg_element::Text::new("")
            .set("x", at.x().value())
            .set("y", at.y().value())
            .set("font-family", self.text.font_family())
            .set("font-size", self.text.font_size().value())
            .set("fill", self.text.color().to_string())
            .add(SvgText::new(content))
    }
}

impl RenderSink<Label> for SvgSink {
    fn measure(&self, payload: &Label) -> Size {
        self.text.measure(&payload.text).add_padding(self.padding)
    }

    fn clear(&mut self) {
        self.canvas_size = None;
        self.visuals.clear();
        self.primitives.clear();
    }

    fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = Some(size);
    }

    fn materialize(&mut self, id: ElementId, payload: &Label) {
        self.visuals.insert(
            id,
            Visual {
                label: payload.clone(),
                bounds: None,
            },
        );
    }

    fn place(&mut self, id: ElementId, bounds: Bounds) {
        match self.visuals.get_mut(&id) {
            Some(visual) => visual.bounds = Some(bounds),
            None => warn!(element:% = id; "Ignoring placement of a visual that was never materialized"),
        }
    }

    fn draw(&mut self, edge: EdgeId, primitive: &Primitive) {
        self.primitives.push((edge, primitive.clone()));
    }
}

fn render_primitive(primitive: &Primitive) -> (RenderLayer, SvgNode) {
    match primitive {
        Primitive::Ellipse {
            center,
            radius_x,
            radius_y,
            stroke,
            fill,
        } => {
            let ellipse = svg_element::Ellipse::new()
                .set("cx", center.x().value())
                .set("cy", center.y().value())
                .set("rx", radius_x.value())
                .set("ry", radius_y.value())
                .set("fill", fill_value(*fill))
                .set("fill-opacity", fill.alpha());
            (RenderLayer::Arrow, Box::new(apply_stroke!(ellipse, stroke)))
        }
        Primitive::Polygon {
            points,
            stroke,
            fill,
        } => {
            let polygon = svg_element::Polygon::new()
                .set("points", points_value(points))
                .set("fill", fill_value(*fill))
                .set("fill-opacity", fill.alpha());
            (RenderLayer::Arrow, Box::new(apply_stroke!(polygon, stroke)))
        }
        Primitive::Polyline { points, stroke } => {
            let polyline = svg_element::Polyline::new()
                .set("points", points_value(points))
                .set("fill", "none");
            (RenderLayer::Arrow, Box::new(apply_stroke!(polyline, stroke)))
        }
        Primitive::Bezier { path, stroke } => {
            let path = svg_element::Path::new()
                .set("d", path_data(path))
                .set("fill", "none");
            (RenderLayer::Arrow, Box::new(apply_stroke!(path, stroke)))
        }
        Primitive::Text(run) => (RenderLayer::Text, Box::new(render_text(run))),
    }
}

fn render_text(run: &TextRun) -> svg_element::Text {
    let font = run.font();
    svg_element::Text::new("")
        .set("x", run.top_left().x().value())
        .set("y", run.top_left().y().value())
        .set("dominant-baseline", "text-before-edge")
        .set("font-family", font.font_family())
        .set("font-size", font.font_size().value())
        .set("fill", font.color().to_string())
        .set("fill-opacity", font.color().alpha())
        .add(SvgText::new(run.content()))
}

fn fill_value(fill: Color) -> String {
    if fill.is_transparent() {
        "none".to_string()
    } else {
        fill.to_string()
    }
}

fn points_value(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.x().value(), point.y().value()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn path_data(path: &BezierPath) -> String {
    let start = path.start();
    let mut data = format!("M {} {}", start.x().value(), start.y().value());
    for segment in path.segments() {
        let (c1, c2, end) = (segment.control1(), segment.control2(), segment.end());
        data.push_str(&format!(
            " C {} {} {} {} {} {}",
            c1.x().value(),
            c1.y().value(),
            c2.x().value(),
            c2.y().value(),
            end.x().value(),
            end.y().value()
        ));
    }
    data
}
