//! Integration tests for full render passes against a stub layout engine.

use std::cell::RefCell;

use float_cmp::assert_approx_eq;

use graphcanvas::{
    GraphCanvasError, GraphRenderer,
    color::Color,
    draw::Primitive,
    engine::{Engine, EngineError, LayoutEngine},
    export::svg::{Label, SvgSink},
    graph::{ArrowShape, ClusterId, ElementId, Graph, LineStyle, NodeId},
    layout::ContractError,
};

/// Two stacked nodes joined by one edge with a normal arrowhead.
const TWO_NODES: &str = r##"{
    "name": "G",
    "bb": "0,0,54,108",
    "objects": [
        {"_gvid": 0, "name": "cluster_0", "bb": "8,8,46,100"},
        {"_gvid": 1, "name": "node_0", "pos": "27,90", "width": "0.75", "height": "0.5"},
        {"_gvid": 2, "name": "node_1", "pos": "27,18", "width": "0.75", "height": "0.5"}
    ],
    "edges": [{
        "_gvid": 0,
        "id": "edge_0",
        "tail": 1,
        "head": 2,
        "_draw_": [
            {"op": "c", "grad": "none", "color": "#000000"},
            {"op": "b", "points": [[27,71.7],[27,63.98],[27,55.71],[27,46.1]]}
        ],
        "_hdraw_": [
            {"op": "S", "style": "solid"},
            {"op": "c", "grad": "none", "color": "#000000"},
            {"op": "C", "grad": "none", "color": "#000000"},
            {"op": "P", "points": [[30.5,46.1],[27,36.1],[23.5,46.1]]}
        ],
        "_ldraw_": [
            {"op": "F", "size": 10.5, "face": "Consolas"},
            {"op": "T", "pt": [40,58.8], "align": "c", "width": 20, "text": "go"}
        ]
    }]
}"##;

struct StubEngine {
    output: String,
    submitted: RefCell<Vec<(String, LayoutEngine)>>,
}

impl StubEngine {
    fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            submitted: RefCell::new(Vec::new()),
        }
    }
}

impl Engine for StubEngine {
    fn layout(&self, description: &str, engine: LayoutEngine) -> Result<String, EngineError> {
        self.submitted
            .borrow_mut()
            .push((description.to_string(), engine));
        Ok(self.output.clone())
    }
}

struct FailingEngine;

impl Engine for FailingEngine {
    fn layout(&self, description: &str, engine: LayoutEngine) -> Result<String, EngineError> {
        Err(EngineError::LayoutFailed {
            engine,
            message: "trouble in init_rank".to_string(),
            description: description.to_string(),
        })
    }
}

struct Fixture {
    graph: Graph<Label>,
    cluster: ClusterId,
    top: NodeId,
    bottom: NodeId,
}

fn fixture() -> Fixture {
    let mut graph = Graph::new();
    let cluster = graph.add_cluster(Label::new("group"));
    let top = graph.add_node_to(cluster, Label::new("top")).unwrap();
    let bottom = graph.add_node_to(cluster, Label::new("bottom")).unwrap();
    graph
        .add_edge(top, bottom)
        .unwrap()
        .set_label("go")
        .set_line_style(LineStyle::Dashed)
        .set_arrow_head(ArrowShape::Normal)
        .set_color(Color::new("navy").unwrap());
    Fixture {
        graph,
        cluster,
        top,
        bottom,
    }
}

#[test]
fn test_render_pass_places_nodes_and_draws_edge() {
    let fixture = fixture();
    let engine = StubEngine::new(TWO_NODES);
    let renderer = GraphRenderer::default()
        .with_engine(&engine)
        .with_layout_engine(LayoutEngine::Neato);
    let mut sink = SvgSink::new();

    renderer.draw_graph(&fixture.graph, &mut sink).unwrap();

    let submitted = engine.submitted.borrow();
    assert_eq!(submitted.len(), 1);
    let (description, layout_engine) = &submitted[0];
    assert_eq!(*layout_engine, LayoutEngine::Neato);
    assert!(description.contains("subgraph cluster_0 {"));
    assert!(description.contains("node_0 -> node_1 ["));

    let top = sink.placement(ElementId::Node(fixture.top)).unwrap();
    let bottom = sink.placement(ElementId::Node(fixture.bottom)).unwrap();
    assert_approx_eq!(f32, top.width().value(), 72.0);
    assert_approx_eq!(f32, top.height().value(), 48.0);
    assert_approx_eq!(f32, top.top_left().y().value(), 0.0, epsilon = 1e-3);
    assert_approx_eq!(f32, bottom.top_left().y().value(), 96.0, epsilon = 1e-3);

    let cluster = sink.placement(ElementId::Cluster(fixture.cluster)).unwrap();
    assert!(cluster.contains(top.center()));
    assert!(cluster.contains(bottom.center()));

    let primitives: Vec<&Primitive> = sink.primitives().iter().map(|(_, p)| p).collect();
    let kinds: Vec<&str> = primitives.iter().map(|p| p.kind()).collect();
    assert_eq!(kinds, ["bezier", "text", "polygon"]);

    // The curve leaves the bottom of the top node and the arrow tip touches
    // the top of the bottom node.
    let Primitive::Bezier { path, stroke } = primitives[0] else {
        panic!("expected the curve first");
    };
    let start = path.start();
    assert!((start.y().value() - (top.top_left().y().value() + top.height().value())).abs() < 1.0);
    assert_eq!(stroke.dash_pattern(), &[6.0, 2.0]);
    assert_eq!(stroke.color(), Color::new("navy").unwrap());

    let Primitive::Polygon { points, fill, .. } = primitives[2] else {
        panic!("expected the arrowhead last");
    };
    assert!((points[1].y().value() - bottom.top_left().y().value()).abs() < 1.0);
    assert_eq!(*fill, Color::new("navy").unwrap());
}

#[test]
fn test_render_svg_contains_layers() {
    let fixture = fixture();
    let engine = StubEngine::new(TWO_NODES);
    let renderer = GraphRenderer::default().with_engine(&engine);

    let svg = renderer.render_svg(&fixture.graph).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains(r#"data-layer="background""#));
    assert!(svg.contains(r#"data-layer="content""#));
    assert!(svg.contains(r#"data-layer="arrow""#));
    assert!(svg.contains(r#"data-layer="text""#));
    assert!(svg.contains(r#"id="node_0""#));
    assert!(svg.contains(r#"id="cluster_0""#));
}

#[test]
fn test_engine_failure_leaves_sink_untouched() {
    let fixture = fixture();
    let engine = StubEngine::new(TWO_NODES);
    let mut sink = SvgSink::new();
    GraphRenderer::default()
        .with_engine(&engine)
        .draw_graph(&fixture.graph, &mut sink)
        .unwrap();
    let before = sink.to_svg_string().unwrap();

    let mut other = Graph::new();
    other.add_node(Label::new("lonely"));
    let err = GraphRenderer::default()
        .with_engine(FailingEngine)
        .draw_graph(&other, &mut sink)
        .unwrap_err();

    match err {
        GraphCanvasError::Engine(err) => {
            assert_eq!(err.message(), Some("trouble in init_rank"));
            assert!(err.description().contains("node_0 [label=\"\""));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(sink.to_svg_string().unwrap(), before);
}

#[test]
fn test_contract_violation_leaves_sink_untouched() {
    let fixture = fixture();
    let mut sink = SvgSink::new();
    let broken = StubEngine::new(TWO_NODES.replace("node_1", "node_7"));

    let err = GraphRenderer::default()
        .with_engine(&broken)
        .draw_graph(&fixture.graph, &mut sink)
        .unwrap_err();

    assert!(matches!(
        err,
        GraphCanvasError::Contract(ContractError::MissingNode(ref name)) if name == "node_1"
    ));
    assert!(sink.to_svg_string().is_err());
}

#[test]
fn test_cluster_missing_from_layout_is_skipped() {
    let fixture = fixture();
    let without_cluster = TWO_NODES.replace(
        r#"{"_gvid": 0, "name": "cluster_0", "bb": "8,8,46,100"},"#,
        "",
    );
    let engine = StubEngine::new(without_cluster);
    let mut sink = SvgSink::new();

    GraphRenderer::default()
        .with_engine(&engine)
        .draw_graph(&fixture.graph, &mut sink)
        .unwrap();

    assert!(sink.placement(ElementId::Cluster(fixture.cluster)).is_none());
    assert!(sink.placement(ElementId::Node(fixture.top)).is_some());
    let svg = sink.to_svg_string().unwrap();
    assert!(!svg.contains(r#"id="cluster_0""#));
}

#[test]
fn test_second_pass_replaces_first() {
    let fixture = fixture();
    let engine = StubEngine::new(TWO_NODES);
    let renderer = GraphRenderer::default().with_engine(&engine);
    let mut sink = SvgSink::new();

    renderer.draw_graph(&fixture.graph, &mut sink).unwrap();
    renderer.draw_graph(&fixture.graph, &mut sink).unwrap();

    assert_eq!(sink.primitives().len(), 3);
}
