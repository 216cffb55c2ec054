//! GraphCanvas - graphs laid out by Graphviz, rendered as positioned primitives.
//!
//! A render pass serializes a [`graph::Graph`] to DOT, hands it to a layout
//! [`engine::Engine`], interprets the engine's JSON output (node and cluster
//! placement plus xdot draw commands for every edge) and commits the result
//! to a [`sink::RenderSink`].

pub mod config;
pub mod dot;
pub mod engine;
pub mod export;
pub mod interpret;
pub mod layout;
pub mod sink;

mod error;

pub use graphcanvas_core::{color, draw, geometry, graph, units};

pub use error::GraphCanvasError;

use log::{debug, info};

use graphcanvas_core::{draw::TextDefinition, graph::Graph};

use config::AppConfig;
use engine::{Engine, GraphvizEngine, LayoutEngine};
use export::svg::{Label, SvgSink};
use layout::LayoutResult;
use sink::{RenderSink, Scene};

/// Runs render passes for graphs.
///
/// # Examples
///
/// ```rust,no_run
/// use graphcanvas::{GraphRenderer, config::AppConfig, export::svg::Label, graph::Graph};
///
/// let mut graph = Graph::new();
/// let a = graph.add_node(Label::new("a"));
/// let b = graph.add_node(Label::new("b"));
/// graph.add_edge(a, b).expect("both nodes belong to the graph");
///
/// let renderer = GraphRenderer::new(AppConfig::default());
/// let svg = renderer.render_svg(&graph).expect("Failed to render");
/// println!("{svg}");
/// ```
#[derive(Debug)]
pub struct GraphRenderer<E = GraphvizEngine> {
    config: AppConfig,
    engine: E,
    layout_engine: LayoutEngine,
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl GraphRenderer {
    /// Creates a renderer that runs Graphviz as configured in `config`.
    pub fn new(config: AppConfig) -> Self {
        let engine = config.graphviz().engine();
        let layout_engine = config.layout().engine();
        Self {
            config,
            engine,
            layout_engine,
        }
    }
}

impl<E: Engine> GraphRenderer<E> {
    /// Replaces the engine that computes layouts.
    pub fn with_engine<F: Engine>(self, engine: F) -> GraphRenderer<F> {
        GraphRenderer {
            config: self.config,
            engine,
            layout_engine: self.layout_engine,
        }
    }

    /// Overrides the configured layout algorithm.
    pub fn with_layout_engine(mut self, layout_engine: LayoutEngine) -> Self {
        self.layout_engine = layout_engine;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn layout_engine(&self) -> LayoutEngine {
        self.layout_engine
    }

    /// Serializes `graph` to DOT, sizing nodes with the sink's measurements.
    pub fn to_dot<P, S: RenderSink<P> + ?Sized>(&self, graph: &Graph<P>, sink: &S) -> String {
        dot::to_dot(graph, |payload| sink.measure(payload))
    }

    /// Lays out `graph` without rendering it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphCanvasError::Engine`] if the engine fails, or
    /// [`GraphCanvasError::Contract`] if its output cannot be interpreted.
    pub fn layout<P, S: RenderSink<P> + ?Sized>(
        &self,
        graph: &Graph<P>,
        sink: &S,
    ) -> Result<LayoutResult, GraphCanvasError> {
        let description = self.to_dot(graph, sink);

        info!(engine:% = self.layout_engine; "Running layout engine");
        let json = self.engine.layout(&description, self.layout_engine)?;
        debug!(output_len = json.len(); "Layout engine finished");

        let layout = LayoutResult::from_json(&json)?;
        debug!(
            nodes_count = layout.nodes().count(),
            clusters_count = layout.clusters().count(),
            edges_count = layout.edges().count();
            "Layout interpreted"
        );
        Ok(layout)
    }

    /// Renders `graph` onto `sink`.
    ///
    /// The sink is only touched (beyond measuring) once the whole pass has
    /// succeeded; on error it keeps its previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`GraphCanvasError::Engine`] if the engine fails, or
    /// [`GraphCanvasError::Contract`] if its output is inconsistent with
    /// the graph.
    pub fn draw_graph<P, S: RenderSink<P> + ?Sized>(
        &self,
        graph: &Graph<P>,
        sink: &mut S,
    ) -> Result<(), GraphCanvasError> {
        info!(
            nodes_count = graph.nodes().len(),
            edges_count = graph.edges().len(),
            clusters_count = graph.clusters().len();
            "Starting render pass"
        );
        let layout = self.layout(graph, sink)?;
        let scene = Scene::build(graph, &layout)?;
        scene.commit(sink);
        info!("Render pass complete");
        Ok(())
    }

    /// Builds an [`SvgSink`] styled by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphCanvasError::Config`] for invalid style values.
    pub fn svg_sink(&self) -> Result<SvgSink, GraphCanvasError> {
        let style = self.config.style();
        let font_size = style.font_size().map_err(GraphCanvasError::Config)?;
        let padding = style.padding().map_err(GraphCanvasError::Config)?;
        let background = style.background_color().map_err(GraphCanvasError::Config)?;

        Ok(SvgSink::new()
            .with_text(TextDefinition::with_font(style.font_family(), font_size))
            .with_padding(padding)
            .with_background(background))
    }

    /// Renders `graph` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Self::draw_graph`], or
    /// [`GraphCanvasError::Config`] for invalid style values.
    pub fn render_svg(&self, graph: &Graph<Label>) -> Result<String, GraphCanvasError> {
        let mut sink = self.svg_sink()?;
        self.draw_graph(graph, &mut sink)?;
        let svg = sink.to_svg_string()?;
        info!("SVG rendered successfully");
        Ok(svg)
    }
}
