//! CLI logic for the GraphCanvas tool.
//!
//! Reads a TOML graph document, lays it out with Graphviz and writes the
//! rendered SVG.

pub mod document;
pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use graphcanvas::{GraphCanvasError, GraphRenderer, engine::LayoutEngine};

use document::GraphDocument;

/// Run the GraphCanvas CLI application
///
/// The layout engine is taken from `--engine` if given, then from the
/// document, then from the configuration.
///
/// # Errors
///
/// Returns `GraphCanvasError` for:
/// - File I/O errors and invalid graph documents
/// - Configuration loading errors
/// - Layout engine failures
/// - Layout output the pipeline cannot interpret
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), GraphCanvasError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let document = GraphDocument::parse(&source)?;
    let graph = document.to_graph()?;
    debug!(
        nodes_count = graph.nodes().len(),
        clusters_count = graph.clusters().len(),
        edges_count = graph.edges().len();
        "Graph document loaded"
    );

    let mut renderer = GraphRenderer::new(app_config);
    if let Some(engine) = requested_engine(args, &document)? {
        renderer = renderer.with_layout_engine(engine);
    }

    let svg = renderer.render_svg(&graph)?;
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

fn requested_engine(
    args: &Args,
    document: &GraphDocument,
) -> Result<Option<LayoutEngine>, GraphCanvasError> {
    match &args.engine {
        Some(name) => name
            .parse()
            .map(Some)
            .map_err(GraphCanvasError::Config),
        None => Ok(document.engine()),
    }
}
