//! TOML graph documents.
//!
//! A document lists nodes, (nested) clusters and edges. Nodes are referred
//! to by a `key` that must be unique across the whole document:
//!
//! ```toml
//! engine = "dot"
//!
//! [[nodes]]
//! key = "start"
//! label = "Start"
//!
//! [[clusters]]
//! key = "main"
//! fill = "lightgray"
//! stroke = "darkgray"
//!
//! [[clusters.nodes]]
//! key = "validate"
//!
//! [[edges]]
//! from = "start"
//! to = "validate"
//! label = "Enter"
//! arrow_head = "box"
//! style = "dashed"
//! ```

use std::{collections::HashMap, io};

use serde::Deserialize;
use thiserror::Error;

use graphcanvas::{
    GraphCanvasError,
    color::Color,
    engine::LayoutEngine,
    export::svg::Label,
    graph::{ArrowShape, ClusterId, Graph, GraphError, LineStyle, NodeId},
    units::Pixels,
};

/// Errors in a graph document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse graph document: {0}")]
    Parse(String),

    #[error("Duplicate {kind} key `{key}`")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("Edge #{index} references unknown node `{key}`")]
    UnknownNode { index: usize, key: String },

    #[error("Invalid color for `{owner}`: {message}")]
    InvalidColor { owner: String, message: String },

    #[error("Edge #{index} has an invalid {field}: {value}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: f32,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl From<DocumentError> for GraphCanvasError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Graph(err) => GraphCanvasError::Graph(err),
            other => GraphCanvasError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    #[serde(default)]
    engine: Option<LayoutEngine>,
    #[serde(default)]
    nodes: Vec<NodeSpec>,
    #[serde(default)]
    clusters: Vec<ClusterSpec>,
    #[serde(default)]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeSpec {
    key: String,
    label: Option<String>,
    fill: Option<String>,
    stroke: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClusterSpec {
    key: String,
    label: Option<String>,
    fill: Option<String>,
    stroke: Option<String>,
    #[serde(default)]
    nodes: Vec<NodeSpec>,
    #[serde(default)]
    clusters: Vec<ClusterSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeSpec {
    from: String,
    to: String,
    label: Option<String>,
    head_label: Option<String>,
    tail_label: Option<String>,
    arrow_head: Option<ArrowShape>,
    arrow_tail: Option<ArrowShape>,
    style: Option<LineStyle>,
    width: Option<f32>,
    color: Option<String>,
    font_name: Option<String>,
    font_size: Option<f32>,
}

impl GraphDocument {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] for malformed TOML, unknown keys and
    /// unknown enum names.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        toml::from_str(source).map_err(|err| DocumentError::Parse(err.to_string()))
    }

    /// Layout engine requested by the document
    pub fn engine(&self) -> Option<LayoutEngine> {
        self.engine
    }

    /// Builds the graph described by the document.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate keys, edges between unknown nodes and
    /// invalid colors or sizes.
    pub fn to_graph(&self) -> Result<Graph<Label>, DocumentError> {
        let mut builder = Builder::default();

        for node in &self.nodes {
            builder.add_node(None, node)?;
        }
        for cluster in &self.clusters {
            builder.add_cluster(None, cluster)?;
        }
        for (index, edge) in self.edges.iter().enumerate() {
            builder.add_edge(index, edge)?;
        }

        Ok(builder.graph)
    }
}

#[derive(Default)]
struct Builder<'d> {
    graph: Graph<Label>,
    nodes: HashMap<&'d str, NodeId>,
    clusters: HashMap<&'d str, ClusterId>,
}

impl<'d> Builder<'d> {
    fn add_node(&mut self, parent: Option<ClusterId>, spec: &'d NodeSpec) -> Result<(), DocumentError> {
        if self.nodes.contains_key(spec.key.as_str()) {
            return Err(DocumentError::DuplicateKey {
                kind: "node",
                key: spec.key.clone(),
            });
        }
        let label = label(
            &spec.key,
            spec.label.as_deref(),
            spec.fill.as_deref(),
            spec.stroke.as_deref(),
        )?;
        let id = match parent {
            Some(cluster) => self.graph.add_node_to(cluster, label)?,
            None => self.graph.add_node(label),
        };
        self.nodes.insert(&spec.key, id);
        Ok(())
    }

    fn add_cluster(
        &mut self,
        parent: Option<ClusterId>,
        spec: &'d ClusterSpec,
    ) -> Result<(), DocumentError> {
        if self.clusters.contains_key(spec.key.as_str()) {
            return Err(DocumentError::DuplicateKey {
                kind: "cluster",
                key: spec.key.clone(),
            });
        }
        // Cluster captions are opt-in, the key only identifies the cluster.
        let label = label(
            &spec.key,
            Some(spec.label.as_deref().unwrap_or_default()),
            spec.fill.as_deref(),
            spec.stroke.as_deref(),
        )?;
        let id = match parent {
            Some(parent) => self.graph.add_subcluster(parent, label)?,
            None => self.graph.add_cluster(label),
        };
        self.clusters.insert(&spec.key, id);

        for node in &spec.nodes {
            self.add_node(Some(id), node)?;
        }
        for cluster in &spec.clusters {
            self.add_cluster(Some(id), cluster)?;
        }
        Ok(())
    }

    fn add_edge(&mut self, index: usize, spec: &EdgeSpec) -> Result<(), DocumentError> {
        let from = self.node(index, &spec.from)?;
        let to = self.node(index, &spec.to)?;
        let color = spec
            .color
            .as_deref()
            .map(|color| parse_color(&format!("edge #{index}"), color))
            .transpose()?;

        let edge = self.graph.add_edge(from, to)?;
        if let Some(label) = &spec.label {
            edge.set_label(label.as_str());
        }
        if let Some(label) = &spec.head_label {
            edge.set_head_label(label.as_str());
        }
        if let Some(label) = &spec.tail_label {
            edge.set_tail_label(label.as_str());
        }
        if let Some(shape) = spec.arrow_head {
            edge.set_arrow_head(shape);
        }
        if let Some(shape) = spec.arrow_tail {
            edge.set_arrow_tail(shape);
        }
        if let Some(style) = spec.style {
            edge.set_line_style(style);
        }
        if let Some(width) = spec.width {
            edge.set_line_width(positive(index, "width", width)?);
        }
        if let Some(color) = color {
            edge.set_color(color);
        }
        if let Some(font) = &spec.font_name {
            edge.set_font_name(font.as_str());
        }
        if let Some(size) = spec.font_size {
            edge.set_font_size(Pixels::new(positive(index, "font_size", size)?));
        }
        Ok(())
    }

    fn node(&self, index: usize, key: &str) -> Result<NodeId, DocumentError> {
        self.nodes
            .get(key)
            .copied()
            .ok_or_else(|| DocumentError::UnknownNode {
                index,
                key: key.to_string(),
            })
    }
}

fn label(
    key: &str,
    text: Option<&str>,
    fill: Option<&str>,
    stroke: Option<&str>,
) -> Result<Label, DocumentError> {
    let mut label = Label::new(text.unwrap_or(key));
    if let Some(fill) = fill {
        label = label.with_fill(parse_color(key, fill)?);
    }
    if let Some(stroke) = stroke {
        label = label.with_stroke(parse_color(key, stroke)?);
    }
    Ok(label)
}

fn parse_color(owner: &str, color: &str) -> Result<Color, DocumentError> {
    Color::new(color).map_err(|message| DocumentError::InvalidColor {
        owner: owner.to_string(),
        message,
    })
}

fn positive(index: usize, field: &'static str, value: f32) -> Result<f32, DocumentError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(DocumentError::InvalidValue {
            index,
            field,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use graphcanvas::graph::Element;

    use super::*;

    const DOCUMENT: &str = r#"
engine = "fdp"

[[nodes]]
key = "n1"
label = "Node 1"

[[nodes]]
key = "n4"

[[clusters]]
key = "group"
fill = "lightgray"
stroke = "darkgray"

[[clusters.nodes]]
key = "n2"
label = "Node 2"

[[clusters.clusters]]
key = "inner"

[[clusters.clusters.nodes]]
key = "n3"

[[edges]]
from = "n1"
to = "n2"
label = "Label"
arrow_head = "diamond"

[[edges]]
from = "n2"
to = "n3"
head_label = "Head label"
font_name = "Calibri"
style = "dotted"
width = 1.5
color = "darkblue"
font_size = 14.0
"#;

    #[test]
    fn test_document_builds_graph() {
        let document = GraphDocument::parse(DOCUMENT).unwrap();
        assert_eq!(document.engine(), Some(LayoutEngine::Fdp));

        let graph = document.to_graph().unwrap();
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.clusters().len(), 1);
        assert_eq!(graph.edges().len(), 2);

        let labels: Vec<&str> = graph
            .elements()
            .into_iter()
            .map(|element| match element {
                Element::Node(node) => node.payload().text(),
                Element::Cluster(cluster) => cluster.payload().text(),
            })
            .collect();
        assert_eq!(labels, ["Node 1", "n4", "", "Node 2", "", "n3"]);

        let second = &graph.edges()[1];
        assert_eq!(second.head_label(), "Head label");
        assert_eq!(second.font_name(), "Calibri");
        assert_eq!(second.line_style(), LineStyle::Dotted);
        assert_eq!(second.line_width(), 1.5);
        assert_eq!(second.font_size(), Pixels::new(14.0));
        assert_eq!(graph.edges()[0].arrow_head(), ArrowShape::Diamond);
    }

    #[test]
    fn test_duplicate_node_key_is_error() {
        let source = r#"
[[nodes]]
key = "a"

[[clusters]]
key = "c"

[[clusters.nodes]]
key = "a"
"#;
        let err = GraphDocument::parse(source).unwrap().to_graph().unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateKey { kind: "node", .. }));
    }

    #[test]
    fn test_unknown_edge_endpoint_is_error() {
        let source = r#"
[[nodes]]
key = "a"

[[edges]]
from = "a"
to = "b"
"#;
        let err = GraphDocument::parse(source).unwrap().to_graph().unwrap_err();
        assert_eq!(err.to_string(), "Edge #0 references unknown node `b`");
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        for source in [
            "[[edges]]\nfrom = \"a\"\nto = \"b\"\nstyle = \"wavy\"\n",
            "[[edges]]\nfrom = \"a\"\nto = \"b\"\narrow_head = \"star\"\n",
            "engine = \"spring\"\n",
            "[[nodes]]\nkey = \"a\"\nshape = \"circle\"\n",
        ] {
            assert!(
                matches!(GraphDocument::parse(source), Err(DocumentError::Parse(_))),
                "accepted {source:?}"
            );
        }
    }

    #[test]
    fn test_invalid_color_names_owner() {
        let source = "[[nodes]]\nkey = \"a\"\nfill = \"not-a-color\"\n";
        let err = GraphDocument::parse(source).unwrap().to_graph().unwrap_err();
        assert!(matches!(err, DocumentError::InvalidColor { ref owner, .. } if owner == "a"));
    }

    #[test]
    fn test_non_positive_width_is_error() {
        let source = r#"
[[nodes]]
key = "a"

[[edges]]
from = "a"
to = "a"
width = 0.0
"#;
        let err = GraphDocument::parse(source).unwrap().to_graph().unwrap_err();
        assert!(matches!(err, DocumentError::InvalidValue { field: "width", .. }));
    }
}
