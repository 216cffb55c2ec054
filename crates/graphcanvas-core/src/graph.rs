//! In-memory graph model handed to a render pass.
//!
//! A [`Graph`] owns its top-level [`Node`]s, its [`Edge`]s and its top-level
//! [`Cluster`]s. Clusters own their child nodes and child clusters, so nesting
//! is a tree by construction and a cluster can never contain itself.
//!
//! Every element receives an identity from counters scoped to the graph
//! instance. Identities double as the element names in the layout engine's
//! input, which is why the cluster prefix is fixed: the engine only treats a
//! subgraph as a cluster when its name starts with [`CLUSTER_PREFIX`].
//!
//! Payloads are opaque to this crate. They are whatever the rendering sink
//! knows how to measure and materialize.
//!
//! # Examples
//!
//! ```
//! # use graphcanvas_core::graph::{ArrowShape, Graph, LineStyle};
//! let mut graph = Graph::new();
//! let start = graph.add_node("Start");
//! let group = graph.add_cluster("Main");
//! let validate = graph.add_node_to(group, "Validate").unwrap();
//!
//! let edge = graph.add_edge(start, validate).unwrap();
//! edge.set_label("Enter");
//! edge.set_arrow_head(ArrowShape::Box);
//! edge.set_line_style(LineStyle::Dashed);
//!
//! assert_eq!(start.to_string(), "node_0");
//! assert_eq!(group.to_string(), "cluster_0");
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{color::Color, units::Pixels};

/// Name prefix the layout engine requires for a subgraph to be a cluster.
pub const CLUSTER_PREFIX: &str = "cluster";

/// Errors raised while building or validating a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node `{0}` does not belong to this graph")]
    UnknownNode(NodeId),

    #[error("cluster `{0}` does not belong to this graph")]
    UnknownCluster(ClusterId),
}

/// Identity of a [`Node`], rendered as `node_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Identity of an [`Edge`], rendered as `edge_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

/// Identity of a [`Cluster`], rendered as `cluster_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge_{}", self.0)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CLUSTER_PREFIX}_{}", self.0)
    }
}

/// Identity of any element that owns a visual on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Node(NodeId),
    Cluster(ClusterId),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => id.fmt(f),
            Self::Cluster(id) => id.fmt(f),
        }
    }
}

/// Arrowhead shapes understood by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowShape {
    Box,
    Crow,
    Curve,
    Icurve,
    Diamond,
    Dot,
    Inv,
    None,
    Normal,
    Tee,
    Vee,
}

impl ArrowShape {
    /// All shapes, in declaration order.
    pub const ALL: [ArrowShape; 11] = [
        Self::Box,
        Self::Crow,
        Self::Curve,
        Self::Icurve,
        Self::Diamond,
        Self::Dot,
        Self::Inv,
        Self::None,
        Self::Normal,
        Self::Tee,
        Self::Vee,
    ];

    /// Returns the lower-case name used in the engine's input language
    pub fn name(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Crow => "crow",
            Self::Curve => "curve",
            Self::Icurve => "icurve",
            Self::Diamond => "diamond",
            Self::Dot => "dot",
            Self::Inv => "inv",
            Self::None => "none",
            Self::Normal => "normal",
            Self::Tee => "tee",
            Self::Vee => "vee",
        }
    }
}

impl FromStr for ArrowShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| format!("invalid arrow shape `{s}`"))
    }
}

impl fmt::Display for ArrowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Line pattern of an edge curve.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!(
                "unsupported line style `{s}`, valid values: solid, dashed, dotted"
            )),
        }
    }
}

/// A graph node carrying an opaque payload.
#[derive(Debug, Clone)]
pub struct Node<P> {
    id: NodeId,
    payload: P,
}

impl<P> Node<P> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

/// A directed connection between two nodes and its styling.
#[derive(Debug, Clone)]
pub struct Edge {
    id: EdgeId,
    from: NodeId,
    to: NodeId,
    arrow_head: ArrowShape,
    arrow_tail: ArrowShape,
    line_style: LineStyle,
    line_width: f32,
    label: String,
    head_label: String,
    tail_label: String,
    color: Color,
    font_size: Pixels,
    font_name: String,
}

impl Edge {
    fn new(id: EdgeId, from: NodeId, to: NodeId) -> Self {
        Self {
            id,
            from,
            to,
            arrow_head: ArrowShape::Normal,
            arrow_tail: ArrowShape::None,
            line_style: LineStyle::Solid,
            line_width: 1.0,
            label: String::new(),
            head_label: String::new(),
            tail_label: String::new(),
            color: Color::default(),
            font_size: Pixels::new(12.0),
            font_name: String::from("Consolas"),
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn arrow_head(&self) -> ArrowShape {
        self.arrow_head
    }

    pub fn arrow_tail(&self) -> ArrowShape {
        self.arrow_tail
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    /// Stroke width in pixels
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn head_label(&self) -> &str {
        &self.head_label
    }

    pub fn tail_label(&self) -> &str {
        &self.tail_label
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn font_size(&self) -> Pixels {
        self.font_size
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn set_arrow_head(&mut self, shape: ArrowShape) -> &mut Self {
        self.arrow_head = shape;
        self
    }

    pub fn set_arrow_tail(&mut self, shape: ArrowShape) -> &mut Self {
        self.arrow_tail = shape;
        self
    }

    pub fn set_line_style(&mut self, style: LineStyle) -> &mut Self {
        self.line_style = style;
        self
    }

    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.line_width = width;
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    pub fn set_head_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.head_label = label.into();
        self
    }

    pub fn set_tail_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.tail_label = label.into();
        self
    }

    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    pub fn set_font_size(&mut self, size: Pixels) -> &mut Self {
        self.font_size = size;
        self
    }

    pub fn set_font_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.font_name = name.into();
        self
    }
}

/// A named, possibly nested, group of nodes.
#[derive(Debug, Clone)]
pub struct Cluster<P> {
    id: ClusterId,
    payload: P,
    nodes: Vec<Node<P>>,
    clusters: Vec<Cluster<P>>,
}

impl<P> Cluster<P> {
    fn new(id: ClusterId, payload: P) -> Self {
        Self {
            id,
            payload,
            nodes: Vec::new(),
            clusters: Vec::new(),
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Nodes directly inside this cluster
    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }

    /// Clusters directly inside this cluster
    pub fn clusters(&self) -> &[Cluster<P>] {
        &self.clusters
    }

    fn find_mut(&mut self, id: ClusterId) -> Option<&mut Cluster<P>> {
        if self.id == id {
            return Some(self);
        }
        self.clusters.iter_mut().find_map(|child| child.find_mut(id))
    }

    fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|node| node.id == id)
            || self.clusters.iter().any(|child| child.contains_node(id))
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<Element<'a, P>>) {
        out.push(Element::Cluster(self));
        out.extend(self.nodes.iter().map(Element::Node));
        for child in &self.clusters {
            child.collect_elements(out);
        }
    }
}

/// A borrowed view of any element owning a visual.
#[derive(Debug)]
pub enum Element<'a, P> {
    Node(&'a Node<P>),
    Cluster(&'a Cluster<P>),
}

impl<P> Element<'_, P> {
    pub fn id(&self) -> ElementId {
        match self {
            Self::Node(node) => ElementId::Node(node.id),
            Self::Cluster(cluster) => ElementId::Cluster(cluster.id),
        }
    }

    pub fn payload(&self) -> &P {
        match self {
            Self::Node(node) => &node.payload,
            Self::Cluster(cluster) => &cluster.payload,
        }
    }
}

/// The complete input of one render pass.
#[derive(Debug, Clone)]
pub struct Graph<P> {
    nodes: Vec<Node<P>>,
    edges: Vec<Edge>,
    clusters: Vec<Cluster<P>>,
    next_node: u32,
    next_edge: u32,
    next_cluster: u32,
}

impl<P> Default for Graph<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            clusters: Vec::new(),
            next_node: 0,
            next_edge: 0,
            next_cluster: 0,
        }
    }
}

impl<P> Graph<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level nodes
    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Top-level clusters
    pub fn clusters(&self) -> &[Cluster<P>] {
        &self.clusters
    }

    /// Adds a top-level node.
    pub fn add_node(&mut self, payload: P) -> NodeId {
        let id = self.next_node_id();
        self.nodes.push(Node { id, payload });
        id
    }

    /// Adds a top-level cluster.
    pub fn add_cluster(&mut self, payload: P) -> ClusterId {
        let id = self.next_cluster_id();
        self.clusters.push(Cluster::new(id, payload));
        id
    }

    /// Adds a node inside an existing cluster.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownCluster`] if `cluster` is not part of this graph.
    pub fn add_node_to(&mut self, cluster: ClusterId, payload: P) -> Result<NodeId, GraphError> {
        let id = NodeId(self.next_node);
        let parent = find_cluster_mut(&mut self.clusters, cluster)
            .ok_or(GraphError::UnknownCluster(cluster))?;
        parent.nodes.push(Node { id, payload });
        self.next_node += 1;
        Ok(id)
    }

    /// Adds a cluster nested inside an existing cluster.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownCluster`] if `parent` is not part of this graph.
    pub fn add_subcluster(&mut self, parent: ClusterId, payload: P) -> Result<ClusterId, GraphError> {
        let id = ClusterId(self.next_cluster);
        let parent_cluster = find_cluster_mut(&mut self.clusters, parent)
            .ok_or(GraphError::UnknownCluster(parent))?;
        parent_cluster.clusters.push(Cluster::new(id, payload));
        self.next_cluster += 1;
        Ok(id)
    }

    /// Connects two nodes and returns the new edge for styling.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if either endpoint is not part of this graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<&mut Edge, GraphError> {
        for endpoint in [from, to] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::UnknownNode(endpoint));
            }
        }
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.push(Edge::new(id, from, to));
        let index = self.edges.len() - 1;
        Ok(&mut self.edges[index])
    }

    /// Returns true if the node lives anywhere in this graph
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|node| node.id == id)
            || self.clusters.iter().any(|cluster| cluster.contains_node(id))
    }

    /// All elements owning a visual, in materialization order: top-level
    /// nodes first, then every top-level cluster followed by its own nodes
    /// and, recursively, its child clusters.
    pub fn elements(&self) -> Vec<Element<'_, P>> {
        let mut out: Vec<Element<'_, P>> = self.nodes.iter().map(Element::Node).collect();
        for cluster in &self.clusters {
            cluster.collect_elements(&mut out);
        }
        out
    }

    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn next_cluster_id(&mut self) -> ClusterId {
        let id = ClusterId(self.next_cluster);
        self.next_cluster += 1;
        id
    }
}

fn find_cluster_mut<P>(clusters: &mut [Cluster<P>], id: ClusterId) -> Option<&mut Cluster<P>> {
    clusters.iter_mut().find_map(|cluster| cluster.find_mut(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_per_graph() {
        let mut graph = Graph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c1 = graph.add_cluster(());
        let c2 = graph.add_subcluster(c1, ()).unwrap();
        let n = graph.add_node_to(c2, ()).unwrap();

        assert_eq!(a.to_string(), "node_0");
        assert_eq!(b.to_string(), "node_1");
        assert_eq!(n.to_string(), "node_2");
        assert_eq!(c1.to_string(), "cluster_0");
        assert_eq!(c2.to_string(), "cluster_1");

        let mut other = Graph::new();
        assert_eq!(other.add_node(()).to_string(), "node_0");
    }

    #[test]
    fn test_unknown_cluster_is_rejected_without_consuming_ids() {
        let mut foreign = Graph::<()>::new();
        foreign.add_cluster(());
        let foreign_cluster = foreign.add_cluster(());

        let mut graph = Graph::new();
        let err = graph.add_node_to(foreign_cluster, ()).unwrap_err();
        assert_eq!(err, GraphError::UnknownCluster(foreign_cluster));
        assert_eq!(graph.add_node(()).to_string(), "node_0");
    }

    #[test]
    fn test_edge_requires_known_endpoints() {
        let mut other = Graph::<()>::new();
        other.add_node(());
        let stranger = other.add_node(());

        let mut graph = Graph::new();
        let a = graph.add_node(());
        assert_eq!(
            graph.add_edge(a, stranger).unwrap_err(),
            GraphError::UnknownNode(stranger)
        );
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_edge_defaults() {
        let mut graph = Graph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let edge = graph.add_edge(a, b).unwrap();

        assert_eq!(edge.id().to_string(), "edge_0");
        assert_eq!(edge.arrow_head(), ArrowShape::Normal);
        assert_eq!(edge.arrow_tail(), ArrowShape::None);
        assert_eq!(edge.line_style(), LineStyle::Solid);
        assert_eq!(edge.line_width(), 1.0);
        assert_eq!(edge.font_size(), Pixels::new(12.0));
        assert_eq!(edge.font_name(), "Consolas");
        assert_eq!(edge.color(), Color::default());
        assert!(edge.label().is_empty());
    }

    #[test]
    fn test_edge_setters_chain() {
        let mut graph = Graph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph
            .add_edge(a, b)
            .unwrap()
            .set_label("go")
            .set_head_label("in")
            .set_tail_label("out")
            .set_arrow_tail(ArrowShape::Diamond)
            .set_line_style(LineStyle::Dotted)
            .set_line_width(2.5);

        let edge = &graph.edges()[0];
        assert_eq!(edge.label(), "go");
        assert_eq!(edge.head_label(), "in");
        assert_eq!(edge.tail_label(), "out");
        assert_eq!(edge.arrow_tail(), ArrowShape::Diamond);
        assert_eq!(edge.line_style(), LineStyle::Dotted);
        assert_eq!(edge.line_width(), 2.5);
    }

    #[test]
    fn test_elements_follow_materialization_order() {
        let mut graph = Graph::new();
        let outer = graph.add_cluster("outer");
        graph.add_node_to(outer, "in-outer").unwrap();
        let inner = graph.add_subcluster(outer, "inner").unwrap();
        graph.add_node_to(inner, "in-inner").unwrap();
        graph.add_node("top");
        graph.add_cluster("second");

        let payloads: Vec<&str> = graph.elements().iter().map(|e| *e.payload()).collect();
        assert_eq!(
            payloads,
            vec!["top", "outer", "in-outer", "inner", "in-inner", "second"]
        );
    }

    #[test]
    fn test_arrow_shape_names_roundtrip() {
        for shape in ArrowShape::ALL {
            assert_eq!(shape.name().parse::<ArrowShape>().unwrap(), shape);
        }
        assert!("arrow".parse::<ArrowShape>().is_err());
    }

    #[test]
    fn test_line_style_rejects_unknown() {
        assert_eq!("dashed".parse::<LineStyle>().unwrap(), LineStyle::Dashed);
        let err = "dashdot".parse::<LineStyle>().unwrap_err();
        assert!(err.contains("unsupported line style"));
    }
}
