//! The rendering surface contract and the staged render pass.
//!
//! A [`RenderSink`] owns the visual surface. It measures payloads, creates a
//! visual per node and cluster, positions those visuals, and paints edge
//! primitives. The pipeline never inspects payloads itself.
//!
//! A render pass first computes a complete [`Scene`] without touching the
//! sink (apart from measuring). Only a fully built scene is committed, so a
//! pass that fails anywhere before commit leaves the sink's previous
//! contents intact.

use log::{debug, info};

use graphcanvas_core::{
    draw::Primitive,
    geometry::{Bounds, Size},
    graph::{EdgeId, ElementId, Element, Graph},
};

use crate::{
    interpret,
    layout::{ContractError, LayoutResult},
};

/// A visual surface that graph elements are rendered onto.
///
/// Visuals are keyed by [`ElementId`]; a commit always materializes an id
/// before placing it.
pub trait RenderSink<P> {
    /// Natural size of a payload's visual, in pixels.
    fn measure(&self, payload: &P) -> Size;

    /// Drops every visual and primitive from a previous pass.
    fn clear(&mut self);

    fn set_canvas_size(&mut self, size: Size);

    /// Creates the visual for a node or cluster.
    fn materialize(&mut self, id: ElementId, payload: &P);

    /// Positions a previously materialized visual.
    fn place(&mut self, id: ElementId, bounds: Bounds);

    /// Paints one primitive belonging to an edge.
    fn draw(&mut self, edge: EdgeId, primitive: &Primitive);
}

/// A node or cluster visual waiting to be committed.
#[derive(Debug)]
pub struct Visual<'g, P> {
    id: ElementId,
    payload: &'g P,
    bounds: Option<Bounds>,
}

impl<P> Visual<'_, P> {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn payload(&self) -> &P {
        self.payload
    }

    /// `None` for a cluster the engine did not lay out
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

/// Everything one render pass puts on the sink, ready to commit.
#[derive(Debug)]
pub struct Scene<'g, P> {
    canvas_size: Size,
    visuals: Vec<Visual<'g, P>>,
    primitives: Vec<(EdgeId, Primitive)>,
}

impl<'g, P> Scene<'g, P> {
    /// Combines a graph with its layout.
    ///
    /// Visuals follow the graph's materialization order. Clusters missing
    /// from the layout stay unplaced.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::MissingNode`] or [`ContractError::MissingEdge`]
    /// if the layout lacks an element the graph declared.
    pub fn build(graph: &'g Graph<P>, layout: &LayoutResult) -> Result<Self, ContractError> {
        let mut visuals = Vec::new();
        for element in graph.elements() {
            let id = element.id();
            let name = id.to_string();
            let bounds = match element {
                Element::Node(_) => Some(
                    layout
                        .node(&name)
                        .ok_or_else(|| ContractError::MissingNode(name.clone()))?,
                ),
                Element::Cluster(_) => {
                    let bounds = layout.cluster(&name);
                    if bounds.is_none() {
                        debug!(cluster = name; "Cluster not laid out, leaving it unplaced");
                    }
                    bounds
                }
            };
            visuals.push(Visual {
                id,
                payload: element_payload(&element),
                bounds,
            });
        }

        let mut primitives = Vec::new();
        for edge in graph.edges() {
            let id = edge.id().to_string();
            let edge_layout = layout
                .edge(&id)
                .ok_or_else(|| ContractError::MissingEdge(id.clone()))?;
            primitives.extend(
                interpret::interpret_edge(edge, edge_layout)
                    .into_iter()
                    .map(|primitive| (edge.id(), primitive)),
            );
        }

        debug!(
            visuals_count = visuals.len(),
            primitives_count = primitives.len();
            "Scene built"
        );

        Ok(Self {
            canvas_size: layout.canvas_size(),
            visuals,
            primitives,
        })
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn visuals(&self) -> &[Visual<'g, P>] {
        &self.visuals
    }

    pub fn primitives(&self) -> &[(EdgeId, Primitive)] {
        &self.primitives
    }

    /// Bounds assigned to an element, if it was placed
    pub fn placement(&self, id: ElementId) -> Option<Bounds> {
        self.visuals
            .iter()
            .find(|visual| visual.id == id)
            .and_then(|visual| visual.bounds)
    }

    /// Replaces the sink's contents with this scene.
    pub fn commit<S: RenderSink<P> + ?Sized>(&self, sink: &mut S) {
        info!(
            visuals_count = self.visuals.len(),
            primitives_count = self.primitives.len();
            "Committing scene"
        );
        sink.clear();
        sink.set_canvas_size(self.canvas_size);

        for visual in &self.visuals {
            sink.materialize(visual.id, visual.payload);
        }
        for visual in &self.visuals {
            if let Some(bounds) = visual.bounds {
                sink.place(visual.id, bounds);
            }
        }
        for (edge, primitive) in &self.primitives {
            sink.draw(*edge, primitive);
        }
    }
}

fn element_payload<'g, P>(element: &Element<'g, P>) -> &'g P {
    match element {
        Element::Node(node) => node.payload(),
        Element::Cluster(cluster) => cluster.payload(),
    }
}
