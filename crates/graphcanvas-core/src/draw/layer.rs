//! Z-ordered grouping of SVG output.
//!
//! Sinks emit SVG nodes into a [`RenderLayer`] and [`LayeredOutput::render`]
//! wraps each non-empty layer in a `<g data-layer="...">` group, bottom first.

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Cluster visuals
    Background,
    /// Node visuals
    Content,
    /// Edge curves and arrowheads
    Arrow,
    /// Edge labels
    Text,
}

impl RenderLayer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Content => "content",
            Self::Arrow => "arrow",
            Self::Text => "text",
        }
    }
}

/// SVG nodes collected per layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to a layer; nodes keep their insertion order within a layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of nodes added to one layer
    pub fn count_in(&self, layer: RenderLayer) -> usize {
        self.items.iter().filter(|(l, _)| *l == layer).count()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes one `<g>` with a `data-layer` attribute;
    /// empty layers are skipped.
    pub fn render(mut self) -> Vec<SvgNode> {
        // Stable, so insertion order survives within a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result: Vec<SvgNode> = Vec::new();
        let mut current: Option<(RenderLayer, svg_element::Group)> = None;

        for (layer, node) in self.items {
            current = match current {
                Some((current_layer, group)) if current_layer == layer => {
                    Some((current_layer, group.add(node)))
                }
                previous => {
                    if let Some((_, group)) = previous {
                        result.push(Box::new(group));
                    }
                    let group = svg_element::Group::new().set("data-layer", layer.name());
                    Some((layer, group.add(node)))
                }
            };
        }

        if let Some((_, group)) = current {
            result.push(Box::new(group));
        }

        result
    }
}
