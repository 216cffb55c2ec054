//! Normalized layout of one render pass.

use indexmap::IndexMap;
use log::{debug, trace};

use graphcanvas_core::{
    geometry::{Bounds, PageFlip, Point, Size},
    graph::CLUSTER_PREFIX,
    units::{Inches, Pixels, Points},
};

use super::{
    ContractError,
    json::{NumberOrString, RawEdge, RawObject, RawOutput},
    xdot::{self, DrawCommand},
};

/// The six independently drawn parts of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgePart {
    Curve,
    CurveLabel,
    HeadArrow,
    HeadArrowLabel,
    TailArrow,
    TailArrowLabel,
}

impl EdgePart {
    /// Order in which an edge's parts are painted.
    pub const REPLAY_ORDER: [EdgePart; 6] = [
        Self::Curve,
        Self::CurveLabel,
        Self::TailArrow,
        Self::TailArrowLabel,
        Self::HeadArrow,
        Self::HeadArrowLabel,
    ];

    /// Only the curve follows the edge's line style; arrowheads and labels
    /// are always solid.
    pub fn uses_line_style(self) -> bool {
        self == Self::Curve
    }
}

/// Decoded draw commands of one edge, per part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeLayout {
    curve: Vec<DrawCommand>,
    curve_label: Vec<DrawCommand>,
    head_arrow: Vec<DrawCommand>,
    head_arrow_label: Vec<DrawCommand>,
    tail_arrow: Vec<DrawCommand>,
    tail_arrow_label: Vec<DrawCommand>,
}

impl EdgeLayout {
    pub fn part(&self, part: EdgePart) -> &[DrawCommand] {
        match part {
            EdgePart::Curve => &self.curve,
            EdgePart::CurveLabel => &self.curve_label,
            EdgePart::HeadArrow => &self.head_arrow,
            EdgePart::HeadArrowLabel => &self.head_arrow_label,
            EdgePart::TailArrow => &self.tail_arrow,
            EdgePart::TailArrowLabel => &self.tail_arrow_label,
        }
    }

    fn from_raw(raw: &RawEdge, id: &str, flip: PageFlip) -> Result<Self, ContractError> {
        let decode = |list: &Option<Vec<_>>| xdot::decode_list(list.as_deref(), flip, id);
        Ok(Self {
            curve: decode(&raw.draw)?,
            curve_label: decode(&raw.label_draw)?,
            head_arrow: decode(&raw.head_draw)?,
            head_arrow_label: decode(&raw.head_label_draw)?,
            tail_arrow: decode(&raw.tail_draw)?,
            tail_arrow_label: decode(&raw.tail_label_draw)?,
        })
    }
}

/// Placement of every node, cluster and edge, in canvas space.
///
/// Built from the engine's JSON once per render pass. Node and cluster
/// bounds are top-left anchored and sized in pixels.
///
/// # Examples
///
/// ```
/// # use graphcanvas::layout::LayoutResult;
/// let json = r#"{
///     "bb": "0,0,144,72",
///     "objects": [{"name": "node_0", "pos": "72,36", "width": "1", "height": "0.5"}]
/// }"#;
/// let layout = LayoutResult::from_json(json).unwrap();
///
/// let node = layout.node("node_0").unwrap();
/// assert_eq!(node.top_left().x().value(), 48.0);
/// assert_eq!(node.top_left().y().value(), 24.0);
/// assert_eq!(layout.canvas_size().width().value(), 192.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    bounds: Bounds,
    nodes: IndexMap<String, Bounds>,
    clusters: IndexMap<String, Bounds>,
    edges: IndexMap<String, EdgeLayout>,
}

impl LayoutResult {
    /// Parses and normalizes the engine's JSON output.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractError`] for malformed JSON, missing or unparsable
    /// required fields, duplicate names or ids, and malformed draw commands.
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        let raw: RawOutput = serde_json::from_str(json)?;

        // Every other coordinate depends on the page height.
        let bb = raw.bb.as_deref().ok_or(ContractError::MissingField {
            object: String::from("graph"),
            field: "bb",
        })?;
        let [_, _, _, page_height] = parse_numbers::<4>(bb, "graph", "bb")?;
        let flip = PageFlip::new(page_height);
        trace!(page_height:% = page_height; "Extracted page height");
        let bounds = parse_bounds(bb, "graph", flip)?;

        let mut nodes = IndexMap::new();
        let mut clusters = IndexMap::new();
        for object in &raw.objects {
            let name = object.name.as_deref().ok_or(ContractError::MissingField {
                object: String::from("object"),
                field: "name",
            })?;

            if name.starts_with(CLUSTER_PREFIX) {
                // A cluster without `bb` comes from an engine without cluster support.
                let Some(bb) = object.bb.as_deref() else {
                    debug!(cluster = name; "Skipping cluster without bounding box");
                    continue;
                };
                insert_unique(&mut clusters, "cluster", name, parse_bounds(bb, name, flip)?)?;
            } else {
                insert_unique(&mut nodes, "node", name, node_bounds(object, name, flip)?)?;
            }
        }

        let mut edges = IndexMap::new();
        for raw_edge in &raw.edges {
            let id = raw_edge.id.as_deref().ok_or(ContractError::MissingField {
                object: String::from("edge"),
                field: "id",
            })?;
            insert_unique(&mut edges, "edge", id, EdgeLayout::from_raw(raw_edge, id, flip)?)?;
        }

        debug!(
            nodes_count = nodes.len(),
            clusters_count = clusters.len(),
            edges_count = edges.len();
            "Layout result normalized"
        );

        Ok(Self {
            bounds,
            nodes,
            clusters,
            edges,
        })
    }

    /// Overall bounding box of the layout
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn canvas_size(&self) -> Size {
        self.bounds.size()
    }

    pub fn node(&self, name: &str) -> Option<Bounds> {
        self.nodes.get(name).copied()
    }

    pub fn cluster(&self, name: &str) -> Option<Bounds> {
        self.clusters.get(name).copied()
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeLayout> {
        self.edges.get(id)
    }

    /// Node bounds in engine output order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, Bounds)> {
        self.nodes.iter().map(|(name, bounds)| (name.as_str(), *bounds))
    }

    pub fn clusters(&self) -> impl Iterator<Item = (&str, Bounds)> {
        self.clusters
            .iter()
            .map(|(name, bounds)| (name.as_str(), *bounds))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &EdgeLayout)> {
        self.edges.iter().map(|(id, edge)| (id.as_str(), edge))
    }
}

fn insert_unique<V>(
    map: &mut IndexMap<String, V>,
    kind: &'static str,
    key: &str,
    value: V,
) -> Result<(), ContractError> {
    if map.contains_key(key) {
        return Err(ContractError::DuplicateKey {
            kind,
            key: key.to_string(),
        });
    }
    map.insert(key.to_string(), value);
    Ok(())
}

/// Parses `N` comma-separated point values.
fn parse_numbers<const N: usize>(
    value: &str,
    object: &str,
    field: &'static str,
) -> Result<[Points; N], ContractError> {
    let invalid = || ContractError::InvalidValue {
        object: object.to_string(),
        field,
        value: value.to_string(),
    };
    let numbers = value
        .split(',')
        .map(|part| part.parse::<Points>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    numbers.try_into().map_err(|_| invalid())
}

/// Converts an `"x0,y0,x1,y1"` box into top-left anchored canvas bounds.
fn parse_bounds(bb: &str, object: &str, flip: PageFlip) -> Result<Bounds, ContractError> {
    let [x0, y0, x1, y1] = parse_numbers::<4>(bb, object, "bb")?;
    let top_left = flip.point(x0, y1);
    let size = Size::new(Pixels::from(x1 - x0), Pixels::from(y1 - y0));
    Ok(Bounds::new(top_left, size))
}

fn node_bounds(object: &RawObject, name: &str, flip: PageFlip) -> Result<Bounds, ContractError> {
    let missing = |field| ContractError::MissingField {
        object: name.to_string(),
        field,
    };

    let pos = object.pos.as_deref().ok_or_else(|| missing("pos"))?;
    let [x, y] = parse_numbers::<2>(pos, name, "pos")?;
    let center: Point = flip.point(x, y);

    let width = inches(object.width.as_ref().ok_or_else(|| missing("width"))?, name, "width")?;
    let height = inches(object.height.as_ref().ok_or_else(|| missing("height"))?, name, "height")?;
    let size = Size::new(Pixels::from(width), Pixels::from(height));

    Ok(Bounds::new_from_center(center, size))
}

fn inches(value: &NumberOrString, object: &str, field: &'static str) -> Result<Inches, ContractError> {
    value
        .as_f32()
        .map(Inches::new)
        .ok_or_else(|| ContractError::InvalidValue {
            object: object.to_string(),
            field,
            value: value.raw(),
        })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_graph_bounds_top_left_is_origin() {
        let layout = LayoutResult::from_json(r#"{"bb": "0,0,100,50"}"#).unwrap();
        let bounds = layout.bounds();
        assert_approx_eq!(f32, bounds.top_left().x().value(), 0.0);
        assert_approx_eq!(f32, bounds.top_left().y().value(), 0.0);
        assert_approx_eq!(f32, Points::from(bounds.width()).value(), 100.0, epsilon = 1e-4);
        assert_approx_eq!(f32, Points::from(bounds.height()).value(), 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_node_top_left_from_center() {
        let json = r#"{
            "bb": "0,0,216,144",
            "objects": [{"name": "node_0", "pos": "108,72", "width": "1.5", "height": 0.5}]
        }"#;
        let node = LayoutResult::from_json(json).unwrap().node("node_0").unwrap();
        // center (144, 96) px, size (144, 48) px
        assert_approx_eq!(f32, node.top_left().x().value(), 72.0, epsilon = 1e-4);
        assert_approx_eq!(f32, node.top_left().y().value(), 72.0, epsilon = 1e-4);
        assert_approx_eq!(f32, node.width().value(), 144.0);
        assert_approx_eq!(f32, node.height().value(), 48.0);
    }

    #[test]
    fn test_cluster_bounds_flip() {
        let json = r#"{
            "bb": "0,0,200,100",
            "objects": [{"name": "cluster_0", "bb": "10,20,110,80"}]
        }"#;
        let cluster = LayoutResult::from_json(json).unwrap().cluster("cluster_0").unwrap();
        // top-left = (10, 100 - 80) pt
        assert_approx_eq!(f32, Points::from(cluster.top_left().x()).value(), 10.0, epsilon = 1e-4);
        assert_approx_eq!(f32, Points::from(cluster.top_left().y()).value(), 20.0, epsilon = 1e-4);
        assert_approx_eq!(f32, Points::from(cluster.width()).value(), 100.0, epsilon = 1e-4);
        assert_approx_eq!(f32, Points::from(cluster.height()).value(), 60.0, epsilon = 1e-4);
    }

    #[test]
    fn test_cluster_without_bb_is_skipped() {
        let json = r#"{
            "bb": "0,0,100,100",
            "objects": [
                {"name": "cluster_0"},
                {"name": "node_0", "pos": "50,50", "width": "0.5", "height": "0.5"}
            ]
        }"#;
        let layout = LayoutResult::from_json(json).unwrap();
        assert!(layout.cluster("cluster_0").is_none());
        assert!(layout.node("node_0").is_some());
        assert!(layout.node("cluster_0").is_none());
    }

    #[test]
    fn test_duplicate_node_is_fatal() {
        let json = r#"{
            "bb": "0,0,100,100",
            "objects": [
                {"name": "node_0", "pos": "50,50", "width": "0.5", "height": "0.5"},
                {"name": "node_0", "pos": "10,10", "width": "0.5", "height": "0.5"}
            ]
        }"#;
        let err = LayoutResult::from_json(json).unwrap_err();
        assert!(matches!(err, ContractError::DuplicateKey { kind: "node", .. }));
    }

    #[test]
    fn test_duplicate_edge_is_fatal() {
        let json = r#"{"bb": "0,0,1,1", "edges": [{"id": "edge_0"}, {"id": "edge_0"}]}"#;
        let err = LayoutResult::from_json(json).unwrap_err();
        assert_eq!(err.to_string(), "layout output contains edge `edge_0` more than once");
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let err = LayoutResult::from_json(r#"{"objects": []}"#).unwrap_err();
        assert!(matches!(err, ContractError::MissingField { field: "bb", .. }));

        let json = r#"{"bb": "0,0,1,1", "objects": [{"name": "node_0", "pos": "0,0"}]}"#;
        let err = LayoutResult::from_json(json).unwrap_err();
        assert_eq!(err.to_string(), "`node_0` is missing required field `width`");
    }

    #[test]
    fn test_invalid_numbers_are_reported() {
        let err = LayoutResult::from_json(r#"{"bb": "0,0,abc,1"}"#).unwrap_err();
        assert!(matches!(err, ContractError::InvalidValue { field: "bb", .. }));

        let err = LayoutResult::from_json(r#"{"bb": "0,0,1"}"#).unwrap_err();
        assert!(matches!(err, ContractError::InvalidValue { field: "bb", .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = LayoutResult::from_json("{not json").unwrap_err();
        assert!(matches!(err, ContractError::MalformedJson(_)));
    }

    #[test]
    fn test_edge_parts_decode_independently() {
        let json = r#"{
            "bb": "0,0,100,100",
            "edges": [{
                "id": "edge_0",
                "_draw_": [{"op": "b", "points": [[0,0],[1,1],[2,2],[3,3]]}],
                "_hdraw_": [{"op": "C", "color": "black"}, {"op": "P", "points": [[0,0],[1,0],[0,1]]}]
            }]
        }"#;
        let layout = LayoutResult::from_json(json).unwrap();
        let edge = layout.edge("edge_0").unwrap();
        assert_eq!(edge.part(EdgePart::Curve).len(), 1);
        assert_eq!(edge.part(EdgePart::HeadArrow).len(), 2);
        assert!(edge.part(EdgePart::CurveLabel).is_empty());
        assert!(edge.part(EdgePart::TailArrowLabel).is_empty());
    }

    #[test]
    fn test_replay_order() {
        assert_eq!(
            EdgePart::REPLAY_ORDER,
            [
                EdgePart::Curve,
                EdgePart::CurveLabel,
                EdgePart::TailArrow,
                EdgePart::TailArrowLabel,
                EdgePart::HeadArrow,
                EdgePart::HeadArrowLabel,
            ]
        );
        assert!(EdgePart::Curve.uses_line_style());
        assert!(!EdgePart::HeadArrow.uses_line_style());
    }
}
