//! Serialization of a [`Graph`] into the DOT language.
//!
//! Nodes are fixed-size rectangles with empty labels: their visuals are
//! drawn by the rendering sink, so Graphviz only needs their measured size.
//! Edges carry their labels, arrow shapes and font so that Graphviz reserves
//! space for them and emits draw commands for every part.
//!
//! Declaration order is top-level nodes, then top-level clusters (each
//! cluster's own nodes before its child clusters), then edges.

use log::trace;

use graphcanvas_core::{
    geometry::Size,
    graph::{Cluster, Edge, Graph, Node},
    units::{Inches, Points},
};

const HEADER: &str = "digraph G { compound=true; node [shape=rect, fixedsize=true];";
const INDENT: &str = "  ";

/// Escapes text for use inside a double-quoted DOT string.
///
/// Backslashes and quotes are backslash-escaped, so user text can neither
/// close the string nor form Graphviz escapes such as `\N`. Both CRLF and LF
/// line breaks become the DOT `\n` escape.
///
/// # Examples
///
/// ```
/// # use graphcanvas::dot::escape;
/// assert_eq!(escape("say \"hi\"\r\nbye"), r#"say \"hi\"\nbye"#);
/// ```
pub fn escape(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

/// Serializes `graph` into DOT, sizing every node with `measure`.
///
/// `measure` returns a payload's natural size in pixels; it is converted to
/// inches for the `width` and `height` attributes.
pub fn to_dot<P>(graph: &Graph<P>, measure: impl Fn(&P) -> Size) -> String {
    let mut writer = DotWriter {
        out: String::new(),
        measure,
    };

    writer.line(0, HEADER);
    for node in graph.nodes() {
        writer.node(1, node);
    }
    for cluster in graph.clusters() {
        writer.cluster(1, cluster);
    }
    for edge in graph.edges() {
        writer.edge(edge);
    }
    writer.line(0, "}");

    trace!(dot:% = writer.out; "Serialized graph");
    writer.out
}

struct DotWriter<M> {
    out: String,
    measure: M,
}

impl<M> DotWriter<M> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn node<P>(&mut self, depth: usize, node: &Node<P>)
    where
        M: Fn(&P) -> Size,
    {
        let size = (self.measure)(node.payload());
        let width = Inches::from(size.width()).value();
        let height = Inches::from(size.height()).value();
        let text = format!(
            "{} [label=\"\", width={width}, height={height}];",
            node.id()
        );
        self.line(depth, &text);
    }

    fn cluster<P>(&mut self, depth: usize, cluster: &Cluster<P>)
    where
        M: Fn(&P) -> Size,
    {
        self.line(depth, &format!("subgraph {} {{", cluster.id()));
        for node in cluster.nodes() {
            self.node(depth + 1, node);
        }
        for child in cluster.clusters() {
            self.cluster(depth + 1, child);
        }
        self.line(depth, "}");
    }

    fn edge(&mut self, edge: &Edge) {
        self.line(1, &format!("{} -> {} [", edge.from(), edge.to()));
        let attributes = [
            format!("id={}", edge.id()),
            format!("label=\"{}\"", escape(edge.label())),
            format!("headlabel=\"{}\"", escape(edge.head_label())),
            format!("taillabel=\"{}\"", escape(edge.tail_label())),
            format!("arrowhead=\"{}\"", edge.arrow_head()),
            format!("arrowtail=\"{}\"", edge.arrow_tail()),
            format!("fontsize={}", Points::from(edge.font_size()).value()),
            format!("fontname=\"{}\"", escape(edge.font_name())),
            String::from("dir=both"),
        ];
        for attribute in &attributes {
            self.line(2, attribute);
        }
        self.line(1, "];");
    }
}
