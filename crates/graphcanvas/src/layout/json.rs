//! Raw shape of Graphviz's `-Tjson` output.
//!
//! Only the fields the pipeline reads are declared; serde skips the rest.
//! Graphviz writes most attributes as strings, even numeric ones, but some
//! builds emit plain numbers, so numeric attributes accept both.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct RawOutput {
    pub bb: Option<String>,
    #[serde(default)]
    pub objects: Vec<RawObject>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

/// A node or a subgraph.
#[derive(Debug, Deserialize)]
pub(super) struct RawObject {
    pub name: Option<String>,
    pub pos: Option<String>,
    pub width: Option<NumberOrString>,
    pub height: Option<NumberOrString>,
    pub bb: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawEdge {
    pub id: Option<String>,
    #[serde(rename = "_draw_")]
    pub draw: Option<Vec<RawDrawCommand>>,
    #[serde(rename = "_ldraw_")]
    pub label_draw: Option<Vec<RawDrawCommand>>,
    #[serde(rename = "_hdraw_")]
    pub head_draw: Option<Vec<RawDrawCommand>>,
    #[serde(rename = "_hldraw_")]
    pub head_label_draw: Option<Vec<RawDrawCommand>>,
    #[serde(rename = "_tdraw_")]
    pub tail_draw: Option<Vec<RawDrawCommand>>,
    #[serde(rename = "_tldraw_")]
    pub tail_label_draw: Option<Vec<RawDrawCommand>>,
}

/// One xdot operation as serialized by Graphviz.
#[derive(Debug, Deserialize)]
pub(super) struct RawDrawCommand {
    pub op: String,
    pub color: Option<String>,
    pub points: Option<Vec<[f32; 2]>>,
    pub rect: Option<[f32; 4]>,
    pub pt: Option<[f32; 2]>,
    pub width: Option<f32>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum NumberOrString {
    Number(f32),
    Text(String),
}

impl NumberOrString {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn raw(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}
