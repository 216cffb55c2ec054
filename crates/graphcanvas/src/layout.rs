//! Interpretation of the layout engine's JSON output.
//!
//! The pipeline runs in three steps:
//!
//! 1. `json` deserializes the raw document with `serde_json`, keeping every
//!    engine value as loosely typed as the engine emits it.
//! 2. `result` extracts the page height from the top-level bounding box and
//!    normalizes every node, cluster and edge into canvas space.
//! 3. `xdot` decodes each edge's draw-command arrays into [`DrawCommand`]s.
//!
//! Anything the engine emits that this pipeline cannot make sense of is a
//! [`ContractError`]: the engine broke its side of the contract, and the
//! render pass is abandoned.

mod json;
mod result;
mod xdot;

pub use result::{EdgeLayout, EdgePart, LayoutResult};
pub use xdot::DrawCommand;

use thiserror::Error;

/// Violations of the layout engine's output contract.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("layout output is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("`{object}` is missing required field `{field}`")]
    MissingField { object: String, field: &'static str },

    #[error("`{object}` has an invalid `{field}` value `{value}`")]
    InvalidValue {
        object: String,
        field: &'static str,
        value: String,
    },

    #[error("layout output contains {kind} `{key}` more than once")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("spline in `{object}` has {points} points, expected 3n+1")]
    MalformedSpline { object: String, points: usize },

    #[error("node `{0}` is missing from the layout output")]
    MissingNode(String),

    #[error("edge `{0}` is missing from the layout output")]
    MissingEdge(String),
}
