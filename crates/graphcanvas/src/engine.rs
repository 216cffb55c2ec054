//! The boundary to the external layout engine.
//!
//! Layout is delegated to an [`Engine`]: an opaque function from a DOT
//! description and a [`LayoutEngine`] selector to the engine's JSON output.
//! [`GraphvizEngine`] is the production implementation; tests substitute a
//! stub returning a fixed document.
//!
//! Every [`EngineError`] carries the full description that was submitted,
//! so a failed layout can be reproduced outside the pipeline.

mod graphviz;

pub use graphviz::GraphvizEngine;

use std::{fmt, io, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Layout algorithms offered by Graphviz.
///
/// The names match the `-K` flag values and the configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Hierarchical layout (default)
    #[default]
    Dot,
    /// Spring model
    Neato,
    /// Force-directed placement
    Fdp,
    /// Scalable force-directed placement
    Sfdp,
    /// Circular layout
    Circo,
    /// Radial layout
    Twopi,
    /// Array-based cluster packing
    Osage,
    /// Squarified treemap
    Patchwork,
}

impl LayoutEngine {
    pub const ALL: [LayoutEngine; 8] = [
        Self::Dot,
        Self::Neato,
        Self::Fdp,
        Self::Sfdp,
        Self::Circo,
        Self::Twopi,
        Self::Osage,
        Self::Patchwork,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Neato => "neato",
            Self::Fdp => "fdp",
            Self::Sfdp => "sfdp",
            Self::Circo => "circo",
            Self::Twopi => "twopi",
            Self::Osage => "osage",
            Self::Patchwork => "patchwork",
        }
    }
}

impl FromStr for LayoutEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|engine| engine.name() == s)
            .ok_or_else(|| format!("unsupported layout engine `{s}`"))
    }
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failures of a single engine invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("layout engine could not read the graph description: {message}")]
    Unreadable { message: String, description: String },

    #[error("layout engine `{engine}` failed to lay out the graph: {message}")]
    LayoutFailed {
        engine: LayoutEngine,
        message: String,
        description: String,
    },

    #[error("layout engine could not produce JSON output: {message}")]
    RenderFailed { message: String, description: String },

    #[error("failed to start layout program `{program}`: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: io::Error,
        description: String,
    },
}

impl EngineError {
    /// The DOT description that was submitted to the engine
    pub fn description(&self) -> &str {
        match self {
            Self::Unreadable { description, .. }
            | Self::LayoutFailed { description, .. }
            | Self::RenderFailed { description, .. }
            | Self::Unavailable { description, .. } => description,
        }
    }

    /// Engine diagnostics, if the engine produced any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Unreadable { message, .. }
            | Self::LayoutFailed { message, .. }
            | Self::RenderFailed { message, .. } => Some(message),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Computes a layout for a DOT description.
pub trait Engine {
    /// Lays out `description` with `engine` and returns the engine's JSON output.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] carrying `description` if the engine cannot
    /// read the input, cannot lay it out, or cannot render JSON.
    fn layout(&self, description: &str, engine: LayoutEngine) -> Result<String, EngineError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn layout(&self, description: &str, engine: LayoutEngine) -> Result<String, EngineError> {
        (**self).layout(description, engine)
    }
}
