//! Error types for GraphCanvas operations.
//!
//! [`GraphCanvasError`] wraps every failure a render pass can end with.

use std::io;

use thiserror::Error;

use graphcanvas_core::graph::GraphError;

use crate::{engine::EngineError, layout::ContractError};

/// The main error type for GraphCanvas operations.
///
/// # Diagnostic Variants
///
/// The `Engine` variant keeps the DOT description that was submitted, which
/// callers can show as the source of a failed layout.
#[derive(Debug, Error)]
pub enum GraphCanvasError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Layout contract violation: {0}")]
    Contract(#[from] ContractError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for GraphCanvasError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
