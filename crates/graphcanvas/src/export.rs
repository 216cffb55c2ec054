//! Rendering sinks that turn a committed scene into an output format.
//!
//! # Pipeline Position
//!
//! ```text
//! Graph Model
//!     ↓ serialize + engine
//! LayoutResult
//!     ↓ interpret
//! Scene
//!     ↓ commit (this module)
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgSink`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`GraphCanvasError::Export`] at the crate
//! boundary.
//!
//! [`GraphCanvasError::Export`]: crate::GraphCanvasError::Export

/// SVG export backend.
pub mod svg;

/// Errors that can occur while exporting a committed scene.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
