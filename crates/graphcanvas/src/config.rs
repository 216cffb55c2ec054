//! Configuration types for GraphCanvas rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Which [`LayoutEngine`] arranges the graph.
//! - [`GraphvizConfig`] - Where to find the Graphviz executable.
//! - [`StyleConfig`] - Background color and caption styling of SVG output.
//!
//! # Example
//!
//! ```
//! # use graphcanvas::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use graphcanvas_core::{color::Color, geometry::Insets, units::Pixels};

use crate::engine::{GraphvizEngine, LayoutEngine};

const DEFAULT_FONT_FAMILY: &str = "sans-serif";
const DEFAULT_FONT_SIZE: f32 = 14.0;
const DEFAULT_PADDING: f32 = 8.0;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    graphviz: GraphvizConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, graphviz: GraphvizConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            graphviz,
            style,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn graphviz(&self) -> &GraphvizConfig {
        &self.graphviz
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Layout algorithm selection.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Default [`LayoutEngine`], used unless a graph asks for another.
    #[serde(default)]
    engine: LayoutEngine,
}

impl LayoutConfig {
    pub fn new(engine: LayoutEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }
}

/// Location of the Graphviz executable.
///
/// Without a `binary_dir`, the program is resolved through `PATH`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct GraphvizConfig {
    #[serde(default)]
    program: Option<String>,

    #[serde(default)]
    binary_dir: Option<PathBuf>,
}

impl GraphvizConfig {
    pub fn new(program: Option<String>, binary_dir: Option<PathBuf>) -> Self {
        Self {
            program,
            binary_dir,
        }
    }

    /// Builds the process engine described by this section.
    pub fn engine(&self) -> GraphvizEngine {
        let mut engine = GraphvizEngine::new();
        if let Some(program) = &self.program {
            engine = engine.with_program(program);
        }
        if let Some(dir) = &self.binary_dir {
            engine = engine.with_binary_dir(dir);
        }
        engine
    }
}

/// Visual styling of SVG output. Unset fields fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] of the canvas, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Font family of node and cluster captions.
    #[serde(default)]
    font_family: Option<String>,

    /// Font size of node and cluster captions, in pixels.
    #[serde(default)]
    font_size: Option<f32>,

    /// Space around a node's caption, in pixels.
    #[serde(default)]
    padding: Option<f32>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    /// Returns the caption font size.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured size is not a positive number.
    pub fn font_size(&self) -> Result<Pixels, String> {
        match self.font_size {
            None => Ok(Pixels::new(DEFAULT_FONT_SIZE)),
            Some(size) if size > 0.0 && size.is_finite() => Ok(Pixels::new(size)),
            Some(size) => Err(format!("Invalid font size in config: {size}")),
        }
    }

    /// Returns the caption padding.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured padding is negative.
    pub fn padding(&self) -> Result<Insets, String> {
        match self.padding {
            None => Ok(Insets::uniform(DEFAULT_PADDING)),
            Some(padding) if padding >= 0.0 && padding.is_finite() => Ok(Insets::uniform(padding)),
            Some(padding) => Err(format!("Invalid padding in config: {padding}")),
        }
    }
}
