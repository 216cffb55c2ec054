//! Color handling for GraphCanvas
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, providing convenience methods for working with colors
//! in graph styling and fill-state tracking.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphcanvas_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Fully transparent color, the initial fill of every draw-command list.
    pub fn transparent() -> Self {
        Self::new("black")
            .map(|c| c.with_alpha(0.0))
            .unwrap_or_default()
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphcanvas_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color, between
    /// 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns true if the color paints nothing
    pub fn is_transparent(&self) -> bool {
        self.alpha() == 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
