//! Text styling and measurement.
//!
//! [`TextDefinition`] carries the font family, size and color of a piece of
//! text. [`TextDefinition::measure`] returns the natural size of a string in
//! that style using real font metrics from `cosmic-text`; the rendering
//! sinks use it to size node and cluster visuals before layout.
//!
//! # Examples
//!
//! ```
//! # use graphcanvas_core::{draw::TextDefinition, units::Pixels};
//! let mut style = TextDefinition::new();
//! style.set_font_family("Consolas");
//! style.set_font_size(Pixels::new(14.0));
//!
//! let size = style.measure("Start");
//! assert!(size.width().value() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::{color::Color, geometry::Size, units::Pixels};

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Average glyph advance as a multiple of the font size, used when shaping
/// produces no layout runs (no usable font installed).
const FALLBACK_ADVANCE_FACTOR: f32 = 0.55;

/// Font family, size and color of a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: Pixels,
    color: Color,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(family: impl Into<String>, size: Pixels) -> Self {
        Self {
            font_family: family.into(),
            font_size: size,
            ..Self::default()
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> Pixels {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    pub fn set_font_size(&mut self, size: Pixels) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Natural size of `text` rendered in this style, without padding.
    ///
    /// Empty text measures as zero.
    pub fn measure(&self, text: &str) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(text, self)
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: String::from("sans-serif"),
            font_size: Pixels::new(12.0),
            color: Color::default(),
        }
    }
}

/// Owns the process-wide `FontSystem`, which is expensive to build.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let font_size = text_def.font_size().value();
        let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_FACTOR);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        let mut runs = 0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
            runs += 1;
        }

        if runs == 0 {
            let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            max_width = longest as f32 * font_size * FALLBACK_ADVANCE_FACTOR;
            total_height = text.lines().count().max(1) as f32 * metrics.line_height;
        }

        Size::from_px(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
