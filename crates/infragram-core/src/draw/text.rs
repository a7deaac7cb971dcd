//! Text style definitions and text extent estimation.
//!
//! # Overview
//!
//! - [`TextDefinition`] - Reusable text style (font, size, color, weight, slant)
//! - [`TextAnchor`] - Horizontal alignment of a text block around its position
//! - [`estimate_text_size`] - Approximate extent of a multi-line string
//!
//! Unset style fields are filled in by the renderer from the render
//! configuration, so a scene only needs to spell out what differs from the
//! defaults.
//!
//! ```
//! # use infragram_core::draw::TextDefinition;
//! # use infragram_core::color::Color;
//! let mut style = TextDefinition::new();
//! style.set_font_size(14.0);
//! style.set_bold(true);
//! style.set_color(Some(Color::new("navy").unwrap()));
//!
//! let defaults = TextDefinition::new().with_font_family("sans-serif").with_font_size(10.0);
//! let resolved = style.resolve(&defaults);
//! assert_eq!(resolved.font_family(), Some("sans-serif"));
//! assert_eq!(resolved.font_size(), Some(14.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::{color::Color, geometry::Size};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.25;

/// Average glyph advance as a multiple of the font size.
const AVERAGE_CHAR_WIDTH: f32 = 0.56;

/// Extra advance applied to bold glyphs.
const BOLD_WIDTH_FACTOR: f32 = 1.08;

/// Horizontal alignment of a text block relative to its anchor position.
///
/// Maps directly onto SVG `text-anchor` values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Text starts at the position
    Start,
    /// Text is centered on the position
    #[default]
    Middle,
    /// Text ends at the position
    End,
}

impl TextAnchor {
    /// Returns the SVG `text-anchor` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Defines the visual style for text elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDefinition {
    font_family: Option<String>,
    font_size: Option<f32>,
    color: Option<Color>,
    bold: bool,
    italic: bool,
}

impl TextDefinition {
    /// Creates a new text definition with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the font family, if set.
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    /// Returns the font size in canvas units, if set.
    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    /// Returns the text color, if set.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns true for bold text.
    pub fn bold(&self) -> bool {
        self.bold
    }

    /// Returns true for italic text.
    pub fn italic(&self) -> bool {
        self.italic
    }

    /// Sets the font family.
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = Some(family.to_string());
    }

    /// Sets the font size in canvas units.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = Some(size);
    }

    /// Sets the text color.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Sets bold weight.
    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    /// Sets italic slant.
    pub fn set_italic(&mut self, italic: bool) {
        self.italic = italic;
    }

    /// Returns the definition with the given font family.
    pub fn with_font_family(mut self, family: &str) -> Self {
        self.set_font_family(family);
        self
    }

    /// Returns the definition with the given font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.set_font_size(size);
        self
    }

    /// Returns the definition with the given color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns the definition with bold weight.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Returns the definition with italic slant.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Fills every unset field from `defaults`.
    ///
    /// Weight and slant are flags and always come from `self`.
    pub fn resolve(&self, defaults: &TextDefinition) -> TextDefinition {
        TextDefinition {
            font_family: self
                .font_family
                .clone()
                .or_else(|| defaults.font_family.clone()),
            font_size: self.font_size.or(defaults.font_size),
            color: self.color.or(defaults.color),
            bold: self.bold,
            italic: self.italic,
        }
    }
}

/// Estimates the extent of `content` rendered with `style`.
///
/// Lines are separated by `\n`. The estimate assumes an average glyph advance
/// and is used to size legend boxes; it never needs to match the exact
/// rasterized width.
///
/// # Examples
///
/// ```
/// # use infragram_core::draw::{estimate_text_size, TextDefinition, LINE_HEIGHT};
/// let style = TextDefinition::new().with_font_size(10.0);
/// let size = estimate_text_size("DNS\nResolver", &style);
/// assert!(size.width() > 0.0);
/// assert_eq!(size.height(), 2.0 * 10.0 * LINE_HEIGHT);
/// ```
pub fn estimate_text_size(content: &str, style: &TextDefinition) -> Size {
    let font_size = style.font_size().unwrap_or(12.0);
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return Size::default();
    }

    let mut char_width = font_size * AVERAGE_CHAR_WIDTH;
    if style.bold() {
        char_width *= BOLD_WIDTH_FACTOR;
    }

    let widest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    Size::new(
        widest as f32 * char_width,
        lines.len() as f32 * font_size * LINE_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_definition_defaults() {
        let style = TextDefinition::new();
        assert_eq!(style.font_family(), None);
        assert_eq!(style.font_size(), None);
        assert_eq!(style.color(), None);
        assert!(!style.bold());
        assert!(!style.italic());
    }

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let red = Color::new("red").unwrap();
        let style = TextDefinition::new()
            .with_font_size(9.0)
            .with_color(red)
            .with_italic(true);
        let defaults = TextDefinition::new()
            .with_font_family("serif")
            .with_font_size(12.0)
            .with_color(Color::default())
            .with_bold(true);

        let resolved = style.resolve(&defaults);
        assert_eq!(resolved.font_family(), Some("serif"));
        assert_eq!(resolved.font_size(), Some(9.0));
        assert_eq!(resolved.color(), Some(red));
        assert!(!resolved.bold());
        assert!(resolved.italic());
    }

    #[test]
    fn test_estimate_text_size_uses_widest_line() {
        let style = TextDefinition::new().with_font_size(10.0);
        let short = estimate_text_size("ab", &style);
        let mixed = estimate_text_size("ab\nabcd", &style);
        assert!(mixed.width() > short.width());
        assert!((mixed.width() - 4.0 * 10.0 * AVERAGE_CHAR_WIDTH).abs() < 0.001);
    }

    #[test]
    fn test_estimate_text_size_bold_is_wider() {
        let regular = TextDefinition::new().with_font_size(10.0);
        let bold = regular.clone().with_bold(true);
        assert!(
            estimate_text_size("Load Balancer", &bold).width()
                > estimate_text_size("Load Balancer", &regular).width()
        );
    }

    #[test]
    fn test_estimate_text_size_empty() {
        let style = TextDefinition::new();
        assert_eq!(estimate_text_size("", &style), Size::default());
    }

    #[test]
    fn test_text_anchor_svg_values() {
        assert_eq!(TextAnchor::Start.to_svg_value(), "start");
        assert_eq!(TextAnchor::Middle.to_svg_value(), "middle");
        assert_eq!(TextAnchor::End.to_svg_value(), "end");
    }
}
