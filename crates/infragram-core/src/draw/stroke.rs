//! Stroke and line-style definitions.
//!
//! This module provides the stroke definition shared by node borders, zone
//! borders, legend frames and connectors.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width and dash style of a line
//! - [`StrokeStyle`]: line patterns (solid, dashed, dotted, ...)
//! - [`apply_stroke!`](crate::apply_stroke!): macro applying stroke attributes to SVG elements
//!
//! # Dash patterns
//!
//! Dash lengths scale with the stroke width, so a dashed border keeps its
//! look whether it is drawn half a unit or four units wide:
//!
//! | Style | Pattern (multiples of width) |
//! |-------|------------------------------|
//! | `Solid` | none |
//! | `Dashed` | `4, 2` |
//! | `Dotted` | `1, 1.5` |
//! | `DashDot` | `6, 2, 1, 2` |
//! | `Custom(pattern)` | the pattern itself, in canvas units |
//!
//! ```
//! use infragram_core::color::Color;
//! use infragram_core::draw::{StrokeDefinition, StrokeStyle};
//!
//! let stroke = StrokeDefinition::dashed(Color::new("orange").unwrap(), 2.0);
//! assert_eq!(stroke.dash_pattern(), Some(vec![8.0, 4.0]));
//!
//! let solid = StrokeDefinition::solid(Color::default(), 1.0);
//! assert_eq!(solid.dash_pattern(), None);
//! ```

use std::{fmt, str::FromStr};

use crate::color::Color;

/// Defines the visual style of a stroke, including dash patterns.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Alternating dash and dot
    DashDot,
    /// Explicit dash/gap lengths in canvas units, repeating
    Custom(Vec<f32>),
}

impl StrokeStyle {
    /// Returns the dash/gap lengths for a stroke of the given width, or `None`
    /// for solid lines.
    pub fn dash_pattern(&self, width: f32) -> Option<Vec<f32>> {
        let unit = width.max(0.5);
        match self {
            Self::Solid => None,
            Self::Dashed => Some(vec![4.0 * unit, 2.0 * unit]),
            Self::Dotted => Some(vec![unit, 1.5 * unit]),
            Self::DashDot => Some(vec![6.0 * unit, 2.0 * unit, unit, 2.0 * unit]),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "dash-dot" | "dashdot" => Ok(Self::DashDot),
            _ => {
                // Any other value must be a dash pattern such as "6,2,1,2"
                let pattern = s
                    .split([',', ' '])
                    .filter(|part| !part.is_empty())
                    .map(|part| part.parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| {
                        format!(
                            "invalid stroke style `{s}`, valid values: solid, dashed, dotted, dash-dot, or a dash pattern"
                        )
                    })?;
                if pattern.is_empty() || pattern.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(format!("invalid dash pattern `{s}`"));
                }
                Ok(Self::Custom(pattern))
            }
        }
    }
}

impl fmt::Display for StrokeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid => f.write_str("solid"),
            Self::Dashed => f.write_str("dashed"),
            Self::Dotted => f.write_str("dotted"),
            Self::DashDot => f.write_str("dash-dot"),
            Self::Custom(pattern) => {
                let parts: Vec<String> = pattern.iter().map(f32::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

/// A stroke definition for rendering lines and borders.
///
/// # Examples
///
/// ```
/// use infragram_core::draw::{StrokeDefinition, StrokeStyle};
/// use infragram_core::color::Color;
///
/// // Default stroke (black, 1 unit, solid)
/// let stroke = StrokeDefinition::default();
/// assert_eq!(stroke.width(), 1.0);
///
/// let mut stroke = StrokeDefinition::new(Color::new("green").unwrap(), 3.0);
/// stroke.set_style(StrokeStyle::DashDot);
/// assert_eq!(*stroke.style(), StrokeStyle::DashDot);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Creates a solid stroke (convenience constructor).
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke (convenience constructor).
    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Returns the dash pattern scaled to this stroke's width.
    pub fn dash_pattern(&self) -> Option<Vec<f32>> {
        self.style.dash_pattern(self.width)
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Sets the stroke style.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Returns the stroke with a different style.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity, width and, for patterned strokes, the dash array.
///
/// # Examples
///
/// ```
/// use infragram_core::draw::StrokeDefinition;
/// use infragram_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::dashed(Color::new("gray").unwrap(), 2.0);
/// let rect = svg_element::Rectangle::new()
///     .set("x", 0)
///     .set("y", 0)
///     .set("width", 100)
///     .set("height", 50);
///
/// let rect = infragram_core::apply_stroke!(rect, &stroke);
/// assert!(rect.to_string().contains("stroke-dasharray"));
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_opaque_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(pattern) = $stroke.dash_pattern() {
            let dasharray: Vec<String> = pattern.iter().map(|v| v.to_string()).collect();
            elem = elem.set("stroke-dasharray", dasharray.join(","));
        }

        elem
    }};
}
