//! Color handling for Infragram scenes.
//!
//! This module provides the [`Color`] type which wraps `DynamicColor` from the
//! color crate. Scene documents carry colors as CSS strings (`"lightblue"`,
//! `"#ff8000"`, `"rgb(10, 20, 30)"`); they are parsed once at construction time
//! and written back in their CSS form by the export backend.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Rgba8, Srgb};

/// A CSS color with an alpha channel.
///
/// Two colors are equal when they resolve to the same 8-bit sRGBA value,
/// whatever CSS spelling they were parsed from.
#[derive(Clone, Copy, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.rgba8() == other.rgba8()
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rgba8().to_u8_array().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when `color_str` is not a valid
    /// CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use infragram_core::color::Color;
    ///
    /// let steel = Color::new("steelblue").unwrap();
    /// let orange = Color::new("#ff8000").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Opaque white, the default canvas background.
    pub fn white() -> Self {
        Self::new("white").expect("'white' is a valid CSS color")
    }

    /// Creates a new color with the specified alpha value.
    ///
    /// Scene documents express partial transparency as an `opacity`, which
    /// ends up here.
    ///
    /// # Examples
    ///
    /// ```
    /// use infragram_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let faded = red.with_alpha(0.5);
    /// assert_eq!(faded.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha.clamp(0.0, 1.0)),
        }
    }

    /// Returns the alpha component, between 0.0 (transparent) and 1.0 (opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the color as a `#rrggbb` hex string without its alpha channel.
    ///
    /// SVG carries opacity in separate `fill-opacity`/`stroke-opacity`
    /// attributes, so the paint value itself is always written opaque.
    ///
    /// # Examples
    ///
    /// ```
    /// use infragram_core::color::Color;
    ///
    /// let orange = Color::new("orange").unwrap().with_alpha(0.3);
    /// assert_eq!(orange.to_opaque_string(), "#ffa500");
    /// ```
    pub fn to_opaque_string(self) -> String {
        let Rgba8 { r, g, b, .. } = self.rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    fn rgba8(self) -> Rgba8 {
        self.color.to_alpha_color::<Srgb>().to_rgba8()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_opaque_string())
    }
}
