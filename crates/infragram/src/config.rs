//! Configuration types for Infragram rendering.
//!
//! This module provides configuration structures that control connector
//! geometry, text defaults and output scaling. All types implement
//! [`serde::Deserialize`] so they can be loaded from a TOML file; every field
//! is optional and falls back to the defaults below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Connector shrink and arrow sizing, title size, output scale.
//! - [`StyleConfig`] - Default background color and font family.
//!
//! # Example
//!
//! ```
//! # use infragram::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [render]
//!     scale = 2.0
//!
//!     [style]
//!     font_family = "DejaVu Sans"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.render().scale(), 2.0);
//! assert_eq!(config.render().shrink_factor(), 1.0);
//! assert_eq!(config.style().font_family(), "DejaVu Sans");
//! ```

use serde::Deserialize;

use infragram_core::color::Color;

const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Top-level application configuration combining render and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified render and style configurations.
    pub fn new(render: RenderConfig, style: StyleConfig) -> Self {
        Self { render, style }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Numeric rendering parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Output pixels per canvas unit.
    scale: f32,

    /// Multiplier applied to a node's border width to get the default gap
    /// between the node and a connector end.
    shrink_factor: f32,

    /// Arrowhead length for a zero-width connector.
    arrow_base: f32,

    /// Extra arrowhead length per unit of connector width.
    arrow_per_width: f32,

    /// Font size of the scene title; the subtitle uses 60% of it.
    title_font_size: f32,

    /// Distance between the canvas top edge and the title.
    padding: f32,
}

impl RenderConfig {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn shrink_factor(&self) -> f32 {
        self.shrink_factor
    }

    pub fn arrow_base(&self) -> f32 {
        self.arrow_base
    }

    pub fn arrow_per_width(&self) -> f32 {
        self.arrow_per_width
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_shrink_factor(mut self, shrink_factor: f32) -> Self {
        self.shrink_factor = shrink_factor;
        self
    }

    pub fn with_arrow_size(mut self, base: f32, per_width: f32) -> Self {
        self.arrow_base = base;
        self.arrow_per_width = per_width;
        self
    }

    pub fn with_title_font_size(mut self, size: f32) -> Self {
        self.title_font_size = size;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [("scale", self.scale), ("title_font_size", self.title_font_size)];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("render.{name} must be positive, got {value}"));
            }
        }
        let non_negative = [
            ("shrink_factor", self.shrink_factor),
            ("arrow_base", self.arrow_base),
            ("arrow_per_width", self.arrow_per_width),
            ("padding", self.padding),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("render.{name} must not be negative, got {value}"));
            }
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            shrink_factor: 1.0,
            arrow_base: 6.0,
            arrow_per_width: 2.0,
            title_font_size: 20.0,
            padding: 16.0,
        }
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Background color for documents that do not set one, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Font family for text without an explicit family.
    #[serde(default)]
    font_family: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<&str>, font_family: Option<&str>) -> Self {
        Self {
            background_color: background_color.map(str::to_string),
            font_family: font_family.map(str::to_string),
        }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the default font family.
    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.render().scale(), 1.0);
        assert_eq!(config.render().shrink_factor(), 1.0);
        assert_eq!(config.style().font_family(), "sans-serif");
        assert_eq!(config.style().background_color(), Ok(None));
        assert!(config.render().validate().is_ok());
    }

    #[test]
    fn test_partial_render_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[render]\narrow_base = 10.0\n").unwrap();
        assert_eq!(config.render().arrow_base(), 10.0);
        assert_eq!(config.render().arrow_per_width(), 2.0);
        assert_eq!(config.render().title_font_size(), 20.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<AppConfig>("[render]\nzoom = 3.0\n").is_err());
    }

    #[test]
    fn test_background_color() {
        let style = StyleConfig::new(Some("whitesmoke"), None);
        assert_eq!(
            style.background_color(),
            Ok(Some(Color::new("whitesmoke").unwrap()))
        );

        let invalid = StyleConfig::new(Some("not-a-color"), None);
        assert!(invalid.background_color().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RenderConfig::default().with_scale(0.0).validate().is_err());
        assert!(
            RenderConfig::default()
                .with_shrink_factor(-1.0)
                .validate()
                .is_err()
        );
        assert!(
            RenderConfig::default()
                .with_title_font_size(f32::NAN)
                .validate()
                .is_err()
        );
    }
}
