//! Declarative scene documents.
//!
//! A [`SceneDocument`] is the serialized form of a [`Scene`], readable from
//! TOML or JSON. Colors are CSS strings, styles are names, and every optional
//! field falls back to the same default the programmatic API uses.
//!
//! ```toml
//! title = "Simple Web Stack"
//!
//! [canvas]
//! width = 800
//! height = 600
//!
//! [[nodes]]
//! id = "server"
//! x = 300
//! y = 200
//! width = 200
//! height = 120
//! fill = "lightblue"
//! label = "Server\n8.8.8.8"
//!
//! [[nodes]]
//! id = "user"
//! shape = "circle"
//! x = 100
//! y = 100
//! radius = 40
//!
//! [[connectors]]
//! from = "user.auto"
//! to = { node = "server", at = "left" }
//! style = "directed"
//! label = "HTTP request"
//! ```
//!
//! For rectangles `x`/`y` is the top-left corner; for circles it is the
//! center. An anchor is written as `"node.point"`, `"node"` (meaning
//! `auto`), `{ node, at }`, or an absolute `{ x, y }`.

use std::{path::Path, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use infragram_core::{
    color::Color,
    draw::{StrokeDefinition, StrokeStyle, TextAnchor, TextDefinition},
    geometry::{Point, Size},
};

use crate::scene::{
    AnchorPoint, AnchorSpec, Annotation, Canvas, Connector, ConnectorStyle, Legend, LegendItem,
    Node, NodeShape, Scene, SceneError, Zone,
};

/// Errors raised while reading or converting a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid TOML document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(String),

    #[error("{entity}: invalid {field}: {reason}")]
    InvalidValue {
        entity: String,
        field: &'static str,
        reason: String,
    },

    #[error("{entity}: missing field `{field}`")]
    MissingField { entity: String, field: &'static str },

    #[error("{entity}: {source}")]
    Scene {
        entity: String,
        #[source]
        source: SceneError,
    },

    #[error("unsupported document format `{0}`, expected .toml or .json")]
    UnsupportedFormat(String),
}

impl DocumentError {
    fn invalid(entity: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            entity: entity.to_string(),
            field,
            reason: reason.into(),
        }
    }

    fn missing(entity: &str, field: &'static str) -> Self {
        Self::MissingField {
            entity: entity.to_string(),
            field,
        }
    }

    fn scene(entity: &str) -> impl FnOnce(SceneError) -> Self + '_ {
        move |source| Self::Scene {
            entity: entity.to_string(),
            source,
        }
    }
}

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] for anything other than
    /// `.toml` or `.json`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for DocumentFormat {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(DocumentError::UnsupportedFormat(s.to_string())),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Text style fields shared by labels, annotations and the like.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextStyleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
}

impl TextStyleDocument {
    fn to_definition(&self, entity: &str) -> Result<TextDefinition, DocumentError> {
        let mut style = TextDefinition::new().with_bold(self.bold).with_italic(self.italic);
        if let Some(family) = &self.font_family {
            style.set_font_family(family);
        }
        if let Some(size) = self.font_size {
            if !(size.is_finite() && size > 0.0) {
                return Err(DocumentError::invalid(
                    entity,
                    "font_size",
                    format!("must be positive, got {size}"),
                ));
            }
            style.set_font_size(size);
        }
        if let Some(color) = &self.color {
            style.set_color(Some(parse_color(entity, "color", color, self.opacity)?));
        }
        Ok(style)
    }

    fn from_definition(style: &TextDefinition) -> Option<Self> {
        if *style == TextDefinition::default() {
            return None;
        }
        let (color, opacity) = split_color(style.color());
        Some(Self {
            font_family: style.font_family().map(str::to_string),
            font_size: style.font_size(),
            color,
            opacity,
            bold: style.bold(),
            italic: style.italic(),
        })
    }
}

fn text_style(
    entity: &str,
    style: Option<&TextStyleDocument>,
) -> Result<TextDefinition, DocumentError> {
    style.map_or_else(|| Ok(TextDefinition::new()), |style| style.to_definition(entity))
}

fn parse_color(
    entity: &str,
    field: &'static str,
    value: &str,
    opacity: Option<f32>,
) -> Result<Color, DocumentError> {
    let color = Color::new(value).map_err(|reason| DocumentError::invalid(entity, field, reason))?;
    match opacity {
        None => Ok(color),
        Some(alpha) if (0.0..=1.0).contains(&alpha) => Ok(color.with_alpha(alpha)),
        Some(alpha) => Err(DocumentError::invalid(
            entity,
            field,
            format!("opacity must be between 0 and 1, got {alpha}"),
        )),
    }
}

/// Fill value that leaves a node unfilled.
const NO_FILL: &str = "none";

/// Splits a color into its opaque CSS form and an opacity below one.
fn split_color(color: Option<Color>) -> (Option<String>, Option<f32>) {
    match color {
        Some(color) => (
            Some(color.to_opaque_string()),
            (color.alpha() < 1.0).then_some(color.alpha()),
        ),
        None => (None, None),
    }
}

fn parse_border(
    entity: &str,
    color: Option<&str>,
    opacity: Option<f32>,
    width: Option<f32>,
    style: Option<&str>,
) -> Result<StrokeDefinition, DocumentError> {
    let mut stroke = StrokeDefinition::default();
    if let Some(color) = color {
        stroke.set_color(parse_color(entity, "border_color", color, opacity)?);
    }
    if let Some(width) = width {
        stroke.set_width(width);
    }
    if let Some(style) = style {
        let style = StrokeStyle::from_str(style)
            .map_err(|reason| DocumentError::invalid(entity, "border_style", reason))?;
        stroke.set_style(style);
    }
    Ok(stroke)
}

/// Border fields in document form: color, opacity, width, style.
type BorderFields = (Option<String>, Option<f32>, Option<f32>, Option<String>);

fn split_border(stroke: &StrokeDefinition) -> BorderFields {
    let (color, opacity) = split_color(Some(stroke.color()));
    let style = (*stroke.style() != StrokeStyle::Solid).then(|| stroke.style().to_string());
    (color, opacity, Some(stroke.width()), style)
}

fn non_zero(value: f32) -> Option<f32> {
    (value != 0.0).then_some(value)
}

/// Canvas section of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasDocument {
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// Shape of a node in document form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
}

/// A node in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDocument {
    pub id: String,
    #[serde(default)]
    pub shape: ShapeKind,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<TextStyleDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl NodeDocument {
    fn to_node(&self) -> Result<Node, DocumentError> {
        let entity = format!("node `{}`", self.id);
        let position = Point::new(self.x, self.y);

        let mut node = match self.shape {
            ShapeKind::Rectangle => {
                if self.radius.is_some() {
                    return Err(DocumentError::invalid(
                        &entity,
                        "radius",
                        "only circles have a radius, use width and height",
                    ));
                }
                let width = self.width.ok_or_else(|| DocumentError::missing(&entity, "width"))?;
                let height = self
                    .height
                    .ok_or_else(|| DocumentError::missing(&entity, "height"))?;
                Node::rectangle(&self.id, position, Size::new(width, height))
            }
            ShapeKind::Circle => {
                if self.width.is_some() || self.height.is_some() {
                    return Err(DocumentError::invalid(
                        &entity,
                        "width",
                        "circles are sized by radius",
                    ));
                }
                let radius = self
                    .radius
                    .ok_or_else(|| DocumentError::missing(&entity, "radius"))?;
                Node::circle(&self.id, position, radius)
            }
        };

        match self.fill.as_deref() {
            Some(NO_FILL) => node = node.without_fill(),
            Some(fill) => {
                node = node.with_fill(parse_color(&entity, "fill", fill, self.fill_opacity)?);
            }
            None if self.fill_opacity.is_some() => {
                node = node.with_fill(parse_color(&entity, "fill", "white", self.fill_opacity)?);
            }
            None => {}
        }
        node = node.with_border(parse_border(
            &entity,
            self.border_color.as_deref(),
            self.border_opacity,
            self.border_width,
            self.border_style.as_deref(),
        )?);
        if let Some(label) = &self.label {
            node = node.with_label(label);
        }
        node = node.with_label_style(text_style(&entity, self.label_style.as_ref())?);
        if let Some(radius) = self.corner_radius {
            node = node.with_corner_radius(radius);
        }
        if let Some(z_index) = self.z_index {
            node = node.with_z_index(z_index);
        }
        Ok(node)
    }

    fn from_node(node: &Node) -> Self {
        let (shape, width, height, radius) = match node.shape() {
            NodeShape::Rectangle { width, height } => {
                (ShapeKind::Rectangle, Some(width), Some(height), None)
            }
            NodeShape::Circle { radius } => (ShapeKind::Circle, None, None, Some(radius)),
        };
        let (fill, fill_opacity) = match node.fill() {
            None => (Some(NO_FILL.to_string()), None),
            Some(color) if color == Color::white() => (None, None),
            fill => split_color(fill),
        };
        let (border_color, border_opacity, border_width, border_style) =
            split_border(node.border());

        Self {
            id: node.id().to_string(),
            shape,
            x: node.position().x(),
            y: node.position().y(),
            width,
            height,
            radius,
            fill,
            fill_opacity,
            border_color,
            border_opacity,
            border_width,
            border_style,
            corner_radius: non_zero(node.corner_radius()),
            label: node.label().map(str::to_string),
            label_style: TextStyleDocument::from_definition(node.label_style()),
            z_index: (node.z_index() != 0).then_some(node.z_index()),
        }
    }
}

/// A zone in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<TextStyleDocument>,
}

impl ZoneDocument {
    fn to_zone(&self, entity: &str) -> Result<Zone, DocumentError> {
        let mut zone = Zone::new(Point::new(self.x, self.y), Size::new(self.width, self.height));
        if let Some(id) = &self.id {
            zone = zone.with_id(id);
        }
        if let Some(fill) = &self.fill {
            zone = zone.with_fill(parse_color(entity, "fill", fill, self.fill_opacity)?);
        }
        zone = zone.with_border(parse_border(
            entity,
            self.border_color.as_deref(),
            self.border_opacity,
            self.border_width,
            self.border_style.as_deref(),
        )?);
        if let Some(radius) = self.corner_radius {
            zone = zone.with_corner_radius(radius);
        }
        if let Some(label) = &self.label {
            zone = zone.with_label(label);
        }
        Ok(zone.with_label_style(text_style(entity, self.label_style.as_ref())?))
    }

    fn from_zone(zone: &Zone) -> Self {
        let bounds = zone.bounds();
        let (fill, fill_opacity) = split_color(zone.fill());
        let (border_color, border_opacity, border_width, border_style) =
            split_border(zone.border());
        Self {
            id: zone.id().map(str::to_string),
            x: bounds.min_x(),
            y: bounds.min_y(),
            width: bounds.width(),
            height: bounds.height(),
            fill,
            fill_opacity,
            border_color,
            border_opacity,
            border_width,
            border_style,
            corner_radius: non_zero(zone.corner_radius()),
            label: zone.label().map(str::to_string),
            label_style: TextStyleDocument::from_definition(zone.label_style()),
        }
    }
}

/// One end of a connector in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnchorDocument {
    /// `"node.point"` or just `"node"`.
    Reference(String),
    Node {
        node: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<String>,
    },
    Point {
        x: f32,
        y: f32,
    },
}

impl AnchorDocument {
    fn to_spec(&self, entity: &str) -> Result<AnchorSpec, DocumentError> {
        let parse_at = |at: &str| {
            AnchorPoint::from_str(at).map_err(|reason| DocumentError::invalid(entity, "anchor", reason))
        };
        match self {
            Self::Reference(reference) => {
                // Only split when the suffix names an anchor, ids may contain dots
                let split = reference
                    .rsplit_once('.')
                    .and_then(|(id, at)| AnchorPoint::from_str(at).ok().map(|at| (id, at)));
                Ok(match split {
                    Some((id, at)) => AnchorSpec::node(id, at),
                    None => AnchorSpec::node(reference, AnchorPoint::Auto),
                })
            }
            Self::Node { node, at } => {
                let at = at.as_deref().map(parse_at).transpose()?.unwrap_or_default();
                Ok(AnchorSpec::node(node, at))
            }
            Self::Point { x, y } => Ok(AnchorSpec::absolute(*x, *y)),
        }
    }

    fn from_spec(spec: &AnchorSpec) -> Self {
        match spec {
            AnchorSpec::Node { id, at } => Self::Node {
                node: id.clone(),
                at: Some(at.name().to_string()),
            },
            AnchorSpec::Absolute(point) => Self::Point {
                x: point.x(),
                y: point.y(),
            },
        }
    }
}

/// A connector in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorDocument {
    pub from: AnchorDocument,
    pub to: AnchorDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_offset: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<TextStyleDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_a: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_b: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_size: Option<f32>,
}

impl ConnectorDocument {
    fn to_connector(&self, entity: &str) -> Result<Connector, DocumentError> {
        let style = self
            .style
            .as_deref()
            .map(ConnectorStyle::from_str)
            .transpose()
            .map_err(|reason| DocumentError::invalid(entity, "style", reason))?
            .unwrap_or_default();

        let mut connector = Connector::new(self.from.to_spec(entity)?, self.to.to_spec(entity)?, style);
        match &self.color {
            Some(color) => {
                connector = connector.with_color(parse_color(entity, "color", color, self.opacity)?);
            }
            None if self.opacity.is_some() => {
                connector = connector.with_color(parse_color(entity, "color", "black", self.opacity)?);
            }
            None => {}
        }
        if let Some(width) = self.width {
            connector = connector.with_width(width);
        }
        if let Some(label) = &self.label {
            connector = connector.with_label(label);
        }
        if let Some([dx, dy]) = self.label_offset {
            connector = connector.with_label_offset(Point::new(dx, dy));
        }
        connector = connector.with_label_style(text_style(entity, self.label_style.as_ref())?);
        if let Some(shrink) = self.shrink_a {
            connector = connector.with_shrink_a(shrink);
        }
        if let Some(shrink) = self.shrink_b {
            connector = connector.with_shrink_b(shrink);
        }
        if let Some(size) = self.arrow_size {
            connector = connector.with_arrow_size(size);
        }
        Ok(connector)
    }

    fn from_connector(connector: &Connector) -> Self {
        let (color, opacity) = split_color(Some(connector.color()));
        let offset = connector.label_offset();
        Self {
            from: AnchorDocument::from_spec(connector.from()),
            to: AnchorDocument::from_spec(connector.to()),
            style: Some(connector.style().name().to_string()),
            color,
            opacity,
            width: Some(connector.width()),
            label: connector.label().map(str::to_string),
            label_offset: (offset != Point::default()).then(|| [offset.x(), offset.y()]),
            label_style: TextStyleDocument::from_definition(connector.label_style()),
            shrink_a: connector.shrink_a(),
            shrink_b: connector.shrink_b(),
            arrow_size: connector.arrow_size(),
        }
    }
}

/// Free text in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationDocument {
    pub x: f32,
    pub y: f32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAnchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyleDocument>,
}

/// A legend row in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendItemDocument {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    pub text: String,
}

/// A legend in document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendDocument {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default)]
    pub items: Vec<LegendItemDocument>,
}

impl LegendDocument {
    fn to_legend(&self, entity: &str) -> Result<Legend, DocumentError> {
        let mut legend = Legend::new(Point::new(self.x, self.y));
        if let Some(title) = &self.title {
            legend = legend.with_title(title);
        }
        match (self.width, self.height) {
            (Some(width), Some(height)) => legend = legend.with_size(Size::new(width, height)),
            (None, None) => {}
            (Some(_), None) => return Err(DocumentError::missing(entity, "height")),
            (None, Some(_)) => return Err(DocumentError::missing(entity, "width")),
        }
        for item in &self.items {
            let color = parse_color(entity, "color", &item.color, item.opacity)?;
            legend = legend.with_item(LegendItem::new(color, &item.text));
        }
        Ok(legend)
    }

    fn from_legend(legend: &Legend) -> Self {
        Self {
            x: legend.position().x(),
            y: legend.position().y(),
            title: legend.title().map(str::to_string),
            width: legend.size().map(Size::width),
            height: legend.size().map(Size::height),
            items: legend
                .items()
                .iter()
                .map(|item| {
                    let (color, opacity) = split_color(Some(item.color()));
                    LegendItemDocument {
                        color: color.unwrap_or_default(),
                        opacity,
                        text: item.text().to_string(),
                    }
                })
                .collect(),
        }
    }
}

/// The serialized form of a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub canvas: CanvasDocument,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<ZoneDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connectors: Vec<ConnectorDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legends: Vec<LegendDocument>,
}

impl SceneDocument {
    /// Parses a document in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Toml`] or [`DocumentError::Json`] for syntax
    /// errors, unknown fields and missing required fields.
    pub fn parse(source: &str, format: DocumentFormat) -> Result<Self, DocumentError> {
        match format {
            DocumentFormat::Toml => Self::from_toml_str(source),
            DocumentFormat::Json => Self::from_json_str(source),
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_toml_string(&self) -> Result<String, DocumentError> {
        toml::to_string(self).map_err(|err| DocumentError::Serialize(err.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|err| DocumentError::Serialize(err.to_string()))
    }

    /// Builds a [`Scene`] from this document.
    ///
    /// # Errors
    ///
    /// Returns the first invalid color, style name, missing shape dimension,
    /// or scene construction error, tagged with the entity it belongs to.
    pub fn into_scene(self) -> Result<Scene, DocumentError> {
        let mut canvas =
            Canvas::new(self.canvas.width, self.canvas.height).map_err(DocumentError::scene("canvas"))?;
        if let Some(background) = &self.canvas.background {
            canvas = canvas.with_background(parse_color("canvas", "background", background, None)?);
        }

        let mut scene = Scene::new(canvas);
        if let Some(title) = &self.title {
            scene.set_title(title);
        }
        if let Some(subtitle) = &self.subtitle {
            scene.set_subtitle(subtitle);
        }

        for (index, zone) in self.zones.iter().enumerate() {
            let entity = match &zone.id {
                Some(id) => format!("zone `{id}`"),
                None => format!("zone {index}"),
            };
            scene
                .add_zone(zone.to_zone(&entity)?)
                .map_err(DocumentError::scene(&entity))?;
        }

        for node in &self.nodes {
            let entity = format!("node `{}`", node.id);
            scene
                .add_node(node.to_node()?)
                .map_err(DocumentError::scene(&entity))?;
        }

        for (index, connector) in self.connectors.iter().enumerate() {
            let entity = format!("connector {index}");
            scene
                .add_connector(connector.to_connector(&entity)?)
                .map_err(DocumentError::scene(&entity))?;
        }

        for (index, annotation) in self.annotations.iter().enumerate() {
            let entity = format!("annotation {index}");
            let mut built = Annotation::new(Point::new(annotation.x, annotation.y), &annotation.text)
                .with_style(text_style(&entity, annotation.style.as_ref())?);
            if let Some(align) = annotation.align {
                built = built.with_anchor(align);
            }
            scene
                .add_annotation(built)
                .map_err(DocumentError::scene(&entity))?;
        }

        for (index, legend) in self.legends.iter().enumerate() {
            let entity = format!("legend {index}");
            scene
                .add_legend(legend.to_legend(&entity)?)
                .map_err(DocumentError::scene(&entity))?;
        }

        debug!(
            nodes = scene.nodes().len(),
            connectors = scene.connectors().len();
            "Scene built from document"
        );

        Ok(scene)
    }

    /// Returns the document form of `scene`.
    pub fn from_scene(scene: &Scene) -> Self {
        let canvas = scene.canvas();
        Self {
            title: scene.title().map(str::to_string),
            subtitle: scene.subtitle().map(str::to_string),
            canvas: CanvasDocument {
                width: canvas.width(),
                height: canvas.height(),
                background: Some(canvas.background().to_opaque_string()),
            },
            zones: scene.zones().iter().map(ZoneDocument::from_zone).collect(),
            nodes: scene.nodes().map(NodeDocument::from_node).collect(),
            connectors: scene
                .connectors()
                .iter()
                .map(ConnectorDocument::from_connector)
                .collect(),
            annotations: scene
                .annotations()
                .iter()
                .map(|annotation| AnnotationDocument {
                    x: annotation.position().x(),
                    y: annotation.position().y(),
                    text: annotation.text().to_string(),
                    align: (annotation.anchor() != TextAnchor::default())
                        .then_some(annotation.anchor()),
                    style: TextStyleDocument::from_definition(annotation.style()),
                })
                .collect(),
            legends: scene.legends().iter().map(LegendDocument::from_legend).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [canvas]
        width = 10
        height = 10
    "#;

    #[test]
    fn test_minimal_document() {
        let scene = SceneDocument::from_toml_str(MINIMAL)
            .unwrap()
            .into_scene()
            .unwrap();
        assert_eq!(scene.canvas().width(), 10.0);
        assert_eq!(scene.canvas().background(), Color::white());
        assert_eq!(scene.nodes().count(), 0);
        assert_eq!(scene.title(), None);
    }

    #[test]
    fn test_node_fields() {
        let source = r##"
            [canvas]
            width = 100
            height = 100

            [[nodes]]
            id = "db"
            x = 10
            y = 20
            width = 30
            height = 15
            fill = "#ff8000"
            fill_opacity = 0.5
            border_color = "navy"
            border_width = 2
            border_style = "dashed"
            corner_radius = 3
            label = "Primary\nDB"
            label_style = { font_size = 9, bold = true }
            z_index = 2

            [[nodes]]
            id = "user"
            shape = "circle"
            x = 80
            y = 80
            radius = 10
        "##;
        let scene = SceneDocument::from_toml_str(source)
            .unwrap()
            .into_scene()
            .unwrap();

        let db = scene.node("db").unwrap();
        assert_eq!(db.bounds().max_x(), 40.0);
        assert!((db.fill().unwrap().alpha() - 0.5).abs() < 0.001);
        assert_eq!(db.border().width(), 2.0);
        assert_eq!(*db.border().style(), StrokeStyle::Dashed);
        assert_eq!(db.corner_radius(), 3.0);
        assert_eq!(db.label(), Some("Primary\nDB"));
        assert_eq!(db.label_style().font_size(), Some(9.0));
        assert!(db.label_style().bold());
        assert_eq!(db.z_index(), 2);

        let user = scene.node("user").unwrap();
        assert_eq!(user.shape(), NodeShape::Circle { radius: 10.0 });
        assert_eq!(user.center(), Point::new(80.0, 80.0));
    }

    #[test]
    fn test_anchor_forms() {
        let source = r#"
            [canvas]
            width = 100
            height = 100

            [[connectors]]
            from = "lb.bottom-left"
            to = "web.01"

            [[connectors]]
            from = { node = "a" }
            to = { node = "b", at = "center-right" }

            [[connectors]]
            from = { x = 1, y = 2 }
            to = "c.auto"
            style = "bidirected"
        "#;
        let scene = SceneDocument::from_toml_str(source)
            .unwrap()
            .into_scene()
            .unwrap();
        let connectors = scene.connectors();

        assert_eq!(connectors[0].from(), &AnchorSpec::node("lb", AnchorPoint::BottomLeft));
        assert_eq!(connectors[0].to(), &AnchorSpec::node("web.01", AnchorPoint::Auto));
        assert_eq!(connectors[1].from(), &AnchorSpec::node("a", AnchorPoint::Auto));
        assert_eq!(connectors[1].to(), &AnchorSpec::node("b", AnchorPoint::Right));
        assert_eq!(connectors[2].from(), &AnchorSpec::absolute(1.0, 2.0));
        assert_eq!(connectors[2].style(), ConnectorStyle::Bidirected);
    }

    #[test]
    fn test_invalid_values_name_the_entity() {
        let bad_color = r#"
            [canvas]
            width = 10
            height = 10

            [[nodes]]
            id = "web"
            x = 1
            y = 1
            width = 2
            height = 2
            fill = "blurple"
        "#;
        let err = SceneDocument::from_toml_str(bad_color)
            .unwrap()
            .into_scene()
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidValue { field: "fill", .. }));
        assert!(err.to_string().starts_with("node `web`"));

        let bad_style = r#"
            [canvas]
            width = 10
            height = 10

            [[connectors]]
            from = { x = 0, y = 0 }
            to = { x = 5, y = 5 }
            style = "zigzag"
        "#;
        let err = SceneDocument::from_toml_str(bad_style)
            .unwrap()
            .into_scene()
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidValue { field: "style", .. }));

        let missing_height = r#"
            [canvas]
            width = 10
            height = 10

            [[nodes]]
            id = "web"
            x = 1
            y = 1
            width = 2
        "#;
        let err = SceneDocument::from_toml_str(missing_height)
            .unwrap()
            .into_scene()
            .unwrap_err();
        assert!(matches!(err, DocumentError::MissingField { field: "height", .. }));
    }

    #[test]
    fn test_scene_errors_are_wrapped() {
        let duplicate = r#"
            [canvas]
            width = 10
            height = 10

            [[nodes]]
            id = "a"
            x = 1
            y = 1
            width = 2
            height = 2

            [[nodes]]
            id = "a"
            x = 5
            y = 5
            width = 2
            height = 2
        "#;
        let err = SceneDocument::from_toml_str(duplicate)
            .unwrap()
            .into_scene()
            .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Scene {
                source: SceneError::DuplicateNodeId(_),
                ..
            }
        ));

        let zero_canvas = "[canvas]\nwidth = 0\nheight = 10\n";
        let err = SceneDocument::from_toml_str(zero_canvas)
            .unwrap()
            .into_scene()
            .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Scene {
                source: SceneError::InvalidSize { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_syntax_and_unknown_fields() {
        assert!(matches!(
            SceneDocument::from_toml_str("[canvas\nwidth = 1"),
            Err(DocumentError::Toml(_))
        ));
        assert!(matches!(
            SceneDocument::from_toml_str("[canvas]\nwidth = 1\nheight = 1\ndepth = 3\n"),
            Err(DocumentError::Toml(_))
        ));
        assert!(matches!(
            SceneDocument::from_json_str("{\"canvas\": {\"width\": 1}}"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn test_json_document() {
        let source = r#"{
            "title": "Request Flow",
            "canvas": { "width": 50, "height": 40, "background": "whitesmoke" },
            "nodes": [
                { "id": "a", "x": 1, "y": 1, "width": 5, "height": 5 }
            ],
            "annotations": [
                { "x": 10, "y": 30, "text": "note", "align": "start" }
            ]
        }"#;
        let scene = SceneDocument::parse(source, DocumentFormat::Json)
            .unwrap()
            .into_scene()
            .unwrap();
        assert_eq!(scene.title(), Some("Request Flow"));
        assert_eq!(scene.canvas().background(), Color::new("whitesmoke").unwrap());
        assert_eq!(scene.annotations()[0].anchor(), TextAnchor::Start);
    }

    #[test]
    fn test_document_format_from_path() {
        assert_eq!(DocumentFormat::from_path("a/b.toml").unwrap(), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path("diagram.JSON").unwrap(), DocumentFormat::Json);
        assert!(matches!(
            DocumentFormat::from_path("diagram.yaml"),
            Err(DocumentError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_scene_skips_defaults() {
        let mut scene = Scene::new(Canvas::new(20.0, 20.0).unwrap());
        scene
            .add_node(Node::rectangle("n", Point::new(1.0, 1.0), Size::new(2.0, 2.0)))
            .unwrap();
        let document = SceneDocument::from_scene(&scene);
        let node = &document.nodes[0];
        assert_eq!(node.shape, ShapeKind::Rectangle);
        assert_eq!(node.fill, None);
        assert_eq!(node.border_style, None);
        assert_eq!(node.corner_radius, None);
        assert_eq!(node.label_style, None);
        assert_eq!(node.z_index, None);
    }

    #[test]
    fn test_node_fill_defaults_and_none() {
        let source = r#"
            [canvas]
            width = 100
            height = 100

            [[nodes]]
            id = "plain"
            x = 10
            y = 10
            width = 20
            height = 20

            [[nodes]]
            id = "outline"
            x = 50
            y = 10
            width = 20
            height = 20
            fill = "none"

            [[nodes]]
            id = "faded"
            x = 10
            y = 50
            width = 20
            height = 20
            fill_opacity = 0.25
        "#;
        let scene = SceneDocument::from_toml_str(source)
            .unwrap()
            .into_scene()
            .unwrap();

        assert_eq!(scene.node("plain").unwrap().fill(), Some(Color::white()));
        assert_eq!(scene.node("outline").unwrap().fill(), None);
        assert_eq!(
            scene.node("faded").unwrap().fill(),
            Some(Color::white().with_alpha(0.25))
        );

        let document = SceneDocument::from_scene(&scene);
        assert_eq!(document.nodes[0].fill, None);
        assert_eq!(document.nodes[1].fill.as_deref(), Some("none"));
        assert_eq!(document.nodes[2].fill.as_deref(), Some("#ffffff"));
        assert_eq!(document.nodes[2].fill_opacity, Some(0.25));
        assert_eq!(document.into_scene().unwrap(), scene);
    }
}
