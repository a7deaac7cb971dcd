//! Scene model: the declarative description of one diagram.
//!
//! A [`Scene`] owns a [`Canvas`] and every entity drawn on it. Entities are
//! validated as they are added; connector anchors that name nodes are
//! resolved later, when the scene is validated or rendered.
//!
//! # Example
//!
//! ```
//! # use infragram::scene::{AnchorPoint, AnchorSpec, Canvas, Connector, ConnectorStyle, Node, Scene};
//! # use infragram::geometry::{Point, Size};
//! let canvas = Canvas::new(400.0, 300.0).unwrap();
//! let mut scene = Scene::new(canvas);
//!
//! scene
//!     .add_node(Node::rectangle("web", Point::new(20.0, 40.0), Size::new(120.0, 60.0)).with_label("Web Server"))
//!     .unwrap();
//! scene
//!     .add_node(Node::circle("user", Point::new(300.0, 70.0), 30.0).with_label("User"))
//!     .unwrap();
//! scene
//!     .add_connector(Connector::new(
//!         AnchorSpec::node("user", AnchorPoint::Auto),
//!         AnchorSpec::node("web", AnchorPoint::Right),
//!         ConnectorStyle::Directed,
//!     ))
//!     .unwrap();
//!
//! assert_eq!(scene.nodes().count(), 2);
//! assert!(scene.node("web").is_some());
//! ```

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use log::{debug, trace};
use thiserror::Error;

use infragram_core::{
    color::Color,
    draw::{StrokeDefinition, StrokeStyle, TextAnchor, TextDefinition},
    geometry::{Bounds, Point, Size},
};

/// Errors raised while building a [`Scene`].
///
/// Each error is reported by the call that caused it; the scene is left
/// unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    #[error("node id must not be empty")]
    EmptyNodeId,

    #[error("invalid size for {entity}: {reason}")]
    InvalidSize { entity: String, reason: String },

    #[error("malformed anchor in connector {connector}: {reason}")]
    MalformedAnchor { connector: usize, reason: String },
}

impl SceneError {
    fn invalid_size(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

fn check_positive(entity: &str, what: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid_size(
            entity,
            format!("{what} must be positive and finite, got {value}"),
        ))
    }
}

fn check_non_negative(entity: &str, what: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid_size(
            entity,
            format!("{what} must be non-negative and finite, got {value}"),
        ))
    }
}

fn check_finite_point(entity: &str, what: &str, point: Point) -> Result<(), SceneError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(SceneError::invalid_size(
            entity,
            format!("{what} must be finite, got ({}, {})", point.x(), point.y()),
        ))
    }
}

/// The drawing area of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: f32,
    height: f32,
    background: Color,
}

impl Canvas {
    /// Creates a canvas with a white background.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidSize`] when either dimension is not a
    /// positive finite number.
    pub fn new(width: f32, height: f32) -> Result<Self, SceneError> {
        check_positive("canvas", "width", width)?;
        check_positive("canvas", "height", height)?;
        Ok(Self {
            width,
            height,
            background: Color::white(),
        })
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Returns the canvas area, `[0, width] × [0, height]`.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(Point::default(), self.size())
    }
}

/// Geometry of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    /// Axis-aligned box; the node position is its top-left corner.
    Rectangle { width: f32, height: f32 },
    /// Circle; the node position is its center.
    Circle { radius: f32 },
}

impl NodeShape {
    /// Returns the lowercase shape name used in documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
        }
    }
}

/// A labelled box or circle at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    shape: NodeShape,
    position: Point,
    fill: Option<Color>,
    border: StrokeDefinition,
    label: Option<String>,
    label_style: TextDefinition,
    corner_radius: f32,
    z_index: i32,
}

impl Node {
    fn with_shape(id: &str, shape: NodeShape, position: Point) -> Self {
        Self {
            id: id.to_string(),
            shape,
            position,
            fill: Some(Color::white()),
            border: StrokeDefinition::default(),
            label: None,
            label_style: TextDefinition::new(),
            corner_radius: 0.0,
            z_index: 0,
        }
    }

    /// Creates a rectangle node with its top-left corner at `top_left`.
    pub fn rectangle(id: &str, top_left: Point, size: Size) -> Self {
        Self::with_shape(
            id,
            NodeShape::Rectangle {
                width: size.width(),
                height: size.height(),
            },
            top_left,
        )
    }

    /// Creates a circle node centered on `center`.
    pub fn circle(id: &str, center: Point, radius: f32) -> Self {
        Self::with_shape(id, NodeShape::Circle { radius }, center)
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Draws only the border. Nodes are filled white otherwise.
    pub fn without_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn with_border(mut self, border: StrokeDefinition) -> Self {
        self.border = border;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_label_style(mut self, style: TextDefinition) -> Self {
        self.label_style = style;
        self
    }

    /// Rounds the corners of a rectangle node. Ignored for circles.
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    /// Returns the top-left corner for rectangles and the center for circles.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn border(&self) -> &StrokeDefinition {
        &self.border
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn label_style(&self) -> &TextDefinition {
        &self.label_style
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Returns the axis-aligned bounding box of the node.
    pub fn bounds(&self) -> Bounds {
        match self.shape {
            NodeShape::Rectangle { width, height } => {
                Bounds::new_from_top_left(self.position, Size::new(width, height))
            }
            NodeShape::Circle { radius } => {
                Bounds::new_from_center(self.position, Size::new(radius * 2.0, radius * 2.0))
            }
        }
    }

    pub fn center(&self) -> Point {
        match self.shape {
            NodeShape::Rectangle { .. } => self.bounds().center(),
            NodeShape::Circle { .. } => self.position,
        }
    }

    fn check(&self) -> Result<(), SceneError> {
        if self.id.is_empty() {
            return Err(SceneError::EmptyNodeId);
        }
        let entity = format!("node `{}`", self.id);
        check_finite_point(&entity, "position", self.position)?;
        match self.shape {
            NodeShape::Rectangle { width, height } => {
                check_positive(&entity, "width", width)?;
                check_positive(&entity, "height", height)?;
            }
            NodeShape::Circle { radius } => check_positive(&entity, "radius", radius)?,
        }
        check_non_negative(&entity, "corner radius", self.corner_radius)?;
        check_non_negative(&entity, "border width", self.border.width())
    }
}

/// A background region grouping related nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    id: Option<String>,
    bounds: Bounds,
    fill: Option<Color>,
    border: StrokeDefinition,
    corner_radius: f32,
    label: Option<String>,
    label_style: TextDefinition,
}

impl Zone {
    pub fn new(top_left: Point, size: Size) -> Self {
        Self {
            id: None,
            bounds: Bounds::new_from_top_left(top_left, size),
            fill: None,
            border: StrokeDefinition::default(),
            corner_radius: 0.0,
            label: None,
            label_style: TextDefinition::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_border(mut self, border: StrokeDefinition) -> Self {
        self.border = border;
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_label_style(mut self, style: TextDefinition) -> Self {
        self.label_style = style;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn border(&self) -> &StrokeDefinition {
        &self.border
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn label_style(&self) -> &TextDefinition {
        &self.label_style
    }

    /// Returns a human readable reference, the id when present.
    pub fn describe(&self, index: usize) -> String {
        match &self.id {
            Some(id) => format!("zone `{id}`"),
            None => format!("zone {index}"),
        }
    }

    fn check(&self, index: usize) -> Result<(), SceneError> {
        let entity = self.describe(index);
        check_finite_point(&entity, "position", self.bounds.min_point())?;
        check_positive(&entity, "width", self.bounds.width())?;
        check_positive(&entity, "height", self.bounds.height())?;
        check_non_negative(&entity, "corner radius", self.corner_radius)?;
        check_non_negative(&entity, "border width", self.border.width())
    }
}

/// A named point on a node's boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorPoint {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// The boundary point facing the other end of the connector.
    #[default]
    Auto,
}

impl AnchorPoint {
    /// Returns the canonical name used in documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Auto => "auto",
        }
    }

    /// Returns the anchor as a unit-square offset from the node center,
    /// `(-1, -1)` being the top-left corner. `None` for [`AnchorPoint::Auto`].
    pub fn unit_offset(self) -> Option<(f32, f32)> {
        let offset = match self {
            Self::Center => (0.0, 0.0),
            Self::Top => (0.0, -1.0),
            Self::Bottom => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::TopLeft => (-1.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
            Self::Auto => return None,
        };
        Some(offset)
    }
}

impl FromStr for AnchorPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "center" | "centre" => Ok(Self::Center),
            "top" | "top-center" => Ok(Self::Top),
            "bottom" | "bottom-center" => Ok(Self::Bottom),
            "left" | "center-left" | "left-center" => Ok(Self::Left),
            "right" | "center-right" | "right-center" => Ok(Self::Right),
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            "auto" => Ok(Self::Auto),
            _ => Err(format!(
                "unknown anchor point `{s}`, valid values: center, top, bottom, left, right, \
                 top-left, top-right, bottom-left, bottom-right, auto"
            )),
        }
    }
}

impl fmt::Display for AnchorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One end of a connector.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorSpec {
    /// A point on a node, resolved at render time.
    Node { id: String, at: AnchorPoint },
    /// A fixed canvas coordinate.
    Absolute(Point),
}

impl AnchorSpec {
    pub fn node(id: &str, at: AnchorPoint) -> Self {
        Self::Node {
            id: id.to_string(),
            at,
        }
    }

    pub fn absolute(x: f32, y: f32) -> Self {
        Self::Absolute(Point::new(x, y))
    }

    /// Returns the referenced node id, if any.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Node { id, .. } => Some(id),
            Self::Absolute(_) => None,
        }
    }

    fn check(&self, connector: usize) -> Result<(), SceneError> {
        match self {
            Self::Node { id, .. } if id.is_empty() => Err(SceneError::MalformedAnchor {
                connector,
                reason: "node id must not be empty".to_string(),
            }),
            Self::Absolute(point) if !point.is_finite() => Err(SceneError::MalformedAnchor {
                connector,
                reason: format!(
                    "coordinates must be finite, got ({}, {})",
                    point.x(),
                    point.y()
                ),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for AnchorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node { id, at } => write!(f, "{id}.{at}"),
            Self::Absolute(point) => write!(f, "({}, {})", point.x(), point.y()),
        }
    }
}

/// Line style and arrowhead placement of a connector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorStyle {
    /// Solid line, arrowhead at the target.
    #[default]
    Directed,
    /// Solid line, arrowheads at both ends.
    Bidirected,
    /// Dashed line, arrowhead at the target.
    Dashed,
    /// Dotted line, arrowhead at the target.
    Dotted,
    /// Solid line without arrowheads.
    Plain,
}

impl ConnectorStyle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Directed => "directed",
            Self::Bidirected => "bidirected",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Plain => "plain",
        }
    }

    pub fn arrow_at_source(self) -> bool {
        matches!(self, Self::Bidirected)
    }

    pub fn arrow_at_target(self) -> bool {
        !matches!(self, Self::Plain)
    }

    pub fn stroke_style(self) -> StrokeStyle {
        match self {
            Self::Dashed => StrokeStyle::Dashed,
            Self::Dotted => StrokeStyle::Dotted,
            Self::Directed | Self::Bidirected | Self::Plain => StrokeStyle::Solid,
        }
    }
}

impl FromStr for ConnectorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "directed" => Ok(Self::Directed),
            "bidirected" | "bidirectional" => Ok(Self::Bidirected),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "plain" => Ok(Self::Plain),
            _ => Err(format!(
                "unknown connector style `{s}`, valid values: directed, bidirected, dashed, dotted, plain"
            )),
        }
    }
}

impl fmt::Display for ConnectorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A straight edge between two anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    from: AnchorSpec,
    to: AnchorSpec,
    style: ConnectorStyle,
    color: Color,
    width: f32,
    label: Option<String>,
    label_offset: Point,
    label_style: TextDefinition,
    shrink_a: Option<f32>,
    shrink_b: Option<f32>,
    arrow_size: Option<f32>,
}

impl Connector {
    /// Creates a black connector, 1 unit wide.
    pub fn new(from: AnchorSpec, to: AnchorSpec, style: ConnectorStyle) -> Self {
        Self {
            from,
            to,
            style,
            color: Color::default(),
            width: 1.0,
            label: None,
            label_offset: Point::default(),
            label_style: TextDefinition::new(),
            shrink_a: None,
            shrink_b: None,
            arrow_size: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Moves the label away from the midpoint of the visible segment.
    pub fn with_label_offset(mut self, offset: Point) -> Self {
        self.label_offset = offset;
        self
    }

    pub fn with_label_style(mut self, style: TextDefinition) -> Self {
        self.label_style = style;
        self
    }

    /// Sets the gap left between the source anchor and the line start.
    pub fn with_shrink_a(mut self, shrink: f32) -> Self {
        self.shrink_a = Some(shrink);
        self
    }

    /// Sets the gap left between the line end and the target anchor.
    pub fn with_shrink_b(mut self, shrink: f32) -> Self {
        self.shrink_b = Some(shrink);
        self
    }

    /// Sets the arrowhead length, overriding the width-based default.
    pub fn with_arrow_size(mut self, size: f32) -> Self {
        self.arrow_size = Some(size);
        self
    }

    pub fn from(&self) -> &AnchorSpec {
        &self.from
    }

    pub fn to(&self) -> &AnchorSpec {
        &self.to
    }

    pub fn style(&self) -> ConnectorStyle {
        self.style
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn label_offset(&self) -> Point {
        self.label_offset
    }

    pub fn label_style(&self) -> &TextDefinition {
        &self.label_style
    }

    pub fn shrink_a(&self) -> Option<f32> {
        self.shrink_a
    }

    pub fn shrink_b(&self) -> Option<f32> {
        self.shrink_b
    }

    pub fn arrow_size(&self) -> Option<f32> {
        self.arrow_size
    }

    /// Returns the stroke used for the connector line.
    pub fn stroke(&self) -> StrokeDefinition {
        StrokeDefinition::new(self.color, self.width).with_style(self.style.stroke_style())
    }

    fn check(&self, index: usize) -> Result<(), SceneError> {
        self.from.check(index)?;
        self.to.check(index)?;

        let entity = format!("connector {index}");
        check_non_negative(&entity, "width", self.width)?;
        check_finite_point(&entity, "label offset", self.label_offset)?;
        if let Some(shrink) = self.shrink_a {
            check_non_negative(&entity, "shrink_a", shrink)?;
        }
        if let Some(shrink) = self.shrink_b {
            check_non_negative(&entity, "shrink_b", shrink)?;
        }
        if let Some(size) = self.arrow_size {
            check_positive(&entity, "arrow size", size)?;
        }
        Ok(())
    }
}

/// Free-standing text placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    position: Point,
    text: String,
    style: TextDefinition,
    anchor: TextAnchor,
}

impl Annotation {
    pub fn new(position: Point, text: &str) -> Self {
        Self {
            position,
            text: text.to_string(),
            style: TextDefinition::new(),
            anchor: TextAnchor::default(),
        }
    }

    pub fn with_style(mut self, style: TextDefinition) -> Self {
        self.style = style;
        self
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextDefinition {
        &self.style
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }
}

/// One row of a legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    color: Color,
    text: String,
}

impl LegendItem {
    pub fn new(color: Color, text: &str) -> Self {
        Self {
            color,
            text: text.to_string(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A framed box of color swatches with descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    position: Point,
    title: Option<String>,
    size: Option<Size>,
    items: Vec<LegendItem>,
}

impl Legend {
    /// Creates an empty legend with its top-left corner at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            title: None,
            size: None,
            items: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Fixes the box size instead of deriving it from the text.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_item(mut self, item: LegendItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn items(&self) -> &[LegendItem] {
        &self.items
    }

    fn check(&self, index: usize) -> Result<(), SceneError> {
        let entity = format!("legend {index}");
        check_finite_point(&entity, "position", self.position)?;
        if let Some(size) = self.size {
            check_positive(&entity, "width", size.width())?;
            check_positive(&entity, "height", size.height())?;
        }
        Ok(())
    }
}

/// A complete diagram description.
///
/// Nodes keep their insertion order, which is also the draw order among
/// nodes sharing a z-index.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    canvas: Canvas,
    nodes: IndexMap<String, Node>,
    zones: Vec<Zone>,
    connectors: Vec<Connector>,
    annotations: Vec<Annotation>,
    legends: Vec<Legend>,
    title: Option<String>,
    subtitle: Option<String>,
}

impl Scene {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            nodes: IndexMap::new(),
            zones: Vec::new(),
            connectors: Vec::new(),
            annotations: Vec::new(),
            legends: Vec::new(),
            title: None,
            subtitle: None,
        }
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// - [`SceneError::EmptyNodeId`] for an empty id
    /// - [`SceneError::DuplicateNodeId`] when the id is already taken
    /// - [`SceneError::InvalidSize`] for a non-positive size, a negative
    ///   corner radius or border width, or a non-finite position
    pub fn add_node(&mut self, node: Node) -> Result<(), SceneError> {
        node.check()?;
        if self.nodes.contains_key(node.id()) {
            return Err(SceneError::DuplicateNodeId(node.id().to_string()));
        }
        trace!(id = node.id(), shape = node.shape().name(); "Adding node");
        self.nodes.insert(node.id().to_string(), node);
        Ok(())
    }

    /// Adds a zone, drawn behind every node.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidSize`] for invalid geometry.
    pub fn add_zone(&mut self, zone: Zone) -> Result<(), SceneError> {
        zone.check(self.zones.len())?;
        self.zones.push(zone);
        Ok(())
    }

    /// Adds a connector. Node anchors are not resolved here.
    ///
    /// # Errors
    ///
    /// - [`SceneError::MalformedAnchor`] for an empty node id or non-finite
    ///   coordinates
    /// - [`SceneError::InvalidSize`] for a negative width or shrink margin,
    ///   or a non-positive arrow size
    pub fn add_connector(&mut self, connector: Connector) -> Result<(), SceneError> {
        let index = self.connectors.len();
        connector.check(index)?;
        trace!(index, from:% = connector.from(), to:% = connector.to(); "Adding connector");
        self.connectors.push(connector);
        Ok(())
    }

    /// Adds free text.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidSize`] for a non-finite position.
    pub fn add_annotation(&mut self, annotation: Annotation) -> Result<(), SceneError> {
        let entity = format!("annotation {}", self.annotations.len());
        check_finite_point(&entity, "position", annotation.position())?;
        self.annotations.push(annotation);
        Ok(())
    }

    /// Adds a legend box.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidSize`] for a non-finite position or a
    /// non-positive explicit size.
    pub fn add_legend(&mut self, legend: Legend) -> Result<(), SceneError> {
        legend.check(self.legends.len())?;
        self.legends.push(legend);
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        debug!(title; "Setting scene title");
        self.title = Some(title.to_string());
    }

    pub fn set_subtitle(&mut self, subtitle: &str) {
        self.subtitle = Some(subtitle.to_string());
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns the nodes in declaration order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn legends(&self) -> &[Legend] {
        &self.legends
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(Canvas::new(100.0, 100.0).unwrap())
    }

    #[test]
    fn test_canvas_rejects_invalid_size() {
        assert!(matches!(
            Canvas::new(0.0, 10.0),
            Err(SceneError::InvalidSize { .. })
        ));
        assert!(Canvas::new(10.0, f32::NAN).is_err());
        assert!(Canvas::new(f32::INFINITY, 10.0).is_err());
        assert!(Canvas::new(-5.0, 10.0).is_err());

        let canvas = Canvas::new(10.0, 20.0).unwrap();
        assert_eq!(canvas.background(), Color::white());
        assert_eq!(canvas.bounds().max_y(), 20.0);
    }

    #[test]
    fn test_add_node_duplicate_id() {
        let mut scene = scene();
        let node = Node::rectangle("a", Point::new(0.0, 0.0), Size::new(1.0, 1.0));
        scene.add_node(node.clone()).unwrap();

        let err = scene.add_node(node).unwrap_err();
        assert_eq!(err, SceneError::DuplicateNodeId("a".to_string()));
        assert_eq!(scene.nodes().count(), 1);
    }

    #[test]
    fn test_add_node_invalid() {
        let mut scene = scene();
        assert_eq!(
            scene.add_node(Node::rectangle("", Point::default(), Size::new(1.0, 1.0))),
            Err(SceneError::EmptyNodeId)
        );
        assert!(
            scene
                .add_node(Node::rectangle("a", Point::default(), Size::new(0.0, 1.0)))
                .is_err()
        );
        assert!(
            scene
                .add_node(Node::circle("c", Point::default(), -1.0))
                .is_err()
        );
        assert!(
            scene
                .add_node(
                    Node::rectangle("r", Point::default(), Size::new(1.0, 1.0))
                        .with_corner_radius(-2.0)
                )
                .is_err()
        );
        assert!(
            scene
                .add_node(Node::rectangle("p", Point::new(f32::NAN, 0.0), Size::new(1.0, 1.0)))
                .is_err()
        );
        assert_eq!(scene.nodes().count(), 0);
    }

    #[test]
    fn test_nodes_keep_declaration_order() {
        let mut scene = scene();
        for id in ["lb", "web1", "web2", "db"] {
            scene
                .add_node(Node::rectangle(id, Point::default(), Size::new(1.0, 1.0)))
                .unwrap();
        }
        let ids: Vec<_> = scene.nodes().map(Node::id).collect();
        assert_eq!(ids, vec!["lb", "web1", "web2", "db"]);
    }

    #[test]
    fn test_node_bounds() {
        let rect = Node::rectangle("r", Point::new(1.0, 2.0), Size::new(4.0, 6.0));
        assert_eq!(rect.bounds().min_x(), 1.0);
        assert_eq!(rect.bounds().max_y(), 8.0);
        assert_eq!(rect.center(), Point::new(3.0, 5.0));

        let circle = Node::circle("c", Point::new(10.0, 10.0), 3.0);
        assert_eq!(circle.bounds().min_x(), 7.0);
        assert_eq!(circle.bounds().max_y(), 13.0);
        assert_eq!(circle.center(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_add_connector_does_not_resolve() {
        let mut scene = scene();
        let connector = Connector::new(
            AnchorSpec::node("missing", AnchorPoint::Right),
            AnchorSpec::absolute(5.0, 5.0),
            ConnectorStyle::Directed,
        );
        assert!(scene.add_connector(connector).is_ok());
        assert_eq!(scene.connectors().len(), 1);
    }

    #[test]
    fn test_add_connector_malformed_anchor() {
        let mut scene = scene();
        let empty_id = Connector::new(
            AnchorSpec::node("", AnchorPoint::Center),
            AnchorSpec::absolute(5.0, 5.0),
            ConnectorStyle::Plain,
        );
        assert!(matches!(
            scene.add_connector(empty_id),
            Err(SceneError::MalformedAnchor { connector: 0, .. })
        ));

        let infinite = Connector::new(
            AnchorSpec::absolute(f32::INFINITY, 0.0),
            AnchorSpec::absolute(5.0, 5.0),
            ConnectorStyle::Plain,
        );
        assert!(matches!(
            scene.add_connector(infinite),
            Err(SceneError::MalformedAnchor { .. })
        ));

        let negative_shrink = Connector::new(
            AnchorSpec::absolute(0.0, 0.0),
            AnchorSpec::absolute(5.0, 5.0),
            ConnectorStyle::Plain,
        )
        .with_shrink_a(-1.0);
        assert!(matches!(
            scene.add_connector(negative_shrink),
            Err(SceneError::InvalidSize { .. })
        ));
        assert!(scene.connectors().is_empty());
    }

    #[test]
    fn test_anchor_point_from_str_aliases() {
        assert_eq!("top-center".parse::<AnchorPoint>(), Ok(AnchorPoint::Top));
        assert_eq!("center-left".parse::<AnchorPoint>(), Ok(AnchorPoint::Left));
        assert_eq!("left-center".parse::<AnchorPoint>(), Ok(AnchorPoint::Left));
        assert_eq!("right_center".parse::<AnchorPoint>(), Ok(AnchorPoint::Right));
        assert_eq!("Bottom-Right".parse::<AnchorPoint>(), Ok(AnchorPoint::BottomRight));
        assert!("middle".parse::<AnchorPoint>().is_err());

        for point in [AnchorPoint::TopLeft, AnchorPoint::Auto, AnchorPoint::Bottom] {
            assert_eq!(point.to_string().parse::<AnchorPoint>(), Ok(point));
        }
    }

    #[test]
    fn test_connector_style() {
        assert!(ConnectorStyle::Bidirected.arrow_at_source());
        assert!(ConnectorStyle::Bidirected.arrow_at_target());
        assert!(!ConnectorStyle::Directed.arrow_at_source());
        assert!(!ConnectorStyle::Plain.arrow_at_target());
        assert_eq!(ConnectorStyle::Dotted.stroke_style(), StrokeStyle::Dotted);
        assert_eq!(
            "bidirectional".parse::<ConnectorStyle>(),
            Ok(ConnectorStyle::Bidirected)
        );
        assert!("curvy".parse::<ConnectorStyle>().is_err());
    }

    #[test]
    fn test_legend_and_annotation() {
        let mut scene = scene();
        scene
            .add_legend(
                Legend::new(Point::new(5.0, 5.0))
                    .with_title("Legend")
                    .with_item(LegendItem::new(Color::new("green").unwrap(), "Primary")),
            )
            .unwrap();
        assert!(
            scene
                .add_legend(Legend::new(Point::default()).with_size(Size::new(0.0, 4.0)))
                .is_err()
        );
        scene
            .add_annotation(Annotation::new(Point::new(1.0, 1.0), "note"))
            .unwrap();
        assert_eq!(scene.legends().len(), 1);
        assert_eq!(scene.legends()[0].items().len(), 1);
        assert_eq!(scene.annotations()[0].anchor(), TextAnchor::Middle);
    }

    #[test]
    fn test_scene_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scene>();
    }
}
