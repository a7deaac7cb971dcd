//! Scene rendering.
//!
//! The [`Renderer`] validates a [`Scene`] and then walks it in a fixed order,
//! issuing [`DrawCommand`]s to a [`Surface`]:
//!
//! 1. canvas background
//! 2. zones, in declaration order
//! 3. nodes, sorted by z-index with ties kept in declaration order
//! 4. connectors, in declaration order
//! 5. annotations
//! 6. legends
//! 7. title and subtitle
//!
//! Rendering is deterministic: the same scene and configuration always
//! produce the same command sequence. The renderer performs no I/O.

use log::{debug, info, warn};
use thiserror::Error;

use infragram_core::{
    color::Color,
    draw::{
        DrawCommand, LINE_HEIGHT, RenderLayer, StrokeDefinition, Surface, TextAnchor,
        TextDefinition, estimate_text_size,
    },
    geometry::{Bounds, Point, Size},
};

use crate::{
    config::AppConfig,
    router::{RouteError, Router},
    scene::{Connector, Legend, Node, NodeShape, Scene, Zone},
    validate::{Diagnostic, has_fatal, validate},
};

const DEFAULT_FONT_SIZE: f32 = 12.0;
const CONNECTOR_LABEL_FONT_SIZE: f32 = 10.0;
const LEGEND_FONT_SIZE: f32 = 11.0;
const SUBTITLE_SCALE: f32 = 0.6;

/// Inset of a zone label from the zone's top-left corner.
const ZONE_LABEL_INSET: f32 = 8.0;

const LEGEND_PADDING: f32 = 8.0;
const LEGEND_SWATCH_GAP: f32 = 6.0;
const LEGEND_ROW_SPACING: f32 = 1.2;

/// Errors that stop a render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The scene has fatal diagnostics; nothing was drawn.
    #[error("scene failed validation: {}", summarize(.diagnostics))]
    Validation { diagnostics: Vec<Diagnostic> },

    #[error("failed to route connector {index}: {source}")]
    Route {
        index: usize,
        #[source]
        source: RouteError,
    },
}

impl RenderError {
    /// Returns the diagnostics of a validation failure.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Validation { diagnostics } => diagnostics,
            Self::Route { .. } => &[],
        }
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    let fatal: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.is_fatal())
        .map(Diagnostic::message)
        .collect();
    fatal.join("; ")
}

/// Draws scenes onto surfaces.
///
/// # Examples
///
/// ```
/// # use infragram::config::AppConfig;
/// # use infragram::render::Renderer;
/// # use infragram::scene::{Canvas, Node, Scene};
/// # use infragram::draw::{CommandKind, RecordingSurface};
/// # use infragram::geometry::{Point, Size};
/// let mut scene = Scene::new(Canvas::new(100.0, 50.0).unwrap());
/// scene
///     .add_node(Node::rectangle("db", Point::new(10.0, 10.0), Size::new(30.0, 20.0)).with_label("DB"))
///     .unwrap();
///
/// let mut surface = RecordingSurface::new();
/// let diagnostics = Renderer::new(&AppConfig::default())
///     .render(&scene, &mut surface)
///     .unwrap();
///
/// assert!(diagnostics.is_empty());
/// let kinds: Vec<_> = surface.commands().iter().map(|c| c.kind()).collect();
/// assert_eq!(kinds, vec![CommandKind::FillRect, CommandKind::StrokeRect, CommandKind::Text]);
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    router: Router,
    text_defaults: TextDefinition,
    title_font_size: f32,
    padding: f32,
}

impl Renderer {
    pub fn new(config: &AppConfig) -> Self {
        let text_defaults = TextDefinition::new()
            .with_font_family(config.style().font_family())
            .with_font_size(DEFAULT_FONT_SIZE)
            .with_color(Color::default());

        Self {
            router: Router::new(config.render()),
            text_defaults,
            title_font_size: config.render().title_font_size(),
            padding: config.render().padding(),
        }
    }

    /// Validates and draws `scene` onto `surface`.
    ///
    /// Returns the non-fatal diagnostics on success. Connectors flagged as
    /// degenerate are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Validation`] with every diagnostic when any of
    /// them is fatal. In that case `surface` receives no call at all.
    pub fn render<S: Surface + ?Sized>(
        &self,
        scene: &Scene,
        surface: &mut S,
    ) -> Result<Vec<Diagnostic>, RenderError> {
        let diagnostics = validate(scene);
        if has_fatal(&diagnostics) {
            warn!(diagnostics = diagnostics.len(); "Scene failed validation, nothing drawn");
            return Err(RenderError::Validation { diagnostics });
        }
        for diagnostic in &diagnostics {
            warn!(code = diagnostic.code(); "{}", diagnostic.message());
        }

        info!(
            nodes = scene.nodes().len(),
            zones = scene.zones().len(),
            connectors = scene.connectors().len();
            "Rendering scene"
        );

        self.draw_background(scene, surface);

        surface.begin_layer(RenderLayer::Zone);
        for zone in scene.zones() {
            self.draw_zone(zone, surface);
        }

        surface.begin_layer(RenderLayer::Node);
        let mut nodes: Vec<&Node> = scene.nodes().collect();
        // Stable sort keeps declaration order among equal z-indexes
        nodes.sort_by_key(|node| node.z_index());
        for node in nodes {
            self.draw_node(node, surface);
        }

        surface.begin_layer(RenderLayer::Connector);
        for (index, connector) in scene.connectors().iter().enumerate() {
            self.draw_connector(scene, index, connector, surface)?;
        }

        surface.begin_layer(RenderLayer::Annotation);
        for annotation in scene.annotations() {
            surface.draw(DrawCommand::Text {
                position: annotation.position(),
                content: annotation.text().to_string(),
                style: annotation.style().resolve(&self.text_defaults),
                anchor: annotation.anchor(),
            });
        }

        surface.begin_layer(RenderLayer::Legend);
        for legend in scene.legends() {
            self.draw_legend(legend, surface);
        }

        surface.begin_layer(RenderLayer::Title);
        self.draw_titles(scene, surface);

        debug!("Scene rendered");
        Ok(diagnostics)
    }

    fn draw_background<S: Surface + ?Sized>(&self, scene: &Scene, surface: &mut S) {
        surface.begin_layer(RenderLayer::Background);
        surface.draw(DrawCommand::FillRect {
            bounds: scene.canvas().bounds(),
            color: scene.canvas().background(),
            corner_radius: 0.0,
        });
    }

    fn draw_box<S: Surface + ?Sized>(
        bounds: Bounds,
        fill: Option<Color>,
        border: &StrokeDefinition,
        corner_radius: f32,
        surface: &mut S,
    ) {
        if let Some(color) = fill {
            surface.draw(DrawCommand::FillRect {
                bounds,
                color,
                corner_radius,
            });
        }
        if border.width() > 0.0 {
            surface.draw(DrawCommand::StrokeRect {
                bounds,
                stroke: border.clone(),
                corner_radius,
            });
        }
    }

    fn draw_zone<S: Surface + ?Sized>(&self, zone: &Zone, surface: &mut S) {
        let bounds = zone.bounds();
        Self::draw_box(bounds, zone.fill(), zone.border(), zone.corner_radius(), surface);

        if let Some(label) = zone.label() {
            let style = zone.label_style().resolve(&self.text_defaults);
            let text_size = estimate_text_size(label, &style);
            surface.draw(DrawCommand::Text {
                position: Point::new(
                    bounds.min_x() + ZONE_LABEL_INSET,
                    bounds.min_y() + ZONE_LABEL_INSET + text_size.height() / 2.0,
                ),
                content: label.to_string(),
                style,
                anchor: TextAnchor::Start,
            });
        }
    }

    fn draw_node<S: Surface + ?Sized>(&self, node: &Node, surface: &mut S) {
        match node.shape() {
            NodeShape::Rectangle { .. } => Self::draw_box(
                node.bounds(),
                node.fill(),
                node.border(),
                node.corner_radius(),
                surface,
            ),
            NodeShape::Circle { radius } => {
                let center = node.center();
                if let Some(color) = node.fill() {
                    surface.draw(DrawCommand::FillCircle {
                        center,
                        radius,
                        color,
                    });
                }
                if node.border().width() > 0.0 {
                    surface.draw(DrawCommand::StrokeCircle {
                        center,
                        radius,
                        stroke: node.border().clone(),
                    });
                }
            }
        }

        if let Some(label) = node.label() {
            surface.draw(DrawCommand::Text {
                position: node.center(),
                content: label.to_string(),
                style: node.label_style().resolve(&self.text_defaults),
                anchor: TextAnchor::Middle,
            });
        }
    }

    fn draw_connector<S: Surface + ?Sized>(
        &self,
        scene: &Scene,
        index: usize,
        connector: &Connector,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let path = match self.router.route(scene, connector) {
            Ok(path) => path,
            Err(RouteError::Degenerate { .. }) => {
                debug!(index; "Skipping degenerate connector");
                return Ok(());
            }
            Err(source) => return Err(RenderError::Route { index, source }),
        };

        let (from, to) = path.line();
        surface.draw(DrawCommand::StrokeLine {
            from,
            to,
            stroke: connector.stroke(),
        });

        for head in path.arrowheads() {
            surface.draw(DrawCommand::Arrowhead {
                head: *head,
                color: connector.color(),
            });
        }

        if let Some(label) = connector.label() {
            let defaults = self
                .text_defaults
                .clone()
                .with_font_size(CONNECTOR_LABEL_FONT_SIZE);
            surface.draw(DrawCommand::Text {
                position: path.label_position(),
                content: label.to_string(),
                style: connector.label_style().resolve(&defaults),
                anchor: TextAnchor::Middle,
            });
        }

        Ok(())
    }

    fn draw_legend<S: Surface + ?Sized>(&self, legend: &Legend, surface: &mut S) {
        let item_style = self.text_defaults.clone().with_font_size(LEGEND_FONT_SIZE);
        let title_style = item_style.clone().with_bold(true);
        let layout = LegendLayout::new(legend, &item_style, &title_style);
        let origin = legend.position();

        Self::draw_box(
            layout.frame,
            Some(Color::white()),
            &StrokeDefinition::new(Color::new("gray").unwrap_or_default(), 1.0),
            4.0,
            surface,
        );

        if let Some(title) = legend.title() {
            surface.draw(DrawCommand::Text {
                position: Point::new(
                    origin.x() + LEGEND_PADDING,
                    origin.y() + LEGEND_PADDING + layout.title_height / 2.0,
                ),
                content: title.to_string(),
                style: title_style.clone(),
                anchor: TextAnchor::Start,
            });
        }

        for (row, item) in legend.items().iter().enumerate() {
            let center_y = origin.y()
                + LEGEND_PADDING
                + layout.title_height
                + layout.row_height * (row as f32 + 0.5);
            let swatch_top_left = Point::new(
                origin.x() + LEGEND_PADDING,
                center_y - layout.swatch / 2.0,
            );
            surface.draw(DrawCommand::FillRect {
                bounds: Bounds::new_from_top_left(
                    swatch_top_left,
                    Size::new(layout.swatch, layout.swatch),
                ),
                color: item.color(),
                corner_radius: 0.0,
            });
            surface.draw(DrawCommand::Text {
                position: Point::new(
                    swatch_top_left.x() + layout.swatch + LEGEND_SWATCH_GAP,
                    center_y,
                ),
                content: item.text().to_string(),
                style: item_style.clone(),
                anchor: TextAnchor::Start,
            });
        }
    }

    fn draw_titles<S: Surface + ?Sized>(&self, scene: &Scene, surface: &mut S) {
        let center_x = scene.canvas().width() / 2.0;
        let mut top = self.padding;

        if let Some(title) = scene.title() {
            let style = self
                .text_defaults
                .clone()
                .with_font_size(self.title_font_size)
                .with_bold(true);
            let height = estimate_text_size(title, &style).height();
            surface.draw(DrawCommand::Text {
                position: Point::new(center_x, top + height / 2.0),
                content: title.to_string(),
                style,
                anchor: TextAnchor::Middle,
            });
            top += height + self.title_font_size * 0.25;
        }

        if let Some(subtitle) = scene.subtitle() {
            let style = self
                .text_defaults
                .clone()
                .with_font_size(self.title_font_size * SUBTITLE_SCALE)
                .with_italic(true);
            let height = estimate_text_size(subtitle, &style).height();
            surface.draw(DrawCommand::Text {
                position: Point::new(center_x, top + height / 2.0),
                content: subtitle.to_string(),
                style,
                anchor: TextAnchor::Middle,
            });
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

/// Box metrics of a legend.
struct LegendLayout {
    frame: Bounds,
    title_height: f32,
    row_height: f32,
    swatch: f32,
}

impl LegendLayout {
    fn new(legend: &Legend, item_style: &TextDefinition, title_style: &TextDefinition) -> Self {
        let font_size = item_style.font_size().unwrap_or(DEFAULT_FONT_SIZE);
        let swatch = font_size;
        let row_height = font_size * LINE_HEIGHT * LEGEND_ROW_SPACING;

        let title_size = legend
            .title()
            .map(|title| estimate_text_size(title, title_style))
            .unwrap_or_default();
        let title_height = if legend.title().is_some() {
            title_size.height() + LEGEND_PADDING / 2.0
        } else {
            0.0
        };

        let size = legend.size().unwrap_or_else(|| {
            let widest_item = legend
                .items()
                .iter()
                .map(|item| estimate_text_size(item.text(), item_style).width())
                .fold(0.0f32, f32::max);
            let content_width = title_size
                .width()
                .max(swatch + LEGEND_SWATCH_GAP + widest_item);
            Size::new(
                content_width + LEGEND_PADDING * 2.0,
                title_height + row_height * legend.items().len() as f32 + LEGEND_PADDING * 2.0,
            )
        });

        Self {
            frame: Bounds::new_from_top_left(legend.position(), size),
            title_height,
            row_height,
            swatch,
        }
    }
}
