//! SVG export.
//!
//! [`SvgSurface`] turns draw commands into SVG elements, grouped per render
//! layer. The document's `viewBox` is the canvas, so all coordinates stay in
//! canvas units; `width`/`height` carry the output scale.

use log::{debug, trace};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use infragram_core::{
    apply_stroke,
    color::Color,
    draw::{
        Arrowhead, DrawCommand, LINE_HEIGHT, LayeredOutput, RenderLayer, Surface, SvgNode,
        TextAnchor, TextDefinition,
    },
    geometry::{Bounds, Point, Size},
};

const FALLBACK_FONT_FAMILY: &str = "sans-serif";
const FALLBACK_FONT_SIZE: f32 = 12.0;

macro_rules! filled {
    ($element:expr, $color:expr) => {{
        let color = $color;
        Box::new(
            $element
                .set("fill", color.to_opaque_string())
                .set("fill-opacity", color.alpha())
                .set("stroke", "none"),
        ) as SvgNode
    }};
}

macro_rules! outlined {
    ($element:expr, $stroke:expr) => {
        Box::new(apply_stroke!($element.set("fill", "none"), $stroke)) as SvgNode
    };
}

/// A [`Surface`] that builds an SVG document.
///
/// # Examples
///
/// ```
/// # use infragram::draw::{DrawCommand, Surface};
/// # use infragram::color::Color;
/// # use infragram::export::svg::SvgSurface;
/// # use infragram_core::geometry::{Point, Size};
/// let mut surface = SvgSurface::new(Size::new(100.0, 50.0), 2.0);
/// surface.draw(DrawCommand::FillCircle {
///     center: Point::new(50.0, 25.0),
///     radius: 10.0,
///     color: Color::new("red").unwrap(),
/// });
/// let svg = surface.into_string();
/// assert!(svg.contains("viewBox=\"0 0 100 50\""));
/// assert!(svg.contains("width=\"200\""));
/// assert!(svg.contains("<circle"));
/// ```
#[derive(Debug)]
pub struct SvgSurface {
    size: Size,
    scale: f32,
    layer: RenderLayer,
    output: LayeredOutput,
}

impl SvgSurface {
    /// Creates an empty surface for a canvas of `size` rendered at `scale`
    /// output pixels per canvas unit.
    pub fn new(size: Size, scale: f32) -> Self {
        Self {
            size,
            scale,
            layer: RenderLayer::Background,
            output: LayeredOutput::new(),
        }
    }

    /// Finishes the document.
    pub fn into_document(self) -> Document {
        let output_size = self.size.scale(self.scale);
        debug!(
            width = output_size.width(),
            height = output_size.height(),
            elements = self.output.len();
            "Building SVG document"
        );

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", self.size.width(), self.size.height()),
            )
            .set("width", output_size.width())
            .set("height", output_size.height());

        for group in self.output.render() {
            doc = doc.add(group);
        }
        doc
    }

    /// Finishes the document and serializes it.
    pub fn into_string(self) -> String {
        self.into_document().to_string()
    }
}

impl Surface for SvgSurface {
    fn begin_layer(&mut self, layer: RenderLayer) {
        self.layer = layer;
    }

    fn draw(&mut self, command: DrawCommand) {
        trace!(kind:% = command.kind(), layer = self.layer.name(); "SVG element");
        let node: SvgNode = match command {
            DrawCommand::FillRect {
                bounds,
                color,
                corner_radius,
            } => filled!(rectangle(bounds, corner_radius), color),
            DrawCommand::StrokeRect {
                bounds,
                stroke,
                corner_radius,
            } => outlined!(rectangle(bounds, corner_radius), &stroke),
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => filled!(circle(center, radius), color),
            DrawCommand::StrokeCircle {
                center,
                radius,
                stroke,
            } => outlined!(circle(center, radius), &stroke),
            DrawCommand::StrokeLine { from, to, stroke } => {
                let line = svg_element::Line::new()
                    .set("x1", from.x())
                    .set("y1", from.y())
                    .set("x2", to.x())
                    .set("y2", to.y());
                Box::new(apply_stroke!(line, &stroke))
            }
            DrawCommand::Arrowhead { head, color } => arrowhead(&head, color),
            DrawCommand::Text {
                position,
                content,
                style,
                anchor,
            } => text(position, &content, &style, anchor),
        };
        self.output.add_to_layer(self.layer, node);
    }
}

fn rectangle(bounds: Bounds, corner_radius: f32) -> svg_element::Rectangle {
    let rect = svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height());
    if corner_radius > 0.0 {
        rect.set("rx", corner_radius).set("ry", corner_radius)
    } else {
        rect
    }
}

fn circle(center: Point, radius: f32) -> svg_element::Circle {
    svg_element::Circle::new()
        .set("cx", center.x())
        .set("cy", center.y())
        .set("r", radius)
}

fn arrowhead(head: &Arrowhead, color: Color) -> SvgNode {
    let points: Vec<String> = head
        .points()
        .iter()
        .map(|point| format!("{},{}", point.x(), point.y()))
        .collect();
    Box::new(
        svg_element::Polygon::new()
            .set("points", points.join(" "))
            .set("fill", color.to_opaque_string())
            .set("fill-opacity", color.alpha())
            .set("stroke", "none"),
    )
}

fn text(position: Point, content: &str, style: &TextDefinition, anchor: TextAnchor) -> SvgNode {
    let font_size = style.font_size().unwrap_or(FALLBACK_FONT_SIZE);
    let line_height = font_size * LINE_HEIGHT;
    let lines: Vec<&str> = content.lines().collect();

    // The block is vertically centered on `position`
    let total_height = line_height * lines.len() as f32;
    let y_offset = -(total_height + line_height) / 2.0;

    let mut element = svg_element::Text::new("")
        .set("x", position.x())
        .set("y", position.y() + y_offset)
        .set("text-anchor", anchor.to_svg_value())
        .set("dominant-baseline", "central")
        .set(
            "font-family",
            style.font_family().unwrap_or(FALLBACK_FONT_FAMILY),
        )
        .set("font-size", font_size);

    if style.bold() {
        element = element.set("font-weight", "bold");
    }
    if style.italic() {
        element = element.set("font-style", "italic");
    }
    if let Some(color) = style.color() {
        element = element
            .set("fill", color.to_opaque_string())
            .set("fill-opacity", color.alpha());
    }

    for line in lines {
        let tspan = svg_element::TSpan::new("")
            .set("x", position.x())
            .set("dy", line_height)
            .add(SvgText::new(line));
        element = element.add(tspan);
    }

    Box::new(element)
}
