//! Connector routing.
//!
//! Turns a [`Connector`] into concrete geometry: resolved endpoints, the
//! visible line segment after shrinking, arrowheads and the label position.
//! Connectors are always straight; there is no obstacle avoidance.
//!
//! Anchors are resolved in two steps. First each end gets a *reference
//! point*: the absolute coordinate, the named boundary point, or the node
//! center for [`AnchorPoint::Auto`]. Then every `auto` end is replaced by the
//! boundary point its node presents toward the other end's reference point.

use log::trace;
use thiserror::Error;

use infragram_core::{
    draw::Arrowhead,
    geometry::{Point, Size},
};

use crate::{
    config::RenderConfig,
    scene::{AnchorPoint, AnchorSpec, Connector, ConnectorStyle, Node, NodeShape, Scene},
};

/// Arrowhead width as a fraction of its length.
const ARROW_WIDTH_RATIO: f32 = 0.8;

/// Share of the segment length that always stays visible after shrinking.
const MIN_VISIBLE_FRACTION: f32 = 0.1;

/// Errors raised while routing a connector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("anchor references unknown node `{node_id}`")]
    UnresolvedAnchor { node_id: String },

    #[error("connector endpoints coincide at ({x}, {y})")]
    Degenerate { x: f32, y: f32 },
}

/// The geometry of one routed connector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    start: Point,
    end: Point,
    line_start: Point,
    line_end: Point,
    arrowheads: Vec<Arrowhead>,
    label_position: Point,
}

impl ConnectorPath {
    /// Returns the visible start point, after shrinking.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Returns the visible end point, after shrinking.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Returns the stroked segment.
    ///
    /// Ends carrying an arrowhead are pulled back under the head so wide
    /// strokes do not show past the tip.
    pub fn line(&self) -> (Point, Point) {
        (self.line_start, self.line_end)
    }

    /// Returns the arrowheads, source end first.
    pub fn arrowheads(&self) -> &[Arrowhead] {
        &self.arrowheads
    }

    pub fn label_position(&self) -> Point {
        self.label_position
    }

    /// Returns the unit direction from start to end.
    pub fn direction(&self) -> Option<Point> {
        self.end.sub_point(self.start).normalize()
    }

    fn offset_label(mut self, offset: Point) -> Self {
        self.label_position = self.label_position.add_point(offset);
        self
    }
}

/// Returns the point of `node` named by `at`.
///
/// `toward` is only used for [`AnchorPoint::Auto`], which yields the boundary
/// point on the ray from the node center toward `toward`.
///
/// # Examples
///
/// ```
/// # use infragram::router::anchor_on_node;
/// # use infragram::scene::{AnchorPoint, Node};
/// # use infragram::geometry::{Point, Size};
/// let node = Node::rectangle("a", Point::new(0.0, 0.0), Size::new(2.0, 1.0));
/// let top = anchor_on_node(&node, AnchorPoint::Top, Point::default());
/// assert_eq!(top, Point::new(1.0, 0.0));
///
/// let auto = anchor_on_node(&node, AnchorPoint::Auto, Point::new(10.0, 0.5));
/// assert_eq!(auto, Point::new(2.0, 0.5));
/// ```
pub fn anchor_on_node(node: &Node, at: AnchorPoint, toward: Point) -> Point {
    let center = node.center();
    match (node.shape(), at.unit_offset()) {
        (NodeShape::Rectangle { width, height }, Some((ux, uy))) => {
            center.add_point(Point::new(ux * width / 2.0, uy * height / 2.0))
        }
        (NodeShape::Rectangle { width, height }, None) => {
            find_rectangle_intersection(center, toward, Size::new(width, height))
        }
        (NodeShape::Circle { radius }, Some((ux, uy))) => match Point::new(ux, uy).normalize() {
            Some(direction) => center.add_point(direction.scale(radius)),
            None => center,
        },
        (NodeShape::Circle { radius }, None) => {
            find_circle_intersection(center, toward, radius)
        }
    }
}

/// Finds where the ray from the rectangle center `a` toward `b` leaves a
/// rectangle of `a_size`.
///
/// Returns `a` when `b` coincides with it.
fn find_rectangle_intersection(a: Point, b: Point, a_size: Size) -> Point {
    let half_width = a_size.width() / 2.0;
    let half_height = a_size.height() / 2.0;

    let Some(dir) = b.sub_point(a).normalize() else {
        return a;
    };

    // Distance along the ray to the nearest horizontal and vertical edges
    let t_horizontal = if dir.y().abs() > f32::EPSILON {
        half_height / dir.y().abs()
    } else {
        f32::MAX
    };
    let t_vertical = if dir.x().abs() > f32::EPSILON {
        half_width / dir.x().abs()
    } else {
        f32::MAX
    };

    a.add_point(dir.scale(t_horizontal.min(t_vertical)))
}

/// Finds where the ray from the circle center `a` toward `b` crosses the
/// circle.
fn find_circle_intersection(a: Point, b: Point, radius: f32) -> Point {
    match b.sub_point(a).normalize() {
        Some(dir) => a.add_point(dir.scale(radius)),
        None => a,
    }
}

fn lookup<'a>(scene: &'a Scene, id: &str) -> Result<&'a Node, RouteError> {
    scene.node(id).ok_or_else(|| RouteError::UnresolvedAnchor {
        node_id: id.to_string(),
    })
}

fn reference_point(scene: &Scene, spec: &AnchorSpec) -> Result<Point, RouteError> {
    match spec {
        AnchorSpec::Absolute(point) => Ok(*point),
        AnchorSpec::Node { id, at } => {
            let node = lookup(scene, id)?;
            Ok(match at {
                AnchorPoint::Auto => node.center(),
                _ => anchor_on_node(node, *at, node.center()),
            })
        }
    }
}

fn resolve_against(scene: &Scene, spec: &AnchorSpec, toward: Point) -> Result<Point, RouteError> {
    match spec {
        AnchorSpec::Absolute(point) => Ok(*point),
        AnchorSpec::Node { id, at } => Ok(anchor_on_node(lookup(scene, id)?, *at, toward)),
    }
}

/// Resolves both anchors of `connector` to canvas coordinates.
///
/// # Errors
///
/// Returns [`RouteError::UnresolvedAnchor`] for the first anchor naming a
/// node missing from `scene`.
pub fn resolve_endpoints(scene: &Scene, connector: &Connector) -> Result<(Point, Point), RouteError> {
    let from_reference = reference_point(scene, connector.from())?;
    let to_reference = reference_point(scene, connector.to())?;

    let from = resolve_against(scene, connector.from(), to_reference)?;
    let to = resolve_against(scene, connector.to(), from_reference)?;
    Ok((from, to))
}

/// Length and width of the arrowheads of one connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowSize {
    length: f32,
    width: f32,
}

impl ArrowSize {
    /// Creates an arrow size with the default width for `length`.
    pub fn new(length: f32) -> Self {
        Self {
            length,
            width: length * ARROW_WIDTH_RATIO,
        }
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    fn clamped_to(self, max_length: f32) -> Self {
        if self.length <= max_length {
            return self;
        }
        let ratio = max_length / self.length;
        Self {
            length: max_length,
            width: self.width * ratio,
        }
    }
}

/// Routes a straight connector between two resolved points.
///
/// Both ends are pulled inward by `shrink_a` and `shrink_b`. When the two
/// margins together would leave less than a tenth of the segment, they are
/// scaled down proportionally. Arrowheads never grow longer than the visible
/// segment (half of it for bidirected connectors).
///
/// # Errors
///
/// Returns [`RouteError::Degenerate`] when `from` and `to` coincide.
///
/// # Examples
///
/// ```
/// # use infragram::router::{route_points, ArrowSize};
/// # use infragram::scene::ConnectorStyle;
/// # use infragram::geometry::Point;
/// let path = route_points(
///     Point::new(0.0, 0.0),
///     Point::new(100.0, 0.0),
///     ConnectorStyle::Directed,
///     5.0,
///     5.0,
///     ArrowSize::new(10.0),
/// )
/// .unwrap();
///
/// assert_eq!(path.start(), Point::new(5.0, 0.0));
/// assert_eq!(path.end(), Point::new(95.0, 0.0));
/// assert_eq!(path.arrowheads().len(), 1);
/// assert_eq!(path.arrowheads()[0].tip(), Point::new(95.0, 0.0));
/// ```
pub fn route_points(
    from: Point,
    to: Point,
    style: ConnectorStyle,
    shrink_a: f32,
    shrink_b: f32,
    arrow_size: ArrowSize,
) -> Result<ConnectorPath, RouteError> {
    let delta = to.sub_point(from);
    let length = delta.hypot();
    let Some(direction) = delta.normalize() else {
        return Err(RouteError::Degenerate {
            x: from.x(),
            y: from.y(),
        });
    };

    let (shrink_a, shrink_b) = fit_margins(shrink_a.max(0.0), shrink_b.max(0.0), length);
    let start = from.add_point(direction.scale(shrink_a));
    let end = to.sub_point(direction.scale(shrink_b));
    let visible = start.distance(end);

    let heads = usize::from(style.arrow_at_source()) + usize::from(style.arrow_at_target());
    let arrow_size = if heads > 0 {
        arrow_size.clamped_to(visible / heads as f32)
    } else {
        arrow_size
    };
    // Pull the stroke back to the middle of the head
    let tuck = arrow_size.length() / 2.0;

    let mut arrowheads = Vec::with_capacity(heads);
    let mut line_start = start;
    let mut line_end = end;

    if style.arrow_at_source() {
        arrowheads.push(Arrowhead::new(
            start,
            direction.scale(-1.0),
            arrow_size.length(),
            arrow_size.width(),
        ));
        line_start = start.add_point(direction.scale(tuck));
    }
    if style.arrow_at_target() {
        arrowheads.push(Arrowhead::new(
            end,
            direction,
            arrow_size.length(),
            arrow_size.width(),
        ));
        line_end = end.sub_point(direction.scale(tuck));
    }

    Ok(ConnectorPath {
        start,
        end,
        line_start,
        line_end,
        arrowheads,
        label_position: start.midpoint(end),
    })
}

/// Scales both margins down so at least `MIN_VISIBLE_FRACTION` of `length`
/// remains between them.
fn fit_margins(shrink_a: f32, shrink_b: f32, length: f32) -> (f32, f32) {
    let total = shrink_a + shrink_b;
    let budget = length * (1.0 - MIN_VISIBLE_FRACTION);
    if total <= budget || total <= 0.0 {
        return (shrink_a, shrink_b);
    }
    let factor = budget / total;
    (shrink_a * factor, shrink_b * factor)
}

/// Routes connectors of a scene with defaults taken from [`RenderConfig`].
#[derive(Debug, Clone)]
pub struct Router {
    shrink_factor: f32,
    arrow_base: f32,
    arrow_per_width: f32,
}

impl Router {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            shrink_factor: config.shrink_factor(),
            arrow_base: config.arrow_base(),
            arrow_per_width: config.arrow_per_width(),
        }
    }

    /// Returns the margin used for `spec` when the connector sets none.
    ///
    /// Node anchors keep clear of the node border; absolute anchors are
    /// used as given.
    fn default_shrink(&self, scene: &Scene, spec: &AnchorSpec) -> f32 {
        spec.node_id()
            .and_then(|id| scene.node(id))
            .map(|node| node.border().width() * self.shrink_factor)
            .unwrap_or(0.0)
    }

    /// Returns the arrow size for `connector`.
    pub fn arrow_size(&self, connector: &Connector) -> ArrowSize {
        let length = connector
            .arrow_size()
            .unwrap_or_else(|| self.arrow_per_width.mul_add(connector.width(), self.arrow_base));
        ArrowSize::new(length)
    }

    /// Routes one connector of `scene`.
    ///
    /// # Errors
    ///
    /// - [`RouteError::UnresolvedAnchor`] when an anchor names a missing node
    /// - [`RouteError::Degenerate`] when both ends resolve to the same point
    pub fn route(&self, scene: &Scene, connector: &Connector) -> Result<ConnectorPath, RouteError> {
        let (from, to) = resolve_endpoints(scene, connector)?;

        let shrink_a = connector
            .shrink_a()
            .unwrap_or_else(|| self.default_shrink(scene, connector.from()));
        let shrink_b = connector
            .shrink_b()
            .unwrap_or_else(|| self.default_shrink(scene, connector.to()));

        let path = route_points(
            from,
            to,
            connector.style(),
            shrink_a,
            shrink_b,
            self.arrow_size(connector),
        )?
        .offset_label(connector.label_offset());

        trace!(
            from:% = connector.from(),
            to:% = connector.to(),
            arrowheads = path.arrowheads().len();
            "Routed connector"
        );

        Ok(path)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #[test]
        fn auto_anchor_lies_on_rectangle_boundary(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            width in 1.0f32..200.0,
            height in 1.0f32..200.0,
            toward in point_strategy(),
        ) {
            let node = Node::rectangle("n", Point::new(x, y), Size::new(width, height));
            prop_assume!(toward.distance(node.center()) > 0.01);

            let p = anchor_on_node(&node, AnchorPoint::Auto, toward);
            let bounds = node.bounds();
            let tol = 0.01;
            let on_vertical = (p.x() - bounds.min_x()).abs() < tol || (p.x() - bounds.max_x()).abs() < tol;
            let on_horizontal = (p.y() - bounds.min_y()).abs() < tol || (p.y() - bounds.max_y()).abs() < tol;
            prop_assert!(on_vertical || on_horizontal);
            prop_assert!(p.x() >= bounds.min_x() - tol && p.x() <= bounds.max_x() + tol);
            prop_assert!(p.y() >= bounds.min_y() - tol && p.y() <= bounds.max_y() + tol);
        }

        #[test]
        fn shrunk_segment_stays_within_original(
            from in point_strategy(),
            to in point_strategy(),
            shrink_a in 0.0f32..1000.0,
            shrink_b in 0.0f32..1000.0,
        ) {
            let length = from.distance(to);
            prop_assume!(length > 0.1);

            let path = route_points(from, to, ConnectorStyle::Plain, shrink_a, shrink_b, ArrowSize::new(4.0)).unwrap();
            let visible = path.start().distance(path.end());
            prop_assert!(visible >= length * MIN_VISIBLE_FRACTION * 0.99);
            prop_assert!(from.distance(path.start()) <= length);
            prop_assert!(to.distance(path.end()) <= length);
        }
    }
}
