//! Abstract drawing commands.
//!
//! A [`DrawCommand`] is the unit of output of the renderer. Commands carry
//! fully resolved geometry and style, so a surface never needs to look back
//! into the scene to draw them.

use std::fmt;

use crate::{
    color::Color,
    draw::{StrokeDefinition, TextAnchor, TextDefinition},
    geometry::{Bounds, Point},
};

/// A filled triangular arrowhead.
///
/// The tip sits on the target point of a connector; the base is centered
/// `length` units behind it along `-direction` and is `width` units wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    tip: Point,
    direction: Point,
    length: f32,
    width: f32,
}

impl Arrowhead {
    /// Creates an arrowhead. `direction` must be a unit vector pointing from
    /// the base toward the tip.
    pub fn new(tip: Point, direction: Point, length: f32, width: f32) -> Self {
        Self {
            tip,
            direction,
            length,
            width,
        }
    }

    pub fn tip(&self) -> Point {
        self.tip
    }

    pub fn direction(&self) -> Point {
        self.direction
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the triangle as `[tip, left corner, right corner]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use infragram_core::draw::Arrowhead;
    /// # use infragram_core::geometry::Point;
    /// let head = Arrowhead::new(Point::new(10.0, 0.0), Point::new(1.0, 0.0), 4.0, 2.0);
    /// let [tip, left, right] = head.points();
    /// assert_eq!(tip, Point::new(10.0, 0.0));
    /// assert_eq!(left.x(), 6.0);
    /// assert_eq!(right.x(), 6.0);
    /// assert_eq!((left.y() - right.y()).abs(), 2.0);
    /// ```
    pub fn points(&self) -> [Point; 3] {
        let base = self.tip.sub_point(self.direction.scale(self.length));
        let half = self.direction.perpendicular().scale(self.width / 2.0);
        [self.tip, base.add_point(half), base.sub_point(half)]
    }
}

/// One primitive drawing operation, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle, optionally with rounded corners.
    FillRect {
        bounds: Bounds,
        color: Color,
        corner_radius: f32,
    },
    /// Rectangle outline.
    StrokeRect {
        bounds: Bounds,
        stroke: StrokeDefinition,
        corner_radius: f32,
    },
    /// Filled circle.
    FillCircle {
        center: Point,
        radius: f32,
        color: Color,
    },
    /// Circle outline.
    StrokeCircle {
        center: Point,
        radius: f32,
        stroke: StrokeDefinition,
    },
    /// Straight line segment.
    StrokeLine {
        from: Point,
        to: Point,
        stroke: StrokeDefinition,
    },
    /// Filled arrowhead triangle.
    Arrowhead { head: Arrowhead, color: Color },
    /// Text block. `position` is the horizontal anchor and the vertical
    /// center of the block; lines are separated by `\n`.
    Text {
        position: Point,
        content: String,
        style: TextDefinition,
        anchor: TextAnchor,
    },
}

impl DrawCommand {
    /// Returns the kind of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::FillRect { .. } => CommandKind::FillRect,
            Self::StrokeRect { .. } => CommandKind::StrokeRect,
            Self::FillCircle { .. } => CommandKind::FillCircle,
            Self::StrokeCircle { .. } => CommandKind::StrokeCircle,
            Self::StrokeLine { .. } => CommandKind::StrokeLine,
            Self::Arrowhead { .. } => CommandKind::Arrowhead,
            Self::Text { .. } => CommandKind::Text,
        }
    }
}

/// Discriminant of a [`DrawCommand`], handy for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    FillRect,
    StrokeRect,
    FillCircle,
    StrokeCircle,
    StrokeLine,
    Arrowhead,
    Text,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FillRect => "fill-rect",
            Self::StrokeRect => "stroke-rect",
            Self::FillCircle => "fill-circle",
            Self::StrokeCircle => "stroke-circle",
            Self::StrokeLine => "stroke-line",
            Self::Arrowhead => "arrowhead",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}
