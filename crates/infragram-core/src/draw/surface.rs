//! Drawing surfaces.
//!
//! A [`Surface`] consumes [`DrawCommand`]s in order. Surfaces are owned by
//! the caller; the renderer only borrows one for the duration of a render.

use log::trace;

use crate::draw::{DrawCommand, RenderLayer};

/// A sink for draw commands.
pub trait Surface {
    /// Called before the commands of a new layer are issued.
    ///
    /// Surfaces that do not group output can ignore this.
    fn begin_layer(&mut self, _layer: RenderLayer) {}

    /// Draws a single command.
    fn draw(&mut self, command: DrawCommand);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn begin_layer(&mut self, layer: RenderLayer) {
        (**self).begin_layer(layer);
    }

    fn draw(&mut self, command: DrawCommand) {
        (**self).draw(command);
    }
}

/// A surface that records every command it receives.
///
/// Used to inspect render output without producing an image.
///
/// # Examples
///
/// ```
/// # use infragram_core::draw::{DrawCommand, RecordingSurface, Surface};
/// # use infragram_core::geometry::{Bounds, Point, Size};
/// # use infragram_core::color::Color;
/// let mut surface = RecordingSurface::new();
/// surface.draw(DrawCommand::FillRect {
///     bounds: Bounds::new_from_top_left(Point::default(), Size::new(10.0, 10.0)),
///     color: Color::white(),
///     corner_radius: 0.0,
/// });
/// assert_eq!(surface.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    layers: Vec<(RenderLayer, usize)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded commands in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns each announced layer with the index of its first command.
    pub fn layers(&self) -> &[(RenderLayer, usize)] {
        &self.layers
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn begin_layer(&mut self, layer: RenderLayer) {
        self.layers.push((layer, self.commands.len()));
    }

    fn draw(&mut self, command: DrawCommand) {
        trace!(kind:% = command.kind(), index = self.commands.len(); "Recording draw command");
        self.commands.push(command);
    }
}
