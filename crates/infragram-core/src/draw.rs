//! Drawing vocabulary shared by the renderer and every output surface.
//!
//! The renderer turns a scene into a sequence of [`DrawCommand`]s and hands
//! them to a [`Surface`]. Styles ([`StrokeDefinition`], [`TextDefinition`])
//! are fully resolved by the time a command is issued.
mod command;
mod layer;
mod stroke;
mod surface;
mod text;

pub use command::{Arrowhead, CommandKind, DrawCommand};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use surface::{RecordingSurface, Surface};
pub use text::{LINE_HEIGHT, TextAnchor, TextDefinition, estimate_text_size};
