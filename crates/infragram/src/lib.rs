//! Infragram - declarative layout and rendering for infrastructure diagrams.
//!
//! A diagram is a [`Scene`](scene::Scene): a fixed-size canvas holding nodes
//! at explicit coordinates, background zones, connectors between node anchor
//! points, free text annotations, legends and a title. Scenes are built in
//! code or loaded from TOML/JSON [documents](document), checked by the
//! [validator](validate), and drawn by the [renderer](render) onto a
//! [`Surface`](draw::Surface). The [export](export) backends turn the
//! resulting draw commands into SVG or PNG.
//!
//! There is no automatic layout: every position comes from the scene.

pub mod config;
pub mod document;
pub mod export;
pub mod render;
pub mod router;
pub mod scene;
pub mod validate;

mod error;

pub use infragram_core::{color, draw, geometry};

pub use error::InfragramError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use config::AppConfig;
use document::{DocumentFormat, SceneDocument};
use draw::{DrawCommand, RecordingSurface};
use export::{OutputFormat, svg::SvgSurface};
use render::Renderer;
use scene::Scene;
use validate::Diagnostic;

/// Output of a successful render together with the non-fatal diagnostics
/// the validator reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<T> {
    output: T,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Rendered<T> {
    pub fn output(&self) -> &T {
        &self.output
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_output(self) -> T {
        self.output
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.output, self.diagnostics)
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Rendered<U> {
        Rendered {
            output: f(self.output),
            diagnostics: self.diagnostics,
        }
    }
}

/// Builder for loading, checking and rendering Infragram scenes.
///
/// # Examples
///
/// ```
/// use infragram::{DiagramBuilder, config::AppConfig};
/// use infragram::document::DocumentFormat;
///
/// let source = r#"
///     [canvas]
///     width = 200
///     height = 100
///
///     [[nodes]]
///     id = "web"
///     x = 20
///     y = 20
///     width = 60
///     height = 40
///     label = "Web"
/// "#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let scene = builder.parse_document(source, DocumentFormat::Toml).unwrap();
/// let rendered = builder.render_svg(&scene).unwrap();
///
/// assert!(rendered.output().starts_with("<svg"));
/// assert!(rendered.diagnostics().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Creates a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder renders with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses a scene document.
    ///
    /// Documents without a canvas background take the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Document`] for syntax errors and invalid
    /// values, and [`InfragramError::Config`] if the configured background
    /// is not a color.
    pub fn parse_document(
        &self,
        source: &str,
        format: DocumentFormat,
    ) -> Result<Scene, InfragramError> {
        info!(format:?; "Parsing scene document");

        let mut document = SceneDocument::parse(source, format)?;
        if document.canvas.background.is_none() {
            let background = self
                .config
                .style()
                .background_color()
                .map_err(InfragramError::Config)?;
            document.canvas.background = background.map(|color| color.to_opaque_string());
        }

        let scene = document.into_scene()?;
        debug!(
            nodes = scene.nodes().len(),
            zones = scene.zones().len(),
            connectors = scene.connectors().len();
            "Scene document parsed"
        );
        trace!(scene:?; "Parsed scene");

        Ok(scene)
    }

    /// Reads and parses a scene document, picking the format from the file
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Io`] if the file cannot be read, plus every
    /// error [`Self::parse_document`] reports.
    pub fn load_document(&self, path: impl AsRef<Path>) -> Result<Scene, InfragramError> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        info!(path:? = path; "Loading scene document");
        let source = fs::read_to_string(path)?;
        self.parse_document(&source, format)
    }

    /// Runs the validator without rendering.
    pub fn check(&self, scene: &Scene) -> Vec<Diagnostic> {
        validate::validate(scene)
    }

    /// Renders a scene into a list of draw commands.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Render`] if validation reports a fatal
    /// diagnostic.
    pub fn render_commands(
        &self,
        scene: &Scene,
    ) -> Result<Rendered<Vec<DrawCommand>>, InfragramError> {
        let mut surface = RecordingSurface::new();
        let diagnostics = Renderer::new(&self.config).render(scene, &mut surface)?;
        Ok(Rendered {
            output: surface.into_commands(),
            diagnostics,
        })
    }

    /// Renders a scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Render`] if validation reports a fatal
    /// diagnostic.
    pub fn render_svg(&self, scene: &Scene) -> Result<Rendered<String>, InfragramError> {
        let mut surface = SvgSurface::new(scene.canvas().size(), self.config.render().scale());
        let diagnostics = Renderer::new(&self.config).render(scene, &mut surface)?;
        info!("SVG rendered successfully");
        Ok(Rendered {
            output: surface.into_string(),
            diagnostics,
        })
    }

    /// Renders a scene to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Render`] if validation reports a fatal
    /// diagnostic, or [`InfragramError::Export`] if rasterization fails.
    #[cfg(feature = "png")]
    pub fn render_png(&self, scene: &Scene) -> Result<Rendered<Vec<u8>>, InfragramError> {
        let svg = self.render_svg(scene)?;
        let png = export::png::rasterize(svg.output())?;
        Ok(svg.map(|_| png))
    }

    /// Renders a scene in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Export`] with
    /// [`export::Error::PngDisabled`] when PNG is requested without the
    /// `png` feature, plus every error the format's renderer reports.
    pub fn render(
        &self,
        scene: &Scene,
        format: OutputFormat,
    ) -> Result<Rendered<Vec<u8>>, InfragramError> {
        match format {
            OutputFormat::Svg => Ok(self.render_svg(scene)?.map(String::into_bytes)),
            #[cfg(feature = "png")]
            OutputFormat::Png => self.render_png(scene),
            #[cfg(not(feature = "png"))]
            OutputFormat::Png => Err(export::Error::PngDisabled.into()),
        }
    }

    /// Renders a scene and writes it to `path`.
    ///
    /// The format is `format` when given, otherwise the file extension. The
    /// file is only touched after rendering succeeded, and is replaced
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns every error [`Self::render`] reports, plus
    /// [`InfragramError::Export`] if the format is unknown or the file
    /// cannot be written.
    pub fn render_to_file(
        &self,
        scene: &Scene,
        path: impl AsRef<Path>,
        format: Option<OutputFormat>,
    ) -> Result<Vec<Diagnostic>, InfragramError> {
        let path = path.as_ref();
        let format = match format {
            Some(format) => format,
            None => OutputFormat::from_path(path)?,
        };
        info!(path:? = path, format:%; "Rendering to file");

        let (bytes, diagnostics) = self.render(scene, format)?.into_parts();
        export::write_atomic(path, &bytes)?;
        Ok(diagnostics)
    }
}
