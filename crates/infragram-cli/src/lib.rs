//! Infragram CLI library
//!
//! This module contains the core CLI logic for the Infragram diagram tool:
//! rendering and checking scene documents, and rendering the built-in
//! diagram catalog.

pub mod catalog;
pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, BuiltinArgs, Command, FormatArg};
pub use error_adapter::{ErrorAdapter, Reportable, to_reportables};

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{info, warn};

use infragram::{
    DiagramBuilder, InfragramError,
    document::DocumentFormat,
    export::OutputFormat,
    render::RenderError,
    scene::Scene,
    validate::{self, Diagnostic},
};

use error_adapter::{DiagnosticAdapter, render_report};

/// Run the Infragram CLI application
///
/// # Errors
///
/// Returns `InfragramError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Document errors
/// - Scenes rejected by the validator
/// - Export errors
pub fn run(args: &Args) -> Result<(), InfragramError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = DiagramBuilder::new(app_config);

    match &args.command {
        Command::Render {
            input,
            output,
            format,
        } => {
            info!(input_path = input; "Processing diagram");
            let scene = builder.load_document(input)?;
            let (path, format) =
                output_target(output.as_deref(), Path::new(input), format.map(Into::into));
            write_scene(&builder, &scene, &path, format)
        }
        Command::Check { input } => {
            info!(input_path = input; "Checking diagram");
            let scene = builder.load_document(input)?;
            check_scene(&builder, &scene)
        }
        Command::List => {
            for diagram in catalog::BUILTINS {
                println!("{:<22} {}", diagram.name, diagram.description);
            }
            Ok(())
        }
        command => match command.builtin() {
            Some((name, builtin)) => render_builtin(&builder, name, builtin),
            None => Ok(()),
        },
    }
}

fn render_builtin(
    builder: &DiagramBuilder,
    name: &str,
    args: &BuiltinArgs,
) -> Result<(), InfragramError> {
    let diagram = catalog::find(name)
        .ok_or_else(|| InfragramError::Config(format!("unknown built-in diagram `{name}`")))?;
    info!(diagram = diagram.name; "Rendering built-in diagram");

    let scene = builder.parse_document(diagram.source, DocumentFormat::Toml)?;
    let (path, format) = output_target(
        args.output.as_deref(),
        Path::new(diagram.name),
        args.format.map(Into::into),
    );
    write_scene(builder, &scene, &path, format)
}

/// Picks the output path and format.
///
/// An explicit path keeps the requested format, or leaves it to the file
/// extension. Without a path the output lands next to `default_stem` with
/// the format's extension, SVG unless requested otherwise.
fn output_target(
    explicit: Option<&str>,
    default_stem: &Path,
    format: Option<OutputFormat>,
) -> (PathBuf, Option<OutputFormat>) {
    match explicit {
        Some(path) => (PathBuf::from(path), format),
        None => {
            let format = format.unwrap_or(OutputFormat::Svg);
            (default_stem.with_extension(format.extension()), Some(format))
        }
    }
}

fn write_scene(
    builder: &DiagramBuilder,
    scene: &Scene,
    path: &Path,
    format: Option<OutputFormat>,
) -> Result<(), InfragramError> {
    let diagnostics = builder.render_to_file(scene, path, format)?;
    report_warnings(&diagnostics);
    info!(
        output_file = path.display().to_string(),
        warnings = diagnostics.len();
        "Diagram exported successfully"
    );
    Ok(())
}

fn check_scene(builder: &DiagramBuilder, scene: &Scene) -> Result<(), InfragramError> {
    let diagnostics = builder.check(scene);
    if validate::has_fatal(&diagnostics) {
        return Err(RenderError::Validation { diagnostics }.into());
    }

    report_warnings(&diagnostics);
    info!(warnings = diagnostics.len(); "Scene is valid");
    Ok(())
}

/// Prints non-fatal diagnostics to stderr, independent of the log level.
fn report_warnings(diagnostics: &[Diagnostic]) {
    if let Err(err) = write_diagnostics(&mut io::stderr().lock(), diagnostics) {
        warn!(err:% = err; "Failed to print diagnostics");
    }
}

fn write_diagnostics(out: &mut impl Write, diagnostics: &[Diagnostic]) -> io::Result<()> {
    for diagnostic in diagnostics {
        writeln!(out, "{}", render_report(&DiagnosticAdapter::new(diagnostic)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use infragram::{
        geometry::{Point, Size},
        scene::{Canvas, Node},
    };

    use super::*;

    #[test]
    fn test_write_diagnostics_prints_every_warning() {
        let mut scene = Scene::new(Canvas::new(50.0, 50.0).unwrap());
        for id in ["a", "b"] {
            scene
                .add_node(Node::rectangle(id, Point::new(40.0, 10.0), Size::new(20.0, 10.0)))
                .unwrap();
        }
        let diagnostics = DiagramBuilder::default().check(&scene);
        assert!(!validate::has_fatal(&diagnostics));

        let mut out = Vec::new();
        write_diagnostics(&mut out, &diagnostics).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert!(printed.contains("infragram::overlapping-nodes"));
        assert!(printed.contains("infragram::out-of-bounds"));
    }

    #[test]
    fn test_write_diagnostics_empty() {
        let mut out = Vec::new();
        write_diagnostics(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_output_target_defaults_to_svg_next_to_input() {
        let (path, format) = output_target(None, Path::new("docs/stack.toml"), None);
        assert_eq!(path, PathBuf::from("docs/stack.svg"));
        assert_eq!(format, Some(OutputFormat::Svg));
    }

    #[test]
    fn test_output_target_uses_requested_format() {
        let (path, format) = output_target(None, Path::new("scale-up"), Some(OutputFormat::Png));
        assert_eq!(path, PathBuf::from("scale-up.png"));
        assert_eq!(format, Some(OutputFormat::Png));
    }

    #[test]
    fn test_output_target_explicit_path() {
        let (path, format) = output_target(Some("out/diagram.png"), Path::new("in.toml"), None);
        assert_eq!(path, PathBuf::from("out/diagram.png"));
        assert_eq!(format, None);
    }
}
