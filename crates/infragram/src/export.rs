//! Export backends for rendered scenes.
//!
//! The renderer issues draw commands to a [`Surface`](crate::draw::Surface);
//! this module provides the surfaces and encoders that turn those commands
//! into files.
//!
//! # Pipeline Position
//!
//! ```text
//! Scene document
//!     ↓ parse
//! Scene
//!     ↓ validate + render
//! Draw commands
//!     ↓ export (this module)
//! SVG / PNG bytes
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgSurface`]
//! - `png` - rasterizes the SVG output with resvg (requires the `png` feature)

#[cfg(feature = "png")]
pub mod png;
pub mod svg;

use std::{
    fmt, io,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, error, info};
use thiserror::Error;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("generated SVG could not be parsed: {0}")]
    SvgParse(String),

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("unsupported output format `{0}`, expected svg or png")]
    UnsupportedFormat(String),

    #[error("PNG output is not available, rebuild with the `png` feature")]
    PngDisabled,
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for anything other than `.svg`
    /// or `.png`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    /// Returns the conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes `bytes` to `path` so that readers see either the old file or the
/// complete new one.
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over `path`. On failure no partial file is left behind.
///
/// # Errors
///
/// Returns [`Error::Write`] if the temporary file cannot be created, written
/// or moved into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let wrap = |source: io::Error| {
        error!(path:? = path, err:% = source; "Failed to write output");
        Error::Write {
            path: path.to_path_buf(),
            source,
        }
    };

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(wrap)?;
    debug!(temp_path:? = file.path(); "Writing to temporary file");
    file.write_all(bytes).map_err(wrap)?;
    file.as_file().sync_all().map_err(wrap)?;
    file.persist(path).map_err(|err| wrap(err.error))?;

    info!(path:? = path, bytes = bytes.len(); "Output written");
    Ok(())
}
