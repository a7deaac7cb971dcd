//! Error types for Infragram operations.
//!
//! [`InfragramError`] wraps every failure the [`DiagramBuilder`] pipeline can
//! report, from reading a document to writing the output file.
//!
//! [`DiagramBuilder`]: crate::DiagramBuilder

use std::io;

use thiserror::Error;

use crate::{document::DocumentError, export, render::RenderError, scene::SceneError};

/// The main error type for Infragram operations.
///
/// # Diagnostic Variants
///
/// [`InfragramError::Render`] carries the validator's diagnostics when a
/// scene is rejected; see [`RenderError::diagnostics`].
#[derive(Debug, Error)]
pub enum InfragramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl InfragramError {
    /// Returns the validation diagnostics if the scene was rejected.
    pub fn diagnostics(&self) -> Option<&[crate::validate::Diagnostic]> {
        match self {
            Self::Render(err @ RenderError::Validation { .. }) => Some(err.diagnostics()),
            _ => None,
        }
    }
}
