//! Error types for icon generation

use thiserror::Error;

use crate::catalog::SizeSpec;

/// Result type alias for icon generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, rasterizing or packaging icons
#[derive(Error, Debug)]
pub enum Error {
    /// The vector source could not be read or decoded
    #[error("Failed to load vector source: {0}")]
    LoadError(String),

    /// The target raster surface could not be allocated, rendered or encoded
    #[error("Render surface error: {0}")]
    RenderSurfaceError(String),

    /// The declared content type is not a supported vector format
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// One or more entries of a batch failed; no partial output is produced
    #[error("Batch generation failed: {} of {total} icon(s) failed", .failures.len())]
    BatchFailed {
        /// Number of entries requested
        total: usize,
        /// Every failed entry, in request order
        failures: Vec<(SizeSpec, Error)>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error while writing artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the zip bundle
    #[cfg(feature = "archive")]
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this is a `LoadError`
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::LoadError(_))
    }

    /// Whether this is a `RenderSurfaceError`
    pub fn is_render_surface_error(&self) -> bool {
        matches!(self, Error::RenderSurfaceError(_))
    }

    /// A copy of this error with the same variant and message.
    pub(crate) fn duplicate(&self) -> Error {
        match self {
            Error::LoadError(msg) => Error::LoadError(msg.clone()),
            Error::RenderSurfaceError(msg) => Error::RenderSurfaceError(msg.clone()),
            Error::UnsupportedContentType(msg) => Error::UnsupportedContentType(msg.clone()),
            Error::BatchFailed { total, failures } => Error::BatchFailed {
                total: *total,
                failures: failures
                    .iter()
                    .map(|(spec, err)| (*spec, err.duplicate()))
                    .collect(),
            },
            Error::ConfigError(msg) => Error::ConfigError(msg.clone()),
            Error::Io(err) => Error::Io(std::io::Error::new(err.kind(), err.to_string())),
            #[cfg(feature = "archive")]
            Error::ArchiveError(msg) => Error::ArchiveError(msg.clone()),
            Error::Other(msg) => Error::Other(msg.clone()),
        }
    }

    /// Per-entry failures of a `BatchFailed` error (empty for other variants)
    pub fn failures(&self) -> &[(SizeSpec, Error)] {
        match self {
            Error::BatchFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}

#[cfg(feature = "archive")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveError(err.to_string())
    }
}
