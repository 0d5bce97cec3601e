//! Error types for the rendering core and its collaborators.
//!
//! Only conditions that actually abort a render live here. A button-state
//! lookup miss and an oversized canvas are expected branches and are
//! modelled as [`GlyphOutcome::TextOnly`](crate::render::GlyphOutcome) and
//! [`FitPolicy::Downscaled`](crate::render::FitPolicy) instead.

use std::io;
use thiserror::Error;

/// Errors surfaced by the quadmap pipeline.
#[derive(Error, Debug)]
pub enum QuadmapError {
    /// The tabular source could not be read or parsed.
    #[error("Source '{source_id}' could not be read: {reason}")]
    SourceData {
        /// Identifier of the source (usually its file name)
        source_id: String,
        /// Human-readable cause
        reason: String,
    },

    /// A font or image resource is missing or unusable.
    #[error("Resource '{resource}' could not be loaded: {reason}")]
    ResourceLoad {
        /// Name or path of the resource
        resource: String,
        /// Human-readable cause
        reason: String,
    },

    /// The display sink rejected the frame.
    #[error("Display sink error: {0}")]
    Sink(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl QuadmapError {
    /// Builds a [`QuadmapError::SourceData`].
    pub fn source_data(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceData {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`QuadmapError::ResourceLoad`].
    pub fn resource(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the library.
pub type QuadmapResult<T> = std::result::Result<T, QuadmapError>;
