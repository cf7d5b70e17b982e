//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the cover pipeline
//! needs: identify (read dimensions) and render_cover (decode, resize,
//! composite onto the canvas, encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::{CoverLayout, CoverParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Render the cover: scale the source to `layout.scaled`, paste it at
    /// `layout.offset` on a `layout.canvas` canvas filled with the
    /// background colour, and write a PNG to `params.output`.
    fn render_cover(&self, params: &CoverParams, layout: &CoverLayout)
    -> Result<(), BackendError>;
}
