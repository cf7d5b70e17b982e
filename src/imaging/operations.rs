//! High-level cover operation.
//!
//! Combines the pure geometry in [`calculations`](super::calculations) with
//! backend execution. Validates the source, plans the layout, and hands the
//! pixel work to the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{calculate_center_offset, calculate_fit_dimensions};
use super::params::{CoverLayout, CoverParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("File '{}' not found.", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Source image has no pixels: {}", .0.display())]
    EmptySource(PathBuf),
    #[error("Error processing image: {0}")]
    Imaging(#[from] BackendError),
}

/// Result type for cover operations.
pub type Result<T> = std::result::Result<T, CoverError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Plan a cover layout without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_cover(source: (u32, u32), canvas: (u32, u32)) -> CoverLayout {
    let scaled = calculate_fit_dimensions(source, canvas);
    CoverLayout {
        canvas,
        scaled,
        offset: calculate_center_offset(canvas, scaled),
    }
}

/// Create a letterboxed cover image.
///
/// Fails with [`CoverError::SourceNotFound`] before touching the backend
/// when the source does not exist, so no output is written.
pub fn create_cover(backend: &impl ImageBackend, params: &CoverParams) -> Result<CoverLayout> {
    if !params.source.exists() {
        return Err(CoverError::SourceNotFound(params.source.clone()));
    }

    let source_dims = get_dimensions(backend, &params.source)?;
    if source_dims.0 == 0 || source_dims.1 == 0 {
        return Err(CoverError::EmptySource(params.source.clone()));
    }

    let layout = plan_cover(source_dims, params.canvas());
    log::debug!(
        "cover {}: {}x{} → {}x{} at ({}, {})",
        params.source.display(),
        source_dims.0,
        source_dims.1,
        layout.scaled.0,
        layout.scaled.1,
        layout.offset.0,
        layout.offset.1,
    );

    backend.render_cover(params, &layout)?;
    Ok(layout)
}
