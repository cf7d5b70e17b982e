//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` with content sniffing |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Canvas + paste | `image::RgbaImage::from_pixel` + `image::imageops::overlay` |
//! | Encode → PNG | `image::ImageFormat::Png` |
//!
//! Transparent source pixels are composited over the background colour, so a
//! logo with an alpha channel sits on the requested fill instead of keeping
//! whatever RGB values hide behind its transparent areas.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{CoverLayout, CoverParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open an image, guessing the format from content rather than extension.
fn open_reader(
    path: &Path,
) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_reader(path)?.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })
}

/// Scale the source and paste it centered on a solid canvas.
fn compose_cover(img: &DynamicImage, params: &CoverParams, layout: &CoverLayout) -> RgbaImage {
    let (scaled_w, scaled_h) = layout.scaled;
    let resized = img
        .resize_exact(scaled_w, scaled_h, FilterType::Lanczos3)
        .to_rgba8();

    let [r, g, b] = params.background.rgb();
    let (canvas_w, canvas_h) = layout.canvas;
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([r, g, b, 255]));
    image::imageops::overlay(
        &mut canvas,
        &resized,
        i64::from(layout.offset.0),
        i64::from(layout.offset.1),
    );
    canvas
}

/// Save as PNG, creating parent directories first.
fn save_png(img: DynamicImage, path: &Path) -> Result<(), BackendError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn render_cover(
        &self,
        params: &CoverParams,
        layout: &CoverLayout,
    ) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let canvas = compose_cover(&img, params, layout);
        // PNG output is opaque RGB; the canvas alpha is always 255
        let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
        save_png(DynamicImage::ImageRgb8(rgb), &params.output)
    }
}
