//! Parameter types for the cover operation.
//!
//! These structs describe *what* to render, not *how*. They sit between
//! [`operations`](super::operations), which validates inputs and plans the
//! layout, and the [`backend`](super::backend), which does the pixel work.
//!
//! ## Types
//!
//! - [`Background`]: RGB fill colour for the letterbox/pillarbox bands (default black).
//! - [`CoverParams`]: Source path, output path, canvas size and background.
//! - [`CoverLayout`]: Where the scaled source lands on the canvas.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Canvas width recommended by dev.to for article covers.
pub const DEFAULT_COVER_WIDTH: u32 = 1000;
/// Canvas height recommended by dev.to for article covers.
pub const DEFAULT_COVER_HEIGHT: u32 = 420;

/// Solid RGB colour used to fill the canvas around the scaled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Background(pub [u8; 3]);

impl Background {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn black() -> Self {
        Self::default()
    }

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl From<[u8; 3]> for Background {
    fn from(rgb: [u8; 3]) -> Self {
        Self(rgb)
    }
}

/// Full specification for a cover render.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Canvas dimensions. The output is always exactly this size.
    pub width: u32,
    pub height: u32,
    pub background: Background,
}

impl CoverParams {
    /// Cover params with the dev.to canvas size and a black background.
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            width: DEFAULT_COVER_WIDTH,
            height: DEFAULT_COVER_HEIGHT,
            background: Background::black(),
        }
    }

    pub fn canvas(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Placement of the scaled source on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverLayout {
    /// Canvas size (width, height).
    pub canvas: (u32, u32),
    /// Size of the scaled source image.
    pub scaled: (u32, u32),
    /// Top-left corner of the scaled image on the canvas.
    pub offset: (u32, u32),
}
