//! Cover image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Fit + center** | integer geometry in `calculations` |
//! | **Resize → PNG** | Lanczos3 + `imageops::overlay` + PNG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing the cover render
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`create_cover`], combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_center_offset, calculate_fit_dimensions};
pub use operations::{CoverError, create_cover, get_dimensions, plan_cover};
pub use params::{
    Background, CoverLayout, CoverParams, DEFAULT_COVER_HEIGHT, DEFAULT_COVER_WIDTH,
};
pub use rust_backend::RustBackend;
