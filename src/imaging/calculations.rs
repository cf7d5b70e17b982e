//! Pure calculation functions for cover geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the largest size that fits inside `target` while keeping the
/// aspect ratio of `source`.
///
/// The scale ratio is `min(target_w / source_w, target_h / source_h)`. The
/// limiting edge matches the target exactly; the other edge is floored.
/// Computed in integer arithmetic so the limiting edge never comes out one
/// pixel short from float rounding.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height), both non-zero
/// * `target` - Canvas dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Scaled dimensions, each at least 1 and at most the target
pub fn calculate_fit_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (source.0 as u64, source.1 as u64);
    let (tgt_w, tgt_h) = (target.0 as u64, target.1 as u64);

    // Compare tgt_w / src_w against tgt_h / src_h without dividing
    let (w, h) = if tgt_w * src_h <= tgt_h * src_w {
        // Width is the limiting edge
        (tgt_w, src_h * tgt_w / src_w)
    } else {
        // Height is the limiting edge
        (src_w * tgt_h / src_h, tgt_h)
    };

    (
        w.clamp(1, tgt_w.max(1)) as u32,
        h.clamp(1, tgt_h.max(1)) as u32,
    )
}

/// Calculate the top-left offset that centers `content` on `canvas`.
///
/// Uses floor division, so an odd remainder leaves the extra pixel on the
/// right/bottom band.
pub fn calculate_center_offset(canvas: (u32, u32), content: (u32, u32)) -> (u32, u32) {
    (
        canvas.0.saturating_sub(content.0) / 2,
        canvas.1.saturating_sub(content.1) / 2,
    )
}
