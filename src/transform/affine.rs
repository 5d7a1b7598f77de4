//! Paint transforms.
//!
//! Layers are drawn in a local space centered on the origin, spanning
//! `[-w/2, -h/2]..[w/2, h/2]` of the target rect. The paint transform then moves
//! that space onto the canvas, so rotation and scale pivot on the rect center.

use crate::foundation::core::{Affine, Point, Rect, Size, Transform2D, Vec2};

/// Translate to `target`'s center, rotate, then scale uniformly.
pub fn build_transform(target: Rect, scale: f64, rotation_rad: f64) -> Affine {
    Transform2D {
        translate: target.center().to_vec2(),
        rotation_rad,
        scale,
        anchor: Vec2::ZERO,
    }
    .to_affine()
}

/// Pattern-space transform for tiling: uniform scale pivoting on the canvas
/// center rather than on the first tile.
pub fn tile_transform(bounds: Size, scale: f64) -> Affine {
    Transform2D {
        scale,
        anchor: Vec2::new(bounds.width / 2.0, bounds.height / 2.0),
        ..Transform2D::default()
    }
    .to_affine()
}

/// Map the `source` window of image pixel space onto `dest`, scaling each
/// axis independently.
pub fn map_rect(source: Rect, dest: Rect) -> Affine {
    let sx = dest.width() / source.width();
    let sy = dest.height() / source.height();
    Affine::translate(dest.origin().to_vec2())
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(-source.origin().to_vec2())
}

/// Local-space rect of `size` centered on the origin.
pub fn centered(size: Size) -> Rect {
    Rect::from_center_size(Point::ORIGIN, size)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
