//! Fit geometry for layers.
//!
//! All rects are expressed relative to the bounding box origin. `contain` and
//! `cover` use the min/max-of-axis-scales form, which is orientation-agnostic.

use crate::{
    foundation::core::{Point, Rect, Size},
    foundation::error::{PostframeError, PostframeResult},
    options::model::{Anchor, BackgroundOptions, FitKind, ForegroundOptions},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a layer is sized against its bounding box.
pub enum SizingMode {
    /// Fit inside the box, never upscaling, centered.
    Contain,
    /// Fill the box, possibly cropping and upscaling, anchored by `position`.
    Cover { position: Anchor },
    /// Repeat the source across the whole box.
    Tile,
}

impl SizingMode {
    pub fn for_foreground(options: &ForegroundOptions) -> Self {
        match options.mode {
            FitKind::Contain => Self::Contain,
            FitKind::Cover => Self::Cover {
                position: options.position,
            },
        }
    }

    /// Background sizing: tiling wins, then `cover` while reusing the foreground.
    pub fn for_background(options: &BackgroundOptions) -> Self {
        if options.repeat {
            Self::Tile
        } else if options.reuse_foreground {
            Self::Cover {
                position: Anchor::Center,
            }
        } else {
            Self::Contain
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Reject sources with a zero (or non-finite) axis.
pub fn ensure_dimensions(source: Size) -> PostframeResult<()> {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if !ok(source.width) || !ok(source.height) {
        return Err(PostframeError::dimension(format!(
            "source image must have non-zero size (got {}x{})",
            source.width, source.height
        )));
    }
    Ok(())
}

pub fn aspect_ratio(source: Size) -> PostframeResult<f64> {
    ensure_dimensions(source)?;
    Ok(source.width / source.height)
}

pub fn orientation(source: Size) -> PostframeResult<Orientation> {
    Ok(if aspect_ratio(source)? < 1.0 {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    })
}

/// Largest aspect-preserving size inside `bounds`, capped at natural size.
pub fn contain(source: Size, bounds: Size) -> PostframeResult<Rect> {
    ensure_dimensions(source)?;
    let fit = smaller(axis_ratio_w(source, bounds), axis_ratio_h(source, bounds));
    let size = smaller(fit, Ratio { num: 1.0, den: 1.0 }).apply(source);
    Ok(place(size, bounds, Anchor::Center))
}

/// Smallest aspect-preserving size covering `bounds`.
pub fn cover(source: Size, bounds: Size, position: Anchor) -> PostframeResult<Rect> {
    ensure_dimensions(source)?;
    let size = larger(axis_ratio_w(source, bounds), axis_ratio_h(source, bounds)).apply(source);
    Ok(place(size, bounds, position))
}

/// Resolve the destination rect for `mode`; `Tile` has no rect of its own.
pub fn resolve_rect(
    source: Size,
    mode: &SizingMode,
    bounds: Size,
) -> PostframeResult<Option<Rect>> {
    match *mode {
        SizingMode::Contain => contain(source, bounds).map(Some),
        SizingMode::Cover { position } => cover(source, bounds, position).map(Some),
        SizingMode::Tile => {
            ensure_dimensions(source)?;
            Ok(None)
        }
    }
}

/// The whole natural image as a sampling window.
pub fn full_source_rect(source: Size) -> Rect {
    Rect::from_origin_size(Point::ORIGIN, source)
}

/// Scale factor kept as a fraction so integral sizes scale exactly.
#[derive(Clone, Copy, Debug)]
struct Ratio {
    num: f64,
    den: f64,
}

impl Ratio {
    fn apply(self, source: Size) -> Size {
        Size::new(
            source.width * self.num / self.den,
            source.height * self.num / self.den,
        )
    }
}

fn axis_ratio_w(source: Size, bounds: Size) -> Ratio {
    Ratio {
        num: bounds.width,
        den: source.width,
    }
}

fn axis_ratio_h(source: Size, bounds: Size) -> Ratio {
    Ratio {
        num: bounds.height,
        den: source.height,
    }
}

// Denominators are positive, so cross-multiplying preserves order.
fn smaller(a: Ratio, b: Ratio) -> Ratio {
    if a.num * b.den <= b.num * a.den { a } else { b }
}

fn larger(a: Ratio, b: Ratio) -> Ratio {
    if a.num * b.den >= b.num * a.den { a } else { b }
}

fn place(size: Size, bounds: Size, position: Anchor) -> Rect {
    let (x, y) = match position {
        Anchor::Start => (0.0, 0.0),
        Anchor::Center => (
            (bounds.width - size.width) / 2.0,
            (bounds.height - size.height) / 2.0,
        ),
        Anchor::End => (bounds.width - size.width, bounds.height - size.height),
    };
    Rect::from_origin_size((x, y), size)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
