use crate::{
    foundation::core::{Canvas, Rect, Size},
    foundation::error::PostframeResult,
    layout::geometry::ensure_dimensions,
    options::model::{Corner, WatermarkOptions},
};

/// Fraction of the shorter canvas side kept clear around a watermark.
pub const WATERMARK_PADDING_RATIO: f64 = 0.03;

/// Corner inset in pixels: `round(0.03 * min(width, height))`.
pub fn corner_padding(canvas: Canvas) -> f64 {
    (WATERMARK_PADDING_RATIO * f64::from(canvas.min_side())).round()
}

/// Target size is a direct multiplier of the natural size, not a fit.
pub fn watermark_size(natural: Size, scale: f64) -> PostframeResult<Size> {
    ensure_dimensions(natural)?;
    Ok(natural * scale)
}

/// Destination rect of a watermark pinned to one of the canvas corners.
pub fn watermark_rect(
    natural: Size,
    options: &WatermarkOptions,
    canvas: Canvas,
) -> PostframeResult<Rect> {
    let size = watermark_size(natural, options.scale)?;
    let pad = corner_padding(canvas);
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));

    let x = match options.position {
        Corner::TopLeft | Corner::BottomLeft => pad,
        Corner::TopRight | Corner::BottomRight => cw - pad - size.width,
    };
    let y = match options.position {
        Corner::TopLeft | Corner::TopRight => pad,
        Corner::BottomLeft | Corner::BottomRight => ch - pad - size.height,
    };
    Ok(Rect::from_origin_size((x, y), size))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/watermark.rs"]
mod tests;
