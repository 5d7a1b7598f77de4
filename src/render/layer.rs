//! Per-layer paint calls on a [`PaintContext`].
//!
//! Every function here leaves the context state as it found it.

use crate::{
    assets::decode::DecodedImage,
    effects::filter::FilterChain,
    foundation::core::{Affine, Canvas, Rect},
    foundation::error::PostframeResult,
    layout::{geometry::full_source_rect, watermark::watermark_rect},
    options::model::WatermarkOptions,
    render::surface::PaintContext,
    transform::affine::{build_transform, centered},
};

/// Draw `source` of `image` so that it spans `target` once `transform` (built
/// for `target`) is applied around its center.
pub fn paint_image(
    ctx: &mut dyn PaintContext,
    image: &DecodedImage,
    source: Option<Rect>,
    target: Rect,
    transform: Affine,
) -> PostframeResult<()> {
    let source = source.unwrap_or_else(|| full_source_rect(image.natural_size()));
    tracing::trace!(?source, ?target, "draw image");

    ctx.save();
    let res = ctx.draw_image(image, source, centered(target.size()), transform);
    ctx.restore();
    res
}

/// [`paint_image`] under `filter`; the previous filter is put back right after.
pub fn paint_filtered(
    ctx: &mut dyn PaintContext,
    image: &DecodedImage,
    source: Option<Rect>,
    target: Rect,
    transform: Affine,
    filter: &FilterChain,
) -> PostframeResult<()> {
    let prev = ctx.filter();
    ctx.set_filter(filter.clone());
    let res = paint_image(ctx, image, source, target, transform);
    ctx.set_filter(prev);
    res
}

/// Fill `bounds` with `image` repeated, placed by `pattern_transform`.
pub fn paint_pattern(
    ctx: &mut dyn PaintContext,
    image: &DecodedImage,
    bounds: Rect,
    pattern_transform: Affine,
    filter: &FilterChain,
) -> PostframeResult<()> {
    tracing::trace!(?bounds, %filter, "fill pattern");
    let prev = ctx.filter();
    ctx.set_filter(filter.clone());

    ctx.save();
    let res = ctx.fill_pattern(image, pattern_transform, bounds);
    ctx.restore();

    ctx.set_filter(prev);
    res
}

/// Draw the watermark at its natural size times `scale`, pinned to a corner.
pub fn paint_watermark(
    ctx: &mut dyn PaintContext,
    image: &DecodedImage,
    options: &WatermarkOptions,
) -> PostframeResult<()> {
    let canvas: Canvas = ctx.canvas();
    let target = watermark_rect(image.natural_size(), options, canvas)?;

    let prev = ctx.global_alpha();
    ctx.set_global_alpha(options.effective_opacity());
    let res = paint_image(ctx, image, None, target, build_transform(target, 1.0, 0.0));
    ctx.set_global_alpha(prev);
    res
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
