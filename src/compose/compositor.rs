//! Frame composition: background, then foreground, then watermark.

use crate::{
    assets::decode::{DecodedImage, ImageDecoder, SourceBlob},
    effects::filter::FilterChain,
    foundation::core::Rgba8Premul,
    foundation::error::PostframeResult,
    layout::geometry::{SizingMode, ensure_dimensions, resolve_rect},
    options::model::{BackgroundOptions, ComposeOptions, ForegroundOptions},
    render::{
        layer::{paint_filtered, paint_image, paint_pattern, paint_watermark},
        surface::{PaintContext, Surface},
    },
    transform::affine::{build_transform, tile_transform},
};

/// Fill painted under every frame (`#ccc`).
pub const NEUTRAL_FILL: Rgba8Premul = Rgba8Premul {
    r: 204,
    g: 204,
    b: 204,
    a: 255,
};

/// Encoded inputs of one frame; absent layers are skipped.
#[derive(Clone, Debug, Default)]
pub struct LayerSources {
    pub background: Option<SourceBlob>,
    pub foreground: Option<SourceBlob>,
    pub watermark: Option<SourceBlob>,
}

/// Decoded inputs of one frame, indexed by role.
#[derive(Clone, Debug, Default)]
pub struct DecodedLayers {
    pub background: Option<DecodedImage>,
    pub foreground: Option<DecodedImage>,
    pub watermark: Option<DecodedImage>,
}

impl DecodedLayers {
    /// Decode all present sources concurrently. Every decode runs to completion
    /// before the first failure (in layer order) is reported.
    pub fn decode(sources: &LayerSources, decoder: &dyn ImageDecoder) -> PostframeResult<Self> {
        let decode_one = |blob: &Option<SourceBlob>| -> PostframeResult<Option<DecodedImage>> {
            blob.as_ref()
                .map(|b| decoder.decode(&b.bytes, b.mime.as_deref()))
                .transpose()
        };

        let (background, (foreground, watermark)) = rayon::join(
            || decode_one(&sources.background),
            || {
                rayon::join(
                    || decode_one(&sources.foreground),
                    || decode_one(&sources.watermark),
                )
            },
        );

        Ok(Self {
            background: background?,
            foreground: foreground?,
            watermark: watermark?,
        })
    }

    fn ensure_dimensions(&self) -> PostframeResult<()> {
        for image in [&self.background, &self.foreground, &self.watermark]
            .into_iter()
            .flatten()
        {
            ensure_dimensions(image.natural_size())?;
        }
        Ok(())
    }
}

/// Decode `sources` and paint the full frame onto `surface`.
///
/// On error (invalid options, missing paint context, decode or dimension
/// failure) the surface is left untouched.
#[tracing::instrument(skip_all)]
pub fn compose<S: Surface + ?Sized>(
    surface: &mut S,
    sources: &LayerSources,
    options: &ComposeOptions,
    decoder: &dyn ImageDecoder,
) -> PostframeResult<()> {
    options.validate()?;
    let ctx = surface.paint_context()?;
    let layers = DecodedLayers::decode(sources, decoder)?;
    paint_layers(ctx, &layers, options)
}

/// Paint already-decoded layers.
#[tracing::instrument(skip_all)]
pub fn compose_decoded(
    ctx: &mut dyn PaintContext,
    layers: &DecodedLayers,
    options: &ComposeOptions,
) -> PostframeResult<()> {
    options.validate()?;
    paint_layers(ctx, layers, options)
}

fn paint_layers(
    ctx: &mut dyn PaintContext,
    layers: &DecodedLayers,
    options: &ComposeOptions,
) -> PostframeResult<()> {
    layers.ensure_dimensions()?;

    ctx.clear(NEUTRAL_FILL);
    paint_background(ctx, layers, &options.background)?;
    paint_foreground(ctx, layers.foreground.as_ref(), &options.foreground)?;

    match &layers.watermark {
        Some(image) => paint_watermark(ctx, image, &options.watermark),
        None => {
            tracing::debug!("no watermark, skipping");
            Ok(())
        }
    }
}

fn paint_background(
    ctx: &mut dyn PaintContext,
    layers: &DecodedLayers,
    options: &BackgroundOptions,
) -> PostframeResult<()> {
    let image = if options.reuse_foreground {
        layers.foreground.as_ref()
    } else {
        layers.background.as_ref()
    };
    let Some(image) = image else {
        tracing::debug!(
            reuse_foreground = options.reuse_foreground,
            "no background image, skipping"
        );
        return Ok(());
    };

    let canvas = ctx.canvas();
    let filter = FilterChain::from_background(options);
    let mode = SizingMode::for_background(options);

    match resolve_rect(image.natural_size(), &mode, canvas.size())? {
        None => {
            tracing::debug!(scale = options.scale, %filter, "background tiled");
            paint_pattern(
                ctx,
                image,
                canvas.bounds(),
                tile_transform(canvas.size(), options.scale),
                &filter,
            )
        }
        Some(rect) => {
            tracing::debug!(?rect, ?mode, %filter, "background rect");
            paint_filtered(
                ctx,
                image,
                None,
                rect,
                build_transform(rect, options.scale, 0.0),
                &filter,
            )
        }
    }
}

fn paint_foreground(
    ctx: &mut dyn PaintContext,
    image: Option<&DecodedImage>,
    options: &ForegroundOptions,
) -> PostframeResult<()> {
    let Some(image) = image else {
        tracing::debug!("no foreground, skipping");
        return Ok(());
    };

    let canvas = ctx.canvas();
    let mode = SizingMode::for_foreground(options);
    // Foreground modes always resolve a rect.
    let rect = resolve_rect(image.natural_size(), &mode, canvas.size())?
        .unwrap_or_else(|| canvas.bounds());
    let rotation = options.rotation();
    tracing::debug!(?rect, ?mode, degrees = rotation.degrees(), "foreground rect");

    paint_image(
        ctx,
        image,
        None,
        rect,
        build_transform(rect, 1.0, rotation.radians()),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
