//! Postframe composes social-media post frames from up to three raster layers.
//!
//! A frame is a fixed-size canvas (1080x1080 or 1080x1350) painted in a fixed
//! order:
//!
//! 1. **Neutral fill**: the whole canvas is cleared to `#ccc`.
//! 2. **Background**: contained, covered (when reusing the foreground) or tiled,
//!    optionally blurred and brightened, scaled about its center.
//! 3. **Foreground**: `contain` or anchored `cover`, with quarter-turn rotation.
//! 4. **Watermark**: natural size times a scale, pinned inside a corner with a
//!    3% padding, drawn at a clamped opacity.
//!
//! Geometry is pure ([`layout`], [`transform`]). Painting goes through the
//! [`PaintContext`] trait so any backend that offers canvas-style draw calls can
//! be targeted; [`CpuSurface`] is the built-in `vello_cpu` implementation.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** end-to-end: decoders and surfaces exchange
//!   premultiplied pixels.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod effects;
mod foundation;
mod options;
mod render;

/// Fit geometry for layers and watermark corner placement.
pub mod layout;
/// Paint transforms built from fitted rects.
pub mod transform;

pub use assets::decode::{DecodedImage, ImageDecoder, RasterDecoder, SourceBlob, decode_image};
pub use compose::compositor::{
    DecodedLayers, LayerSources, NEUTRAL_FILL, compose, compose_decoded,
};
pub use effects::blur::{MAX_KERNEL_RADIUS, blur_rgba8_premul};
pub use effects::composite::{PremulRgba8, over, over_in_place};
pub use effects::filter::{Filter, FilterChain, brightness_in_place};
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Size, Transform2D, Vec2};
pub use foundation::error::{PostframeError, PostframeResult};
pub use options::model::{
    Anchor, BackgroundOptions, ComposeOptions, Corner, FitKind, ForegroundOptions,
    GeneralOptions, OutputFormat, Rotation, WatermarkOptions,
};
pub use options::store::{JsonFileStore, KeyValueStore, MemoryStore, OptionStore};
pub use render::cpu::CpuSurface;
pub use render::layer::{paint_filtered, paint_image, paint_pattern, paint_watermark};
pub use render::surface::{PaintContext, Surface};
