use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    core::Size,
    error::{PostframeError, PostframeResult},
};

#[derive(Clone, Debug)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct DecodedImage {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap premultiplied pixels, checking the buffer length.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> PostframeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PostframeError::validation("image size overflow"))?;
        if data.len() != expected {
            return Err(PostframeError::validation(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    pub fn natural_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// An encoded image as handed over by the UI layer.
#[derive(Clone, Debug)]
pub struct SourceBlob {
    pub bytes: Arc<[u8]>,
    /// MIME type reported alongside the bytes, e.g. `image/png`.
    pub mime: Option<String>,
}

impl SourceBlob {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime,
        }
    }
}

/// Turns encoded bytes into a [`DecodedImage`].
///
/// Implementations must preserve natural pixel dimensions and fail with
/// [`PostframeError::Decode`]. Decodes of different layers run concurrently.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], mime: Option<&str>) -> PostframeResult<DecodedImage>;
}

/// Default decoder backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8], mime: Option<&str>) -> PostframeResult<DecodedImage> {
        decode_image(bytes, mime).map_err(|e| match e {
            PostframeError::Other(err) => PostframeError::decode(format!("{err:#}")),
            other => other,
        })
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// A recognised MIME type picks the format; otherwise the content is sniffed.
pub fn decode_image(bytes: &[u8], mime: Option<&str>) -> PostframeResult<DecodedImage> {
    let format = mime.and_then(image::ImageFormat::from_mime_type);
    let dyn_img = match format {
        Some(format) => image::load_from_memory_with_format(bytes, format)
            .with_context(|| format!("decode {format:?} image from memory"))?,
        None => image::load_from_memory(bytes).context("decode image from memory")?,
    };
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
