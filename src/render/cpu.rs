use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::decode::DecodedImage,
    effects::{composite, filter::FilterChain},
    foundation::core::{Affine, Canvas, Rect, Rgba8Premul},
    foundation::error::{PostframeError, PostframeResult},
    foundation::math::unpremul_u8,
    render::surface::{PaintContext, StateStack, Surface},
    transform::affine::map_rect,
};

/// CPU destination surface rasterized with `vello_cpu`.
///
/// Every draw is rendered into a transparent offscreen layer, run through
/// the active filter chain, then composited source-over at the current
/// global alpha.
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    state: StateStack,
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> PostframeResult<Self> {
        let (width, height) = canvas_to_u16(canvas)?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            state: StateStack::default(),
        })
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let idx = (y as usize * usize::from(self.width) + x as usize) * 4;
        let d = self.data();
        Some([d[idx], d[idx + 1], d[idx + 2], d[idx + 3]])
    }

    /// Number of outstanding `save` calls.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }

    /// Straight-alpha RGBA8 copy suitable for encoding.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = self.data().to_vec();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            for c in &mut px[..3] {
                *c = unpremul_u8(*c, a);
            }
        }
        out
    }

    pub fn save_png(&self, path: &Path) -> PostframeResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_rgba8(),
            u32::from(self.width),
            u32::from(self.height),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn rasterize(
        &self,
        paint: vello_cpu::Image,
        transform: Affine,
        paint_transform: Affine,
        rect: Rect,
    ) -> Vec<u8> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint_transform(affine_to_cpu(paint_transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&rect_to_cpu(rect));
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);
        layer.data_as_u8_slice().to_vec()
    }

    fn composite_layer(&mut self, mut layer: Vec<u8>) -> PostframeResult<()> {
        let filter = &self.state.current.filter;
        if !filter.is_none() {
            filter.apply_rgba8_premul(&mut layer, u32::from(self.width), u32::from(self.height))?;
        }
        composite::over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            &layer,
            self.state.current.global_alpha,
        )
    }
}

impl PaintContext for CpuSurface {
    fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn filter(&self) -> FilterChain {
        self.state.current.filter.clone()
    }

    fn set_filter(&mut self, filter: FilterChain) {
        self.state.current.filter = filter;
    }

    fn global_alpha(&self) -> f32 {
        self.state.current.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.current.global_alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
    }

    fn clear(&mut self, color: Rgba8Premul) {
        composite::fill(self.pixmap.data_as_u8_slice_mut(), color.to_array());
    }

    fn draw_image(
        &mut self,
        image: &DecodedImage,
        source: Rect,
        dest: Rect,
        transform: Affine,
    ) -> PostframeResult<()> {
        if source.area() <= 0.0 || dest.area() <= 0.0 {
            return Ok(());
        }
        let pixmap = image_to_pixmap(image).map_err(PostframeError::render)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        // The image paint lives in pixel space; fill only the sampled window.
        let layer = self.rasterize(
            paint,
            transform * map_rect(source, dest),
            Affine::IDENTITY,
            source,
        );
        self.composite_layer(layer)
    }

    fn fill_pattern(
        &mut self,
        image: &DecodedImage,
        pattern_transform: Affine,
        area: Rect,
    ) -> PostframeResult<()> {
        let pixmap = image_to_pixmap(image).map_err(PostframeError::pattern)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler {
                x_extend: vello_cpu::peniko::Extend::Repeat,
                y_extend: vello_cpu::peniko::Extend::Repeat,
                ..vello_cpu::peniko::ImageSampler::default()
            },
        };
        let layer = self.rasterize(paint, Affine::IDENTITY, pattern_transform, area);
        self.composite_layer(layer)
    }
}

impl Surface for CpuSurface {
    fn dimensions(&self) -> Canvas {
        PaintContext::canvas(self)
    }

    fn paint_context(&mut self) -> PostframeResult<&mut dyn PaintContext> {
        Ok(self)
    }
}

fn canvas_to_u16(canvas: Canvas) -> PostframeResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| PostframeError::validation("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| PostframeError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(PostframeError::validation("surface must be at least 1x1"));
    }
    Ok((w, h))
}

fn image_to_pixmap(image: &DecodedImage) -> Result<vello_cpu::Pixmap, String> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| format!("image width {} exceeds u16", image.width))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| format!("image height {} exceeds u16", image.height))?;
    if image.rgba8_premul.len() != usize::from(w) * usize::from(h) * 4 {
        return Err("decoded image byte length mismatch".to_string());
    }

    let mut may_have_opacities = false;
    let pixels = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
