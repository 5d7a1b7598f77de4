use std::fmt;

use rayon::prelude::*;

use crate::{
    effects::blur::blur_rgba8_premul,
    foundation::error::PostframeResult,
    options::model::BackgroundOptions,
};

const BRIGHTNESS_PARALLEL_THRESHOLD: usize = 4096;

#[derive(Clone, Debug, PartialEq)]
/// One step of a paint filter.
pub enum Filter {
    /// Gaussian blur; the radius doubles as the standard deviation.
    Blur { radius_px: u32 },
    /// Linear multiplier on color channels, `100` = unchanged.
    Brightness { percent: f64 },
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Ordered filter list applied to everything painted while it is active.
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    /// Blur first, then brightness; default-valued fields are left out.
    pub fn from_background(options: &BackgroundOptions) -> Self {
        let mut filters = Vec::with_capacity(2);
        let radius_px = options.blur.max(0.0).round() as u32;
        if radius_px != 0 {
            filters.push(Filter::Blur { radius_px });
        }
        if options.brightness != 100.0 {
            filters.push(Filter::Brightness {
                percent: options.brightness.max(0.0),
            });
        }
        Self { filters }
    }

    pub fn is_none(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Run the chain over a premultiplied RGBA8 buffer of `width * height` pixels.
    pub fn apply_rgba8_premul(
        &self,
        pixels: &mut Vec<u8>,
        width: u32,
        height: u32,
    ) -> PostframeResult<()> {
        for filter in &self.filters {
            match *filter {
                Filter::Blur { radius_px } => {
                    let sigma = radius_px as f32;
                    let radius = radius_px.saturating_mul(3);
                    *pixels = blur_rgba8_premul(pixels, width, height, radius, sigma)?;
                }
                Filter::Brightness { percent } => brightness_in_place(pixels, percent),
            }
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blur { radius_px } => write!(f, "blur({radius_px}px)"),
            Self::Brightness { percent } => write!(f, "brightness({percent}%)"),
        }
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            return f.write_str("none");
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

/// Scale color channels by `percent / 100`, keeping them within alpha.
pub fn brightness_in_place(pixels: &mut [u8], percent: f64) {
    if percent == 100.0 {
        return;
    }
    let factor = (percent / 100.0).max(0.0);
    let apply = |px: &mut [u8]| {
        let a = px[3];
        for c in &mut px[..3] {
            let v = (f64::from(*c) * factor).round().min(f64::from(a));
            *c = v as u8;
        }
    };
    if pixels.len() / 4 > BRIGHTNESS_PARALLEL_THRESHOLD {
        pixels.par_chunks_exact_mut(4).for_each(apply);
    } else {
        pixels.chunks_exact_mut(4).for_each(apply);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
