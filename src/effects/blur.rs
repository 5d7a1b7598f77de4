use rayon::prelude::*;

use crate::foundation::error::{PostframeError, PostframeResult};

/// Upper bound on kernel half-width; larger requests are clamped.
pub const MAX_KERNEL_RADIUS: u32 = 256;

/// Separable Gaussian blur over premultiplied RGBA8, edges clamped.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> PostframeResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| PostframeError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(PostframeError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = GaussianKernel::new(radius.min(MAX_KERNEL_RADIUS), sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    kernel.pass(src, &mut tmp, width as usize, height as usize, Axis::Horizontal);
    kernel.pass(&tmp, &mut out, width as usize, height as usize, Axis::Vertical);
    Ok(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Q16 fixed-point weights summing to exactly `1 << 16`.
struct GaussianKernel {
    weights: Vec<u32>,
}

impl GaussianKernel {
    fn new(radius: u32, sigma: f32) -> PostframeResult<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(PostframeError::validation("blur sigma must be > 0"));
        }

        let r = radius as i32;
        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let weights_f: Vec<f64> = (-r..=r)
            .map(|i| {
                let x = f64::from(i);
                (-x * x / denom).exp()
            })
            .collect();
        let sum: f64 = weights_f.iter().sum();
        if sum <= 0.0 {
            return Err(PostframeError::render("gaussian kernel sum is zero"));
        }

        let mut weights: Vec<u32> = weights_f
            .iter()
            .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
            .collect();
        let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
        let delta = 65536 - acc;
        if delta != 0 {
            let mid = weights.len() / 2;
            weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
        }
        Ok(Self { weights })
    }

    fn pass(&self, src: &[u8], dst: &mut [u8], w: usize, h: usize, axis: Axis) {
        let radius = (self.weights.len() / 2) as isize;
        dst.par_chunks_exact_mut(w * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..w {
                    let mut acc = [0u64; 4];
                    for (ki, &kw) in self.weights.iter().enumerate() {
                        let d = ki as isize - radius;
                        let (sx, sy) = match axis {
                            Axis::Horizontal => (clamp_index(x, d, w), y),
                            Axis::Vertical => (x, clamp_index(y, d, h)),
                        };
                        let idx = (sy * w + sx) * 4;
                        for c in 0..4 {
                            acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                        }
                    }
                    for c in 0..4 {
                        row[x * 4 + c] = q16_to_u8(acc[c]);
                    }
                }
            });
    }
}

fn clamp_index(i: usize, d: isize, len: usize) -> usize {
    (i as isize + d).clamp(0, len as isize - 1) as usize
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
