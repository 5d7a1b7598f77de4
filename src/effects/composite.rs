use rayon::prelude::*;

use crate::foundation::{
    error::{PostframeError, PostframeResult},
    math::{mul_div255_u8, unit_to_u8},
};

pub type PremulRgba8 = [u8; 4];

const OVER_PARALLEL_THRESHOLD: usize = 16 * 1024;

/// Porter-Duff source-over with an extra opacity factor on `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    over_u8(dst, src, unit_to_u8(opacity))
}

fn over_u8(dst: PremulRgba8, src: PremulRgba8, op: u8) -> PremulRgba8 {
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let op = u16::from(op);
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite a full-surface layer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> PostframeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PostframeError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    let op = unit_to_u8(opacity);
    if op == 0 {
        return Ok(());
    }
    let blend = |(d, s): (&mut [u8], &[u8])| {
        let out = over_u8([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], op);
        d.copy_from_slice(&out);
    };
    if dst.len() / 4 > OVER_PARALLEL_THRESHOLD {
        dst.par_chunks_exact_mut(4)
            .zip(src.par_chunks_exact(4))
            .for_each(blend);
    } else {
        dst.chunks_exact_mut(4).zip(src.chunks_exact(4)).for_each(blend);
    }
    Ok(())
}

pub fn fill(dst: &mut [u8], rgba: PremulRgba8) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
