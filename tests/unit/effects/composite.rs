use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
    assert_eq!(over(dst, src, -0.2), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
    assert_eq!(over(dst, src, 1.5), src);
}

#[test]
fn over_half_opacity_mixes() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 0.5), [128, 0, 127, 255]);
}

#[test]
fn over_in_place_checks_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());

    let src = [9u8, 8, 7, 255, 0, 0, 0, 0];
    over_in_place(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst, vec![9, 8, 7, 255, 0, 0, 0, 0]);
}

#[test]
fn fill_writes_every_pixel() {
    let mut dst = vec![0u8; 12];
    fill(&mut dst, [204, 204, 204, 255]);
    assert_eq!(dst, [204u8, 204, 204, 255].repeat(3));
}
