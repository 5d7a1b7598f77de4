use super::*;
use crate::{effects::filter::Filter, foundation::core::Size, transform::affine::centered};

const WHITE: Rgba8Premul = Rgba8Premul {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

fn solid(w: u32, h: u32, px: [u8; 4]) -> DecodedImage {
    DecodedImage::from_premul_rgba8(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn surface(w: u32, h: u32) -> CpuSurface {
    CpuSurface::new(Canvas::new(w, h).unwrap()).unwrap()
}

fn near(actual: [u8; 4], expected: [u8; 4], tol: u8) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tol)
}

/// Draw `image` fully onto the canvas rect `target`, unrotated.
fn draw_at(s: &mut CpuSurface, image: &DecodedImage, target: Rect) {
    let src = Rect::from_origin_size((0.0, 0.0), image.natural_size());
    let paint = Affine::translate(target.center().to_vec2());
    s.draw_image(image, src, centered(target.size()), paint)
        .unwrap();
}

#[test]
fn new_surface_is_transparent_and_clear_overwrites() {
    let mut s = surface(4, 3);
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(4, 0), None);

    s.clear(Rgba8Premul::opaque(204, 204, 204));
    assert!(s.data().chunks_exact(4).all(|px| px == [204, 204, 204, 255]));
}

#[test]
fn oversized_or_empty_surface_is_rejected() {
    let err = CpuSurface::new(Canvas {
        width: 70_000,
        height: 10,
    })
    .err()
    .unwrap();
    assert!(matches!(err, PostframeError::Validation(_)));

    assert!(
        CpuSurface::new(Canvas {
            width: 4,
            height: 0
        })
        .is_err()
    );
}

#[test]
fn draw_image_paints_only_the_target_rect() {
    let mut s = surface(16, 16);
    s.clear(WHITE);
    let red = solid(4, 4, [255, 0, 0, 255]);
    draw_at(&mut s, &red, Rect::new(4.0, 4.0, 12.0, 12.0));

    assert!(near(s.pixel(8, 8).unwrap(), [255, 0, 0, 255], 2));
    assert!(near(s.pixel(5, 10).unwrap(), [255, 0, 0, 255], 2));
    assert_eq!(s.pixel(1, 1), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(14, 8), Some([255, 255, 255, 255]));
}

#[test]
fn draw_image_samples_only_the_source_window() {
    // Left half red, right half blue.
    let mut data = Vec::new();
    for _y in 0..2 {
        data.extend_from_slice(&[255, 0, 0, 255, 255, 0, 0, 255]);
        data.extend_from_slice(&[0, 0, 255, 255, 0, 0, 255, 255]);
    }
    let img = DecodedImage::from_premul_rgba8(4, 2, data).unwrap();

    let mut s = surface(8, 8);
    let window = Rect::new(2.0, 0.0, 4.0, 2.0);
    s.draw_image(
        &img,
        window,
        centered(Size::new(8.0, 8.0)),
        Affine::translate((4.0, 4.0)),
    )
    .unwrap();

    assert!(near(s.pixel(3, 4).unwrap(), [0, 0, 255, 255], 2));
    assert!(near(s.pixel(6, 4).unwrap(), [0, 0, 255, 255], 2));
}

#[test]
fn global_alpha_blends_over_existing_pixels() {
    let mut s = surface(8, 8);
    s.clear(WHITE);
    s.set_global_alpha(0.5);
    draw_at(&mut s, &solid(2, 2, [255, 0, 0, 255]), Rect::new(0.0, 0.0, 8.0, 8.0));

    let px = s.pixel(4, 4).unwrap();
    assert!(near(px, [255, 128, 128, 255], 2), "{px:?}");
}

#[test]
fn global_alpha_is_clamped() {
    let mut s = surface(2, 2);
    s.set_global_alpha(3.0);
    assert_eq!(s.global_alpha(), 1.0);
    s.set_global_alpha(-1.0);
    assert_eq!(s.global_alpha(), 0.0);
    s.set_global_alpha(f32::NAN);
    assert_eq!(s.global_alpha(), 0.0);
}

#[test]
fn active_filter_applies_to_the_drawn_layer_only() {
    let mut s = surface(8, 8);
    s.clear(WHITE);
    s.set_filter(FilterChain::new(vec![Filter::Brightness { percent: 50.0 }]));
    draw_at(&mut s, &solid(2, 2, [200, 100, 0, 255]), Rect::new(0.0, 0.0, 4.0, 8.0));

    assert!(near(s.pixel(2, 4).unwrap(), [100, 50, 0, 255], 2));
    // Pixels outside the layer keep the cleared color.
    assert_eq!(s.pixel(6, 4), Some([255, 255, 255, 255]));
}

#[test]
fn save_and_restore_round_trip_paint_state() {
    let mut s = surface(2, 2);
    s.save();
    s.set_global_alpha(0.25);
    s.set_filter(FilterChain::new(vec![Filter::Blur { radius_px: 2 }]));
    assert_eq!(s.save_depth(), 1);

    s.restore();
    assert_eq!(s.save_depth(), 0);
    assert_eq!(s.global_alpha(), 1.0);
    assert!(s.filter().is_none());

    // Unbalanced restore is a no-op.
    s.restore();
    assert_eq!(s.global_alpha(), 1.0);
}

#[test]
fn fill_pattern_repeats_the_image() {
    let img = DecodedImage::from_premul_rgba8(
        2,
        1,
        vec![255, 0, 0, 255, 0, 0, 255, 255],
    )
    .unwrap();
    let mut s = surface(8, 2);
    s.fill_pattern(&img, Affine::IDENTITY, Rect::new(0.0, 0.0, 8.0, 2.0))
        .unwrap();

    let reddish = |px: [u8; 4]| px[0] > px[2] && px[3] == 255;
    for x in [0, 2, 4, 6] {
        assert!(reddish(s.pixel(x, 0).unwrap()), "x={x}");
        assert!(!reddish(s.pixel(x + 1, 1).unwrap()), "x={x}");
    }
}

#[test]
fn oversized_images_map_to_paint_errors() {
    let wide = solid(70_000, 1, [0, 0, 0, 255]);
    let mut s = surface(4, 4);

    let err = s
        .fill_pattern(&wide, Affine::IDENTITY, Rect::new(0.0, 0.0, 4.0, 4.0))
        .unwrap_err();
    assert!(matches!(err, PostframeError::PatternCreation(_)));

    let err = s
        .draw_image(
            &wide,
            Rect::new(0.0, 0.0, 70_000.0, 1.0),
            centered(Size::new(4.0, 4.0)),
            Affine::translate((2.0, 2.0)),
        )
        .unwrap_err();
    assert!(matches!(err, PostframeError::Render(_)));
}

#[test]
fn empty_rects_draw_nothing() {
    let mut s = surface(4, 4);
    let img = solid(2, 2, [255, 255, 255, 255]);
    s.draw_image(&img, Rect::ZERO, centered(Size::new(4.0, 4.0)), Affine::IDENTITY)
        .unwrap();
    assert!(s.data().iter().all(|b| *b == 0));
}

#[test]
fn straight_alpha_export_unpremultiplies() {
    let mut s = surface(1, 1);
    s.clear(Rgba8Premul {
        r: 64,
        g: 32,
        b: 0,
        a: 128,
    });
    let out = s.to_rgba8();
    assert_eq!(out[3], 128);
    assert!(out[0].abs_diff(128) <= 1);
    assert!(out[1].abs_diff(64) <= 1);
}

#[test]
fn surface_hands_out_itself_as_paint_context() {
    let mut s = surface(3, 5);
    assert_eq!(
        s.dimensions(),
        Canvas {
            width: 3,
            height: 5
        }
    );
    let ctx = s.paint_context().unwrap();
    assert_eq!(ctx.canvas().height, 5);
}
