use super::*;

#[test]
fn canvas_rejects_empty_sizes() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(1080, 1350).unwrap();
    assert_eq!(c.min_side(), 1080);
    assert_eq!(c.bounds(), Rect::new(0.0, 0.0, 1080.0, 1350.0));
}

#[test]
fn premul_rounds_half_up() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::opaque(1, 2, 3).a, 255);
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn anchored_scale_keeps_anchor_fixed() {
    let t = Transform2D {
        scale: 3.0,
        anchor: Vec2::new(50.0, 20.0),
        ..Transform2D::default()
    };
    let p = t.to_affine() * Point::new(50.0, 20.0);
    assert!((p.x - 50.0).abs() < 1e-9);
    assert!((p.y - 20.0).abs() < 1e-9);
}
