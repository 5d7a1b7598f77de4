use super::*;
use crate::foundation::core::Point;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas {
        width: w,
        height: h,
    }
}

#[test]
fn padding_is_three_percent_of_short_side() {
    assert_eq!(corner_padding(canvas(1080, 1080)), 32.0);
    assert_eq!(corner_padding(canvas(1080, 1350)), 32.0);
    assert_eq!(corner_padding(canvas(100, 200)), 3.0);
    assert_eq!(corner_padding(canvas(10, 10)), 0.0);
}

#[test]
fn size_is_natural_times_scale() {
    let s = watermark_size(Size::new(200.0, 100.0), 1.5).unwrap();
    assert_eq!(s, Size::new(300.0, 150.0));
    assert!(watermark_size(Size::new(0.0, 100.0), 1.0).is_err());
}

#[test]
fn bottom_right_on_square_post() {
    let r = watermark_rect(
        Size::new(200.0, 100.0),
        &WatermarkOptions::default(),
        canvas(1080, 1080),
    )
    .unwrap();
    assert_eq!(r, Rect::from_origin_size((848.0, 948.0), (200.0, 100.0)));
}

#[test]
fn every_corner_is_inset_by_padding() {
    let c = canvas(1080, 1350);
    let natural = Size::new(100.0, 40.0);
    let at = |position| {
        let opts = WatermarkOptions {
            position,
            scale: 0.5,
            ..WatermarkOptions::default()
        };
        watermark_rect(natural, &opts, c).unwrap()
    };

    assert_eq!(at(Corner::TopLeft).origin(), Point::new(32.0, 32.0));
    assert_eq!(at(Corner::TopRight).origin(), Point::new(998.0, 32.0));
    assert_eq!(at(Corner::BottomLeft).origin(), Point::new(32.0, 1298.0));
    assert_eq!(at(Corner::BottomRight).origin(), Point::new(998.0, 1298.0));
}
