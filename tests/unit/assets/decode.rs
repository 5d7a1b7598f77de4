use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(3, 2, [100, 50, 200, 128]);

    let decoded = decode_image(&buf, Some("image/png")).unwrap();
    assert_eq!(decoded.width, 3);
    assert_eq!(decoded.height, 2);
    assert_eq!(decoded.natural_size(), Size::new(3.0, 2.0));
    assert_eq!(
        &decoded.rgba8_premul[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn unknown_mime_falls_back_to_sniffing() {
    let buf = png_bytes(1, 1, [1, 2, 3, 255]);
    let decoded = RasterDecoder
        .decode(&buf, Some("application/octet-stream"))
        .unwrap();
    assert_eq!(decoded.rgba8_premul.as_slice(), &[1, 2, 3, 255]);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = RasterDecoder.decode(b"definitely not an image", None).unwrap_err();
    assert!(matches!(err, PostframeError::Decode(_)), "{err}");
}

#[test]
fn from_premul_checks_length() {
    assert!(DecodedImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    let img = DecodedImage::from_premul_rgba8(2, 2, vec![0; 16]).unwrap();
    assert_eq!(img.rgba8_premul.len(), 16);
}
