use std::io::Cursor;

use super::*;
use crate::foundation::error::QrCraftError;

fn solid_png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn decode(logo: &ShapedLogo) -> image::RgbaImage {
    image::load_from_memory(logo.png_bytes()).unwrap().to_rgba8()
}

#[test]
fn square_fills_whole_canvas() {
    let src = solid_png(8, 4, [255, 0, 0, 255]);
    let logo = shape_logo(&src, LogoShape::Square, &ShapeOptions::default()).unwrap();
    assert_eq!((logo.width(), logo.height()), (300, 300));

    let px = decode(&logo);
    assert_eq!(px.dimensions(), (300, 300));
    assert_eq!(px.get_pixel(150, 150).0[3], 255);
    assert_eq!(px.get_pixel(1, 1).0[3], 255);
}

#[test]
fn rectangle_is_wider_than_tall() {
    let src = solid_png(4, 4, [0, 0, 255, 255]);
    let logo = shape_logo(&src, LogoShape::Rectangle, &ShapeOptions::default()).unwrap();
    assert_eq!((logo.width(), logo.height()), (420, 300));
    assert_eq!(decode(&logo).dimensions(), (420, 300));
}

#[test]
fn circle_clears_corners_and_keeps_center() {
    let src = solid_png(16, 16, [0, 200, 0, 255]);
    let opts = ShapeOptions {
        base_size: 100,
        ..ShapeOptions::default()
    };
    let logo = shape_logo(&src, LogoShape::Circle, &opts).unwrap();
    let px = decode(&logo);
    assert_eq!(px.dimensions(), (100, 100));
    assert_eq!(px.get_pixel(50, 50).0[3], 255);
    assert_eq!(px.get_pixel(0, 0).0[3], 0);
    assert_eq!(px.get_pixel(99, 99).0[3], 0);
    assert_eq!(px.get_pixel(99, 0).0[3], 0);
}

#[test]
fn contain_leaves_letterbox_transparent() {
    let src = solid_png(20, 10, [10, 20, 30, 255]);
    let opts = ShapeOptions {
        base_size: 100,
        fit: LogoFit::Contain,
    };
    let logo = shape_logo(&src, LogoShape::Square, &opts).unwrap();
    let px = decode(&logo);
    assert_eq!(px.get_pixel(50, 5).0[3], 0);
    assert_eq!(px.get_pixel(50, 50).0[3], 255);
}

#[test]
fn undecodable_bytes_fail_with_image_decode() {
    let err = shape_logo(b"not an image", LogoShape::Circle, &ShapeOptions::default())
        .unwrap_err();
    assert!(matches!(err, QrCraftError::ImageDecode(_)));
}

#[test]
fn data_url_has_png_prefix() {
    let src = solid_png(2, 2, [1, 2, 3, 255]);
    let logo = shape_logo(&src, LogoShape::Square, &ShapeOptions::default()).unwrap();
    assert!(logo.to_data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[test]
fn bounded_shaping_matches_direct_call() {
    let src: Arc<[u8]> = solid_png(3, 3, [9, 9, 9, 255]).into();
    let direct = shape_logo(&src, LogoShape::Circle, &ShapeOptions::default()).unwrap();
    let bounded = shape_logo_bounded(
        src,
        LogoShape::Circle,
        ShapeOptions::default(),
        Duration::from_secs(30),
    )
    .unwrap();
    assert_eq!(direct, bounded);
}
