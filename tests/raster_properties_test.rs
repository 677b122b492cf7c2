// Property tests for raster scaling and swatch dedup
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Rgba};
use image_eyedropper::color::ColorValue;
use image_eyedropper::raster::{Raster, scaled_dimensions};
use image_eyedropper::swatch::SwatchSet;
use proptest::prelude::*;

proptest! {
    #[test]
    fn scaled_raster_fits_bounds_and_keeps_aspect(
        src_w in 1u32..20_000,
        src_h in 1u32..20_000,
        max_w in 1u32..4_096,
        max_h in 1u32..4_096,
    ) {
        let (w, h) = scaled_dimensions(src_w, src_h, max_w, max_h);

        prop_assert!(w >= 1 && h >= 1);
        prop_assert!(w <= src_w && h <= src_h, "never enlarged: {}x{}", w, h);
        prop_assert!(w <= max_w && h <= max_h, "{}x{} exceeds {}x{}", w, h, max_w, max_h);

        if src_w <= max_w && src_h <= max_h {
            prop_assert_eq!((w, h), (src_w, src_h));
        }

        // floor 最多让每条边少 1 像素
        let ratio = 1f64
            .min(max_w as f64 / src_w as f64)
            .min(max_h as f64 / src_h as f64);
        prop_assert!((ratio * src_w as f64 - w as f64) < 1.0 + 1e-9 || w == 1);
        prop_assert!((ratio * src_h as f64 - h as f64) < 1.0 + 1e-9 || h == 1);
    }

    #[test]
    fn swatch_set_never_holds_duplicates(picks in proptest::collection::vec(0u8..6, 0..40)) {
        let mut set = SwatchSet::new();
        for pick in &picks {
            let color = ColorValue::from_rgb8(*pick * 40, 0, 0);
            let text = format!("#{:02x}0000", *pick * 40);
            let before: Vec<String> = set.texts().iter().map(|t| t.to_string()).collect();
            let added = set.add(text.clone(), color);

            if before.contains(&text) {
                prop_assert!(!added);
                let after: Vec<String> = set.texts().iter().map(|t| t.to_string()).collect();
                prop_assert_eq!(after, before);
            }
        }

        let mut texts = set.texts();
        let len = texts.len();
        texts.sort_unstable();
        texts.dedup();
        prop_assert_eq!(texts.len(), len);
    }
}

#[test]
fn small_source_is_preserved_exactly() {
    let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(2, 2, Rgba([255, 0, 0, 255])));
    let raster = Raster::build(&img, 10, 10, FilterType::Triangle).expect("build should succeed");

    assert_eq!((raster.width(), raster.height()), (2, 2));
    assert_eq!(raster.sample(0, 0), ColorValue::srgb(1.0, 0.0, 0.0));
}

#[test]
fn every_filter_produces_bounded_raster() {
    let img = DynamicImage::ImageRgba8(ImageBuffer::from_fn(400, 160, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    }));

    for filter in [
        FilterType::Nearest,
        FilterType::Triangle,
        FilterType::CatmullRom,
        FilterType::Lanczos3,
    ] {
        let raster = Raster::build(&img, 100, 100, filter).expect("build should succeed");
        assert_eq!((raster.width(), raster.height()), (100, 40));
    }
}
