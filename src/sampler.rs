//! # 指针取样
//!
//! 将客户区坐标映射到栅格像素：
//!
//! ```text
//! u = (x - rect.left) / rect.width
//! v = (y - rect.top)  / rect.height
//! inside ⇔ u ∈ [0, 1) ∧ v ∈ [0, 1)
//! px = floor(u * width), py = floor(v * height)
//! ```
//!
//! 区间右开：`u == 1` 或 `v == 1` 视为图像外，避免越界读取。
//! 指针不在图像上但悬停在色板上时，解析色板记录的字符串作为取样颜色。

use crate::color::ColorValue;
use crate::raster::Raster;
use crate::viewport::ViewportRect;

/// 单次取样结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleResult {
    InsideImage { px: u32, py: u32, color: ColorValue },
    OnSwatch { color: ColorValue },
    Outside,
}

impl SampleResult {
    pub fn color(&self) -> Option<ColorValue> {
        match self {
            Self::InsideImage { color, .. } | Self::OnSwatch { color } => Some(*color),
            Self::Outside => None,
        }
    }

    pub fn is_outside(&self) -> bool {
        matches!(self, Self::Outside)
    }
}

/// 持有当前画布矩形的取样器。
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSampler {
    rect: ViewportRect,
}

impl PointerSampler {
    pub fn new(rect: ViewportRect) -> Self {
        Self { rect }
    }

    pub fn rect(&self) -> ViewportRect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: ViewportRect) {
        self.rect = rect;
    }

    /// 定位 `(client_x, client_y)` 处的颜色。
    ///
    /// `hovered_swatch` 为指针下方色板的记录字符串（若有）。
    pub fn locate(
        &self,
        raster: Option<&Raster>,
        client_x: f64,
        client_y: f64,
        hovered_swatch: Option<&str>,
    ) -> SampleResult {
        if let Some(raster) = raster {
            let u = (client_x - self.rect.left) / self.rect.width;
            let v = (client_y - self.rect.top) / self.rect.height;

            if (0.0..1.0).contains(&u) && (0.0..1.0).contains(&v) {
                // u < 1 时乘积仍可能因舍入等于 width
                let px = ((u * raster.width() as f64).floor() as u32).min(raster.width() - 1);
                let py = ((v * raster.height() as f64).floor() as u32).min(raster.height() - 1);
                return SampleResult::InsideImage {
                    px,
                    py,
                    color: raster.sample(px, py),
                };
            }
        }

        match hovered_swatch {
            Some(text) => match ColorValue::parse(text) {
                Ok(color) => SampleResult::OnSwatch { color },
                Err(err) => {
                    log::warn!("⚠️ 色板颜色无法解析，按图像外处理：{}", err);
                    SampleResult::Outside
                }
            },
            None => SampleResult::Outside,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops::FilterType;
    use image::{DynamicImage, ImageBuffer, Rgba};

    fn quadrant_raster() -> Raster {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => Rgba([255, 0, 0, 255]),
            (1, 0) => Rgba([0, 255, 0, 255]),
            (0, 1) => Rgba([0, 0, 255, 255]),
            _ => Rgba([255, 255, 255, 255]),
        }));
        Raster::build(&img, 2048, 2048, FilterType::Nearest).expect("build should succeed")
    }

    fn sampler() -> PointerSampler {
        PointerSampler::new(ViewportRect::new(10.0, 20.0, 100.0, 100.0))
    }

    #[test]
    fn maps_client_coordinates_to_pixels() {
        let raster = quadrant_raster();
        let result = sampler().locate(Some(&raster), 70.0, 30.0, None);

        assert_eq!(
            result,
            SampleResult::InsideImage {
                px: 1,
                py: 0,
                color: ColorValue::from_rgb8(0, 255, 0),
            }
        );
    }

    #[test]
    fn right_and_bottom_edges_are_outside() {
        let raster = quadrant_raster();
        let sampler = sampler();

        assert!(sampler.locate(Some(&raster), 110.0, 50.0, None).is_outside());
        assert!(sampler.locate(Some(&raster), 50.0, 120.0, None).is_outside());
        assert!(matches!(
            sampler.locate(Some(&raster), 10.0, 20.0, None),
            SampleResult::InsideImage { px: 0, py: 0, .. }
        ));
    }

    #[test]
    fn edge_over_swatch_reports_swatch_not_image() {
        let raster = quadrant_raster();
        let result = sampler().locate(Some(&raster), 110.0, 50.0, Some("#123456"));

        assert!(matches!(result, SampleResult::OnSwatch { .. }));
    }

    #[test]
    fn no_raster_never_inside() {
        assert!(sampler().locate(None, 50.0, 50.0, None).is_outside());
    }

    #[test]
    fn unparseable_swatch_is_outside() {
        assert!(sampler().locate(None, 0.0, 0.0, Some("not-a-color")).is_outside());
    }

    #[test]
    fn negative_coordinates_are_outside() {
        let raster = quadrant_raster();
        assert!(sampler().locate(Some(&raster), -1.0, -1.0, None).is_outside());
    }
}
