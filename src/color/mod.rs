//! # 颜色值模块（color）
//!
//! ## 设计思路
//!
//! `ColorValue` 是不可变值：每次转换、序列化都会返回新值或新字符串，从不原地修改。
//! 颜色数学（sRGB ↔ Lab / LCh / OKLCH）交给 `palette`，本模块只负责：
//!
//! - `space`：色彩空间与序列化模式
//! - `format`：规范文本输出（hex / 函数式写法 + 有效数字）
//! - `parse`：解析本模块输出的文本（色板回显、导出时重新解析）
//! - `contrast`：APCA / WCAG 对比度，用于选择放大镜文字颜色
//!
//! ## 相等语义
//!
//! 色板按"当前模式下的序列化字符串"去重，而不是按数值元组去重；
//! 因此 `ColorValue` 的 `PartialEq` 只用于测试中的数值比较，业务去重请比较字符串。

mod contrast;
mod error;
mod format;
mod parse;
mod space;

use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use palette::{Lab, Lch, Oklch, Srgb};

pub use contrast::{ContrastAlgorithm, TextColor};
pub use error::ColorError;
pub use format::DEFAULT_PRECISION;
pub use space::{ColorSpace, Mode};

type SrgbF = Srgb<f64>;
type LabF = Lab<D65, f64>;
type LchF = Lch<D65, f64>;
type OklchF = Oklch<f64>;

/// 单个颜色值：色彩空间 + 三个通道。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorValue {
    space: ColorSpace,
    coords: [f64; 3],
}

impl ColorValue {
    /// 以 `[0,1]` 归一化通道构造 sRGB 颜色。
    pub fn srgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(ColorSpace::Srgb, [red, green, blue])
    }

    /// 由 8 位 RGB 像素构造（栅格取样的入口）。
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::srgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    pub fn new(space: ColorSpace, coords: [f64; 3]) -> Self {
        Self { space, coords }
    }

    /// 解析已序列化的颜色字符串。
    ///
    /// # 示例
    /// ```rust
    /// use image_eyedropper::color::{ColorSpace, ColorValue};
    ///
    /// let red = ColorValue::parse("#ff0000")?;
    /// assert_eq!(red.space(), ColorSpace::Srgb);
    /// # Ok::<(), image_eyedropper::color::ColorError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self, ColorError> {
        parse::parse_color(text)
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn coords(&self) -> [f64; 3] {
        self.coords
    }

    /// 转换到目标色彩空间，返回新值。
    pub fn to(&self, space: ColorSpace) -> Self {
        if space == self.space {
            return *self;
        }

        let srgb = self.to_palette_srgb();
        let coords = match space {
            ColorSpace::Srgb => [srgb.red, srgb.green, srgb.blue],
            ColorSpace::Lab => {
                let lab = LabF::from_color_unclamped(srgb);
                [lab.l, lab.a, lab.b]
            }
            ColorSpace::Lch => {
                let lch = LchF::from_color_unclamped(srgb);
                [lch.l, lch.chroma, lch.hue.into_positive_degrees()]
            }
            ColorSpace::Oklch => {
                let oklch = OklchF::from_color_unclamped(srgb);
                [oklch.l, oklch.chroma, oklch.hue.into_positive_degrees()]
            }
        };

        Self { space, coords }
    }

    /// 按模式输出规范文本。
    ///
    /// - `hex`：`#rrggbb`（超出色域时先裁剪）
    /// - 其他：函数式写法，数值保留 `precision` 位有效数字
    ///
    /// # 示例
    /// ```rust
    /// use image_eyedropper::color::{ColorValue, Mode, DEFAULT_PRECISION};
    ///
    /// let green = ColorValue::srgb(0.0, 1.0, 0.0);
    /// assert_eq!(green.serialize(Mode::Hex, DEFAULT_PRECISION), "#00ff00");
    /// assert_eq!(green.serialize(Mode::Srgb, DEFAULT_PRECISION), "rgb(0% 100% 0%)");
    /// ```
    pub fn serialize(&self, mode: Mode, precision: usize) -> String {
        match mode {
            Mode::Hex => format::hex(self.clamped_rgb8()),
            _ => {
                let converted = self.to(mode.target_space());
                format::functional(converted.space, converted.coords, precision)
            }
        }
    }

    /// 放大镜背景用的 CSS 颜色：转到 sRGB 并裁剪到色域。
    pub fn to_css(&self) -> String {
        let [red, green, blue] = self.clamped_srgb();
        format::functional(ColorSpace::Srgb, [red, green, blue], DEFAULT_PRECISION)
    }

    /// 裁剪到 `[0,1]` 的 sRGB 通道。
    pub fn clamped_srgb(&self) -> [f64; 3] {
        let srgb = self.to(ColorSpace::Srgb).coords;
        srgb.map(|channel| {
            if channel.is_nan() {
                0.0
            } else {
                channel.clamp(0.0, 1.0)
            }
        })
    }

    /// 裁剪后的 8 位 RGB。
    pub fn clamped_rgb8(&self) -> [u8; 3] {
        self.clamped_srgb()
            .map(|channel| (channel * 255.0).round() as u8)
    }

    fn to_palette_srgb(&self) -> SrgbF {
        let [c0, c1, c2] = self.coords;
        match self.space {
            ColorSpace::Srgb => SrgbF::new(c0, c1, c2),
            ColorSpace::Lab => SrgbF::from_color_unclamped(LabF::new(c0, c1, c2)),
            ColorSpace::Lch => SrgbF::from_color_unclamped(LchF::new(c0, c1, c2)),
            ColorSpace::Oklch => SrgbF::from_color_unclamped(OklchF::new(c0, c1, c2)),
        }
    }
}

impl std::str::FromStr for ColorValue {
    type Err = ColorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn rgb8_construction_normalizes_channels() {
        let color = ColorValue::from_rgb8(255, 0, 51);
        assert_eq!(color.coords(), [1.0, 0.0, 0.2]);
    }

    #[test]
    fn red_converts_to_expected_lab() {
        let lab = ColorValue::srgb(1.0, 0.0, 0.0).to(ColorSpace::Lab);
        let [l, a, b] = lab.coords();
        assert_close(l, 53.24, 0.05);
        assert_close(a, 80.1, 0.2);
        assert_close(b, 67.2, 0.2);
    }

    #[test]
    fn red_converts_to_expected_oklch() {
        let oklch = ColorValue::srgb(1.0, 0.0, 0.0).to(ColorSpace::Oklch);
        let [l, c, h] = oklch.coords();
        assert_close(l, 0.628, 0.001);
        assert_close(c, 0.2577, 0.001);
        assert_close(h, 29.23, 0.05);
    }

    #[test]
    fn conversion_roundtrip_preserves_srgb() {
        let original = ColorValue::srgb(0.2, 0.4, 0.6);
        for space in [ColorSpace::Lab, ColorSpace::Lch, ColorSpace::Oklch] {
            let back = original.to(space).to(ColorSpace::Srgb);
            for (got, want) in back.coords().iter().zip(original.coords()) {
                assert_close(*got, want, 1e-6);
            }
        }
    }

    #[test]
    fn conversion_to_same_space_is_identity() {
        let lab = ColorValue::new(ColorSpace::Lab, [50.0, 10.0, -10.0]);
        assert_eq!(lab.to(ColorSpace::Lab), lab);
    }

    #[test]
    fn hex_serialization_clamps_out_of_gamut() {
        let vivid = ColorValue::new(ColorSpace::Oklch, [0.9, 0.4, 145.0]);
        let hex = vivid.serialize(Mode::Hex, DEFAULT_PRECISION);
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
    }

    #[test]
    fn serialization_in_every_mode_parses_back() {
        let color = ColorValue::from_rgb8(18, 120, 200);
        for mode in Mode::ALL {
            let text = color.serialize(mode, DEFAULT_PRECISION);
            let parsed = ColorValue::parse(&text).expect("serialized text should parse");
            assert_eq!(
                parsed.serialize(Mode::Hex, DEFAULT_PRECISION),
                color.serialize(Mode::Hex, DEFAULT_PRECISION),
                "mode {mode} produced {text}"
            );
        }
    }

    #[test]
    fn css_output_is_gamut_clamped_rgb() {
        let color = ColorValue::new(ColorSpace::Srgb, [1.2, -0.1, 0.5]);
        assert_eq!(color.to_css(), "rgb(100% 0% 50%)");
    }
}
