//! # 对比度
//!
//! 放大镜需要在任意背景色上保持文字可读：计算"黑色文字在该颜色上"的 APCA 对比度，
//! 低于阈值时改用白色文字。另提供 WCAG 2.1 对比度比值作为备选算法。

use super::ColorValue;

// APCA 0.0.98G-4g 常量
const APCA_COEFFICIENTS: [f64; 3] = [0.212_672_9, 0.715_152_2, 0.072_175_0];
const APCA_GAMMA: f64 = 2.4;
const BLACK_THRESHOLD: f64 = 0.022;
const BLACK_EXPONENT: f64 = 1.414;
const INPUT_CLAMP: f64 = 0.0005;
const SCALE: f64 = 1.14;
const OFFSET: f64 = 0.027;
const OUTPUT_CLAMP: f64 = 0.1;

/// 对比度算法。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastAlgorithm {
    /// APCA 亮度对比 Lc，范围约 `[-108, 106]`，带符号。
    Apca,
    /// WCAG 2.1 对比度比值，范围 `[1, 21]`，与参数顺序无关。
    Wcag21,
}

/// 放大镜文字颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    White,
    Black,
}

impl TextColor {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl ColorValue {
    /// 以 `self` 为背景、`text` 为文字颜色计算对比度。
    pub fn contrast(&self, text: &ColorValue, algorithm: ContrastAlgorithm) -> f64 {
        match algorithm {
            ContrastAlgorithm::Apca => apca(apca_luminance(text), apca_luminance(self)),
            ContrastAlgorithm::Wcag21 => {
                let a = relative_luminance(self);
                let b = relative_luminance(text);
                let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
                (lighter + 0.05) / (darker + 0.05)
            }
        }
    }

    /// 黑字 APCA 对比度低于 `threshold` 时用白字，否则用黑字。
    pub fn legible_text_color(&self, threshold: f64) -> TextColor {
        let black = ColorValue::srgb(0.0, 0.0, 0.0);
        if self.contrast(&black, ContrastAlgorithm::Apca) < threshold {
            TextColor::White
        } else {
            TextColor::Black
        }
    }
}

fn apca_luminance(color: &ColorValue) -> f64 {
    let channels = color.clamped_srgb();
    APCA_COEFFICIENTS
        .iter()
        .zip(channels)
        .map(|(coefficient, channel)| coefficient * channel.powf(APCA_GAMMA))
        .sum()
}

fn soft_clip_black(luminance: f64) -> f64 {
    if luminance < BLACK_THRESHOLD {
        luminance + (BLACK_THRESHOLD - luminance).powf(BLACK_EXPONENT)
    } else {
        luminance
    }
}

fn apca(text_luminance: f64, background_luminance: f64) -> f64 {
    if text_luminance.is_nan() || background_luminance.is_nan() {
        return 0.0;
    }

    let text = soft_clip_black(text_luminance);
    let background = soft_clip_black(background_luminance);

    if (background - text).abs() < INPUT_CLAMP {
        return 0.0;
    }

    let lc = if background > text {
        // 亮底暗字
        let contrast = SCALE * (background.powf(0.56) - text.powf(0.57));
        if contrast < OUTPUT_CLAMP { 0.0 } else { contrast - OFFSET }
    } else {
        // 暗底亮字
        let contrast = SCALE * (background.powf(0.65) - text.powf(0.62));
        if contrast > -OUTPUT_CLAMP { 0.0 } else { contrast + OFFSET }
    };

    lc * 100.0
}

fn srgb_to_linear(channel: f64) -> f64 {
    if channel <= 0.040_45 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

fn relative_luminance(color: &ColorValue) -> f64 {
    let [r, g, b] = color.clamped_srgb().map(srgb_to_linear);
    0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
}
