//! # 颜色文本解析
//!
//! 支持的输入：
//! - `#rgb` / `#rrggbb` / `#rrggbbaa`（透明度忽略）
//! - `rgb(...)`：百分比或 0~255 数值，逗号或空格分隔
//! - `color(srgb r g b)`
//! - `lab(...)` / `lch(...)` / `oklch(...)`：亮度可写百分比，色相可写 `none`
//!
//! `/ alpha` 部分被忽略，栅格与色板都不携带透明度。

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ColorError, ColorSpace, ColorValue};

static HEX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid hex pattern")
});

static FUNCTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(rgba?|lab|lch|oklch|color)\(\s*([^()]*?)\s*\)$")
        .expect("valid function pattern")
});

pub(super) fn parse_color(text: &str) -> Result<ColorValue, ColorError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ColorError::Parse("空字符串".to_string()));
    }

    if let Some(caps) = HEX_PATTERN.captures(trimmed) {
        return parse_hex(&caps[1]);
    }

    let caps = FUNCTION_PATTERN
        .captures(trimmed)
        .ok_or_else(|| ColorError::Parse(trimmed.to_string()))?;

    let function = caps[1].to_lowercase();
    let body = caps[2].split('/').next().unwrap_or_default();
    let mut args: Vec<&str> = body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    if function == "color" {
        if args.first().map(|space| space.eq_ignore_ascii_case("srgb")) != Some(true) {
            return Err(ColorError::Parse(trimmed.to_string()));
        }
        args.remove(0);
    }

    let [a0, a1, a2] = <[&str; 3]>::try_from(args.as_slice())
        .map_err(|_| ColorError::Parse(format!("通道数量错误：{}", trimmed)))?;

    let invalid = || ColorError::Parse(trimmed.to_string());

    let color = match function.as_str() {
        "rgb" | "rgba" => ColorValue::srgb(
            rgb_channel(a0).ok_or_else(invalid)?,
            rgb_channel(a1).ok_or_else(invalid)?,
            rgb_channel(a2).ok_or_else(invalid)?,
        ),
        "color" => ColorValue::srgb(
            unit_channel(a0).ok_or_else(invalid)?,
            unit_channel(a1).ok_or_else(invalid)?,
            unit_channel(a2).ok_or_else(invalid)?,
        ),
        "lab" => ColorValue::new(
            ColorSpace::Lab,
            [
                lightness(a0, 100.0).ok_or_else(invalid)?,
                number(a1).ok_or_else(invalid)?,
                number(a2).ok_or_else(invalid)?,
            ],
        ),
        "lch" => ColorValue::new(
            ColorSpace::Lch,
            [
                lightness(a0, 100.0).ok_or_else(invalid)?,
                number(a1).ok_or_else(invalid)?,
                hue(a2).ok_or_else(invalid)?,
            ],
        ),
        "oklch" => ColorValue::new(
            ColorSpace::Oklch,
            [
                lightness(a0, 1.0).ok_or_else(invalid)?,
                number(a1).ok_or_else(invalid)?,
                hue(a2).ok_or_else(invalid)?,
            ],
        ),
        _ => return Err(invalid()),
    };

    Ok(color)
}

fn parse_hex(digits: &str) -> Result<ColorValue, ColorError> {
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits[..6].to_string()
    };

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|e| ColorError::Parse(format!("#{}：{}", digits, e)))
    };

    Ok(ColorValue::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn number(token: &str) -> Option<f64> {
    if token.eq_ignore_ascii_case("none") {
        return Some(0.0);
    }
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn percent(token: &str) -> Option<f64> {
    token.strip_suffix('%').and_then(number)
}

/// `rgb()` 通道：百分比 → `[0,1]`，裸数值按 0~255 处理。
fn rgb_channel(token: &str) -> Option<f64> {
    match percent(token) {
        Some(value) => Some(value / 100.0),
        None => number(token).map(|value| value / 255.0),
    }
}

fn unit_channel(token: &str) -> Option<f64> {
    match percent(token) {
        Some(value) => Some(value / 100.0),
        None => number(token),
    }
}

/// 亮度通道：百分比按 `scale` 映射（Lab 为 100，OKLCH 为 1）。
fn lightness(token: &str, scale: f64) -> Option<f64> {
    match percent(token) {
        Some(value) => Some(value / 100.0 * scale),
        None => number(token),
    }
}

fn hue(token: &str) -> Option<f64> {
    let token = token.strip_suffix("deg").unwrap_or(token);
    number(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_and_three_digit_hex() {
        assert_eq!(parse_color("#ff0000").ok(), Some(ColorValue::srgb(1.0, 0.0, 0.0)));
        assert_eq!(parse_color("#0f0").ok(), Some(ColorValue::srgb(0.0, 1.0, 0.0)));
        assert_eq!(parse_color("#0000ff80").ok(), Some(ColorValue::srgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn parses_percent_and_legacy_rgb() {
        assert_eq!(
            parse_color("rgb(100% 0% 50%)").ok(),
            Some(ColorValue::srgb(1.0, 0.0, 0.5))
        );
        assert!(
            parse_color("rgba(255, 0, 0, 0.5)").is_err(),
            "legacy alpha as fourth comma argument is not supported"
        );
        assert_eq!(
            parse_color("rgb(255, 0, 0)").ok(),
            Some(ColorValue::srgb(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn parses_polar_spaces_with_none_hue() {
        let color = parse_color("oklch(0.5 0 none)").expect("should parse");
        assert_eq!(color.space(), ColorSpace::Oklch);
        assert_eq!(color.coords(), [0.5, 0.0, 0.0]);

        let color = parse_color("lch(53.24 104.6 39.99deg)").expect("should parse");
        assert_eq!(color.coords(), [53.24, 104.6, 39.99]);
    }

    #[test]
    fn percent_lightness_is_scaled_per_space() {
        let lab = parse_color("lab(50% 10 -10)").expect("should parse");
        assert_eq!(lab.coords(), [50.0, 10.0, -10.0]);

        let oklch = parse_color("oklch(62.8% 0.2577 29.23)").expect("should parse");
        assert!((oklch.coords()[0] - 0.628).abs() < 1e-12);
    }

    #[test]
    fn alpha_component_is_ignored() {
        let color = parse_color("lab(50 10 -10 / 0.5)").expect("should parse");
        assert_eq!(color.coords(), [50.0, 10.0, -10.0]);
    }

    #[test]
    fn color_function_requires_srgb_space() {
        assert!(parse_color("color(srgb 1 0 0)").is_ok());
        assert!(matches!(
            parse_color("color(display-p3 1 0 0)"),
            Err(ColorError::Parse(_))
        ));
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        for bad in ["", "#12", "#ggg", "rgb(1 2)", "hsl(10 20% 30%)", "lab(a b c)", "oklch(1 2 3"] {
            assert!(
                matches!(parse_color(bad), Err(ColorError::Parse(_))),
                "{bad:?} should not parse"
            );
        }
    }
}
