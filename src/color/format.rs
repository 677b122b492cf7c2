//! # 规范文本输出
//!
//! 规则：
//! - hex 固定输出 6 位小写十六进制
//! - 函数式写法以空格分隔通道：`rgb(R% G% B%)`、`lab(L a b)`、`lch(L C H)`、`oklch(L C H)`
//! - 数值按有效数字截断，整数部分从不截断（`1234.5` → `1235`），尾随 0 去掉
//! - 极坐标空间中彩度近似为 0 时，色相输出 `none`

use super::ColorSpace;

/// 默认有效数字位数。
pub const DEFAULT_PRECISION: usize = 4;

/// 彩度低于此值视为无彩色，色相无意义。
const ACHROMATIC_CHROMA: f64 = 1e-4;

pub(super) fn hex([red, green, blue]: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", red, green, blue)
}

pub(super) fn functional(space: ColorSpace, coords: [f64; 3], precision: usize) -> String {
    let [c0, c1, c2] = coords;
    match space {
        ColorSpace::Srgb => format!(
            "rgb({}% {}% {}%)",
            significant(c0 * 100.0, precision),
            significant(c1 * 100.0, precision),
            significant(c2 * 100.0, precision)
        ),
        ColorSpace::Lab => format!(
            "lab({} {} {})",
            significant(c0, precision),
            significant(c1, precision),
            significant(c2, precision)
        ),
        ColorSpace::Lch | ColorSpace::Oklch => {
            debug_assert!(space.is_polar());
            let hue = if c1.abs() < ACHROMATIC_CHROMA || !c2.is_finite() {
                "none".to_string()
            } else {
                significant(c2, precision)
            };
            format!(
                "{}({} {} {})",
                space.as_str(),
                significant(c0, precision),
                significant(c1, precision),
                hue
            )
        }
    }
}

/// 按有效数字输出十进制数。
pub(crate) fn significant(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return "none".to_string();
    }
    if value == 0.0 || precision == 0 {
        return trim(format!("{:.0}", value));
    }

    let integer_digits = value.abs().log10().floor() as i64 + 1;
    let decimals = (precision as i64 - integer_digits).max(0) as usize;
    trim(format!("{:.*}", decimals, value))
}

fn trim(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_keeps_four_digits() {
        assert_eq!(significant(53.2408, 4), "53.24");
        assert_eq!(significant(0.627955, 4), "0.628");
        assert_eq!(significant(104.5518, 4), "104.6");
        assert_eq!(significant(0.0001234, 4), "0.0001234");
    }

    #[test]
    fn significant_never_truncates_integer_part() {
        assert_eq!(significant(1234.56, 4), "1235");
        assert_eq!(significant(98765.0, 4), "98765");
    }

    #[test]
    fn significant_normalizes_zero_and_negative_zero() {
        assert_eq!(significant(0.0, 4), "0");
        assert_eq!(significant(-0.00001, 2), "-0.00001");
        assert_eq!(significant(-0.0, 4), "0");
    }

    #[test]
    fn significant_handles_rounding_carry() {
        assert_eq!(significant(99.996, 4), "100");
    }

    #[test]
    fn hex_is_lowercase_six_digits() {
        assert_eq!(hex([255, 0, 171]), "#ff00ab");
        assert_eq!(hex([0, 0, 0]), "#000000");
    }

    #[test]
    fn achromatic_hue_is_written_as_none() {
        let text = functional(ColorSpace::Oklch, [0.5, 0.0, 89.0], 4);
        assert_eq!(text, "oklch(0.5 0 none)");
    }
}
