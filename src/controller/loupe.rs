//! 放大镜视图模型。
//!
//! 放大镜贴在画布下方 10px，与画布同宽（取整），高 24px；
//! 显示期间光标为十字准星。

use serde::Serialize;

use crate::color::TextColor;
use crate::viewport::ViewportRect;

pub const LOUPE_HEIGHT: f64 = 24.0;
const LOUPE_GAP: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoupeView {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// CSS 背景色（sRGB 裁剪后）。
    pub background: String,
    pub text: String,
    #[serde(serialize_with = "serialize_text_color")]
    pub text_color: TextColor,
}

impl Default for LoupeView {
    fn default() -> Self {
        Self {
            visible: false,
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: LOUPE_HEIGHT,
            background: String::new(),
            text: String::new(),
            text_color: TextColor::White,
        }
    }
}

impl LoupeView {
    /// 跟随画布矩形摆放。
    pub fn place(&mut self, rect: &ViewportRect) {
        self.left = rect.left;
        self.top = rect.bottom() + LOUPE_GAP;
        self.width = rect.width.round();
    }

    pub fn cursor(&self) -> &'static str {
        if self.visible { "crosshair" } else { "default" }
    }
}

fn serialize_text_color<S>(color: &TextColor, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(color.as_css())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loupe_sits_below_canvas_with_rounded_width() {
        let mut loupe = LoupeView::default();
        loupe.place(&ViewportRect::new(12.0, 30.0, 200.6, 100.0));

        assert_eq!(loupe.left, 12.0);
        assert_eq!(loupe.top, 140.0);
        assert_eq!(loupe.width, 201.0);
    }

    #[test]
    fn cursor_follows_visibility() {
        let mut loupe = LoupeView::default();
        assert_eq!(loupe.cursor(), "default");
        loupe.visible = true;
        assert_eq!(loupe.cursor(), "crosshair");
    }
}
