//! # 视口几何
//!
//! 画布在窗口中的位置与尺寸（客户区坐标，单位 px）。窗口尺寸变化时按图像宽高比
//! 重新适配：窗口比图像"更宽"时高度占 80vh，否则宽度占 80vw，画布居中。

use serde::{Deserialize, Serialize};

/// 画布占窗口的比例。
const CANVAS_FILL: f64 = 0.8;

/// 画布包围盒，等价于 `getBoundingClientRect()` 的结果。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// 按窗口尺寸与图像宽高比计算居中的画布矩形。
    ///
    /// # 示例
    /// ```rust
    /// use image_eyedropper::viewport::ViewportRect;
    ///
    /// // 宽窗口、方形图：高度占 80%
    /// let rect = ViewportRect::fit_canvas(1000.0, 500.0, 1.0);
    /// assert_eq!((rect.width, rect.height), (400.0, 400.0));
    /// assert_eq!((rect.left, rect.top), (300.0, 50.0));
    /// ```
    pub fn fit_canvas(window_width: f64, window_height: f64, aspect: f64) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };

        let (width, height) = if window_height > 0.0 && window_width / window_height > aspect {
            let height = window_height * CANVAS_FILL;
            (height * aspect, height)
        } else {
            let width = window_width * CANVAS_FILL;
            (width, width / aspect)
        };

        Self {
            left: (window_width - width) / 2.0,
            top: (window_height - height) / 2.0,
            width,
            height,
        }
    }
}
