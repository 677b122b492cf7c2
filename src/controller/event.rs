//! 控制器的输入事件与输出副作用。
//!
//! 所有外部输入（指针、点击、图片加载完成、计时器到期、窗口缩放）都被建模为
//! `Event` 变体，按顺序送入 `InteractionController::handle`；
//! 控制器不直接做 I/O，而是返回 `Effect` 列表交给会话执行。

use std::time::Duration;

use crate::color::Mode;
use crate::image_handler::ImageLoadError;
use crate::raster::Raster;

/// 点击时的修饰键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false };
    pub const SHIFT: Self = Self { shift: true };
}

#[derive(Debug)]
pub enum Event {
    /// 栅格构建完成。`redraw` 为 true 时请求重绘一帧。
    ImageReady { raster: Raster, redraw: bool },
    /// 图片加载或解码失败。
    ImageFailed(ImageLoadError),
    /// 指针移动；`swatch` 为指针下方色板的记录字符串。
    Move {
        x: f64,
        y: f64,
        swatch: Option<String>,
    },
    Click {
        x: f64,
        y: f64,
        modifiers: Modifiers,
        swatch: Option<String>,
    },
    /// "已复制"提示到期。
    ConfirmElapsed { generation: u64 },
    SetMode(Mode),
    Resize { window_width: f64, window_height: f64 },
    RemoveSwatch(String),
    /// 以 JSON 导出全部色板到剪贴板。
    Export,
    /// 导出按钮 "copied!" 提示到期。
    ExportFeedbackElapsed { generation: u64 },
}

/// 控制器要求会话执行的副作用。
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    WriteClipboard(String),
    /// 在 `delay` 后投递 `Event::ConfirmElapsed { generation }`。
    ScheduleConfirmReset { generation: u64, delay: Duration },
    /// 在 `delay` 后投递 `Event::ExportFeedbackElapsed { generation }`。
    ScheduleExportReset { generation: u64, delay: Duration },
    RequestRedraw,
    /// 阻塞式提示（图片加载失败）。
    Alert(String),
}
