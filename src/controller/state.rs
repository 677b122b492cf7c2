use std::fmt;

/// 交互状态。
///
/// ```text
/// NoImage → Loaded → Hovering ⇄ Previewing → Confirming → Previewing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    NoImage,
    Loaded,
    /// 有图片，指针不在图片或色板上。
    Hovering,
    /// 放大镜显示实时取样。
    Previewing,
    /// 刚刚复制，放大镜显示确认文案，等待计时器到期。
    Confirming,
}

impl PickerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoImage => "no-image",
            Self::Loaded => "loaded",
            Self::Hovering => "hovering",
            Self::Previewing => "previewing",
            Self::Confirming => "confirming",
        }
    }

    pub fn has_image(self) -> bool {
        !matches!(self, Self::NoImage)
    }
}

impl fmt::Display for PickerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
