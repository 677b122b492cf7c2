//! # 事件脚本
//!
//! 无界面运行时，用逐行文本命令驱动会话：
//!
//! | 命令 | 含义 |
//! |------|------|
//! | `move <x> <y> [swatch]` | 指针移动；带 `swatch` 表示悬停在该色板上 |
//! | `click <x> <y> [swatch]` | 点击取色 |
//! | `shift-click <x> <y> <swatch>` | 删除色板 |
//! | `mode <hex\|srgb\|lab\|lch\|oklch>` | 切换模式 |
//! | `drop <path>` | 模拟拖入文件 |
//! | `url <location>` | 从 URL / 路径 / data URL 加载 |
//! | `resize <w> <h>` | 窗口尺寸变化 |
//! | `export` | 导出色板 JSON 到剪贴板 |
//! | `remove <swatch>` | 删除色板 |
//! | `wait <ms>` | 等待并处理到期的计时器 |
//! | `swatches` | 打印色板列表 |
//! | `quit` | 结束 |
//!
//! 坐标之后的剩余文本整体作为色板字符串（可含空格，如 `rgb(100% 0% 0%)`）。

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::color::Mode;
use crate::controller::{Event, LoupeView, Modifiers};
use crate::image_handler::{ImageError, ImageLoadError, ImageSource};
use crate::session::Session;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScriptError {
    #[error("未知命令: {0}")]
    UnknownCommand(String),

    #[error("用法: {0}")]
    Usage(&'static str),

    #[error("无效数值: {0}")]
    InvalidNumber(String),

    #[error("{0}")]
    InvalidMode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Move {
        x: f64,
        y: f64,
        swatch: Option<String>,
    },
    Click {
        x: f64,
        y: f64,
        shift: bool,
        swatch: Option<String>,
    },
    Mode(Mode),
    Drop(PathBuf),
    Load(String),
    Resize { width: f64, height: f64 },
    Export,
    Remove(String),
    Wait(Duration),
    Swatches,
    Quit,
}

impl FromStr for ScriptCommand {
    type Err = ScriptError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((line, ""));

        match name.to_ascii_lowercase().as_str() {
            "move" => {
                let (x, y, swatch) = parse_point(rest, "move <x> <y> [swatch]")?;
                Ok(Self::Move { x, y, swatch })
            }
            "click" | "shift-click" => {
                let (x, y, swatch) = parse_point(rest, "click <x> <y> [swatch]")?;
                Ok(Self::Click {
                    x,
                    y,
                    shift: name.eq_ignore_ascii_case("shift-click"),
                    swatch,
                })
            }
            "mode" => rest
                .parse()
                .map(Self::Mode)
                .map_err(|e: crate::color::ColorError| ScriptError::InvalidMode(e.to_string())),
            "drop" => non_empty(rest, "drop <path>").map(|path| Self::Drop(PathBuf::from(path))),
            "url" | "load" => non_empty(rest, "url <location>").map(|loc| Self::Load(loc.to_string())),
            "resize" => {
                let mut parts = rest.split_whitespace();
                let width = parse_number(parts.next(), "resize <width> <height>")?;
                let height = parse_number(parts.next(), "resize <width> <height>")?;
                Ok(Self::Resize { width, height })
            }
            "export" => Ok(Self::Export),
            "remove" => non_empty(rest, "remove <swatch>").map(|text| Self::Remove(text.to_string())),
            "wait" => {
                let ms = rest
                    .parse::<u64>()
                    .map_err(|_| ScriptError::InvalidNumber(rest.to_string()))?;
                Ok(Self::Wait(Duration::from_millis(ms)))
            }
            "swatches" => Ok(Self::Swatches),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ScriptError::UnknownCommand(other.to_string())),
        }
    }
}

fn non_empty<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ScriptError> {
    if rest.is_empty() {
        Err(ScriptError::Usage(usage))
    } else {
        Ok(rest)
    }
}

fn parse_number(token: Option<&str>, usage: &'static str) -> Result<f64, ScriptError> {
    let token = token.ok_or(ScriptError::Usage(usage))?;
    token
        .parse::<f64>()
        .map_err(|_| ScriptError::InvalidNumber(token.to_string()))
}

fn parse_point(rest: &str, usage: &'static str) -> Result<(f64, f64, Option<String>), ScriptError> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let x = parse_number(parts.next().filter(|p| !p.is_empty()), usage)?;
    let y = parse_number(parts.next(), usage)?;
    let swatch = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok((x, y, swatch))
}

/// 每条命令执行后输出的状态快照。
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub state: String,
    pub mode: Mode,
    pub loupe: LoupeView,
    pub cursor: &'static str,
    pub swatches: Vec<String>,
    pub export: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<String>,
}

impl StatusReport {
    pub fn capture(session: &mut Session) -> Self {
        let alerts = session.take_alerts();
        let controller = session.controller();
        Self {
            state: controller.state().to_string(),
            mode: controller.mode(),
            loupe: controller.loupe().clone(),
            cursor: controller.loupe().cursor(),
            swatches: controller
                .swatches()
                .texts()
                .into_iter()
                .map(str::to_string)
                .collect(),
            export: controller
                .export_visible()
                .then(|| controller.export_label()),
            alerts,
        }
    }
}

/// 执行一条命令。返回 `false` 表示脚本结束。
pub async fn run_command(session: &mut Session, command: ScriptCommand) -> bool {
    match command {
        ScriptCommand::Move { x, y, swatch } => session.dispatch(Event::Move { x, y, swatch }),
        ScriptCommand::Click { x, y, shift, swatch } => session.dispatch(Event::Click {
            x,
            y,
            modifiers: Modifiers { shift },
            swatch,
        }),
        ScriptCommand::Mode(mode) => session.dispatch(Event::SetMode(mode)),
        ScriptCommand::Drop(path) => drop_file(session, &path).await,
        ScriptCommand::Load(location) => {
            session.load(ImageSource::from_location(&location), true).await;
        }
        ScriptCommand::Resize { width, height } => session.dispatch(Event::Resize {
            window_width: width,
            window_height: height,
        }),
        ScriptCommand::Export => session.dispatch(Event::Export),
        ScriptCommand::Remove(text) => session.dispatch(Event::RemoveSwatch(text)),
        ScriptCommand::Wait(duration) => session.wait(duration).await,
        ScriptCommand::Swatches => {}
        ScriptCommand::Quit => return false,
    }
    true
}

/// 模拟拖放：读取文件字节后按拖入文件加载；读取失败同样以加载失败提示。
async fn drop_file(session: &mut Session, path: &Path) {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match std::fs::read(path) {
        Ok(bytes) => {
            session
                .load(ImageSource::Dropped { name, bytes }, true)
                .await;
        }
        Err(err) => session.dispatch(Event::ImageFailed(ImageLoadError::new(
            name,
            ImageError::FileSystem(format!("无法读取拖入的文件：{}", err)),
        ))),
    }
}
