//! # 图片取色器：应用入口
//!
//! 本文件仅负责命令行解析、日志初始化与会话装配。
//! 事件从标准输入逐行读取（见 `script` 模块），每条命令执行后向标准输出打印一行 JSON 状态；
//! 日志输出到标准错误。

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use image_eyedropper::clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
use image_eyedropper::color::Mode;
use image_eyedropper::error::AppError;
use image_eyedropper::image_handler::{ImageConfig, ImageHandler, ImageSource, ResampleQuality};
use image_eyedropper::script::{self, ScriptCommand, StatusReport};
use image_eyedropper::session::Session;
use image_eyedropper::settings::{MaxSize, PickerSettings};

#[derive(Debug, Parser)]
#[command(name = "image-eyedropper", version, about)]
struct Cli {
    /// 启动时加载的图片（本地路径、http(s) URL 或 data URL）
    #[arg(short, long)]
    image: Option<String>,

    /// JSON 设置文件
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// 栅格尺寸上限：`2048` 或 `1920x1080`
    #[arg(long, value_parser = parse_max_size)]
    max_size: Option<MaxSize>,

    /// 初始模式：hex / srgb / lab / lch / oklch
    #[arg(short, long)]
    mode: Option<Mode>,

    /// 重采样档位：quality / balanced / speed
    #[arg(short, long)]
    quality: Option<ResampleQuality>,

    /// 窗口尺寸，如 `1280x800`
    #[arg(long, value_parser = parse_window)]
    window: Option<(f64, f64)>,

    /// 不写系统剪贴板，仅在日志中记录
    #[arg(long)]
    no_clipboard: bool,
}

fn parse_pair(text: &str) -> Option<(&str, &str)> {
    text.split_once(['x', 'X'])
        .map(|(width, height)| (width.trim(), height.trim()))
}

fn parse_max_size(text: &str) -> Result<MaxSize, String> {
    let invalid = || format!("无效尺寸：{}（示例：2048 或 1920x1080）", text);
    match parse_pair(text) {
        Some((width, height)) => {
            let width = width.parse::<u32>().map_err(|_| invalid())?;
            let height = height.parse::<u32>().map_err(|_| invalid())?;
            Ok(MaxSize::Bounds([width, height]))
        }
        None => text.trim().parse::<u32>().map(MaxSize::Uniform).map_err(|_| invalid()),
    }
}

fn parse_window(text: &str) -> Result<(f64, f64), String> {
    let invalid = || format!("无效窗口尺寸：{}（示例：1280x800）", text);
    let (width, height) = parse_pair(text).ok_or_else(invalid)?;
    let width = width.parse::<f64>().map_err(|_| invalid())?;
    let height = height.parse::<f64>().map_err(|_| invalid())?;
    Ok((width, height))
}

fn resolve_settings(cli: &Cli) -> Result<PickerSettings, AppError> {
    let mut settings = match &cli.settings {
        Some(path) => PickerSettings::load(path)?,
        None => PickerSettings::default(),
    };

    if let Some(image) = &cli.image {
        settings.url = Some(image.clone());
    }
    if let Some(max_size) = cli.max_size {
        settings.max_size = max_size;
    }
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    if let Some(quality) = cli.quality {
        settings.quality = Some(quality.as_str().to_string());
    }
    if let Some((width, height)) = cli.window {
        settings.window_width = width;
        settings.window_height = height;
    }

    settings.validate()?;
    Ok(settings)
}

fn print_status(session: &mut Session) -> Result<(), AppError> {
    let report = StatusReport::capture(session);
    let line = serde_json::to_string(&report)
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
    println!("{}", line);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = resolve_settings(&cli)?;

    let mut image_config = ImageConfig::default();
    image_config.apply_resample_quality(settings.resample_quality()?);

    let clipboard: Arc<dyn ClipboardSink> = if cli.no_clipboard {
        log::info!("📋 已禁用系统剪贴板，写入仅记录在内存中");
        Arc::new(MemoryClipboard::new())
    } else {
        Arc::new(SystemClipboard::default())
    };

    let mut session = Session::new(
        settings.controller_config(),
        settings.max_size.bounds(),
        ImageHandler::new(image_config),
        clipboard,
    );

    if let Some(location) = &settings.url {
        session.load(ImageSource::from_location(location), false).await;
    }
    print_status(&mut session)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        session.drain();

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let command = match trimmed.parse::<ScriptCommand>() {
            Ok(command) => command,
            Err(err) => {
                log::warn!("⚠️ 忽略无效命令 `{}`：{}", trimmed, err);
                continue;
            }
        };

        if command == ScriptCommand::Swatches {
            let json = serde_json::to_string(&session.controller().swatches().texts())
                .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
            println!("{}", json);
            continue;
        }

        if !script::run_command(&mut session, command).await {
            break;
        }
        print_status(&mut session)?;
    }

    session.flush_clipboard().await?;
    log::info!("👋 会话结束，共 {} 个色板", session.controller().swatches().len());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ {}", err);
            ExitCode::FAILURE
        }
    }
}
