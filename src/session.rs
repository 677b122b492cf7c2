//! # 会话运行时
//!
//! ## 设计思路
//!
//! 会话拥有控制器、图片加载器与剪贴板，是唯一持有可变状态的对象（没有全局变量）。
//! 所有事件经由同一条 `mpsc` 队列串行交给控制器，因此不需要额外加锁。
//!
//! ## 实现思路
//!
//! - 图片加载是异步的：只有在 `ImageHandler::load` 完成、栅格构建完毕之后才投递
//!   `Event::ImageReady`，失败则投递 `Event::ImageFailed`。
//! - 控制器返回的 `Effect` 在这里执行：
//!   - 剪贴板写入交给唯一的写入任务按提交顺序逐条执行（每条在 `spawn_blocking` 中完成），
//!     失败只记日志（尽力而为）
//!   - 计时器是 `tokio::time::sleep` 任务，到期后把事件投回队列
//!   - 弹窗与重绘请求记录下来，由入口层展示

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::clipboard::ClipboardSink;
use crate::controller::{ControllerConfig, Effect, Event, InteractionController};
use crate::error::AppError;
use crate::image_handler::{ImageError, ImageHandler, ImageLoadError, ImageSource};
use crate::raster::Raster;

pub struct Session {
    controller: InteractionController,
    handler: Arc<ImageHandler>,
    max_width: u32,
    max_height: u32,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    clipboard_tx: mpsc::UnboundedSender<ClipboardJob>,
    alerts: Vec<String>,
    redraws: u64,
}

impl Session {
    /// 创建会话。需要在 tokio 运行时内调用（会启动剪贴板写入任务）。
    pub fn new(
        config: ControllerConfig,
        (max_width, max_height): (u32, u32),
        handler: ImageHandler,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (clipboard_tx, clipboard_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_clipboard_writer(clipboard_rx, clipboard));
        Self {
            controller: InteractionController::new(config),
            handler: Arc::new(handler),
            max_width,
            max_height,
            tx,
            rx,
            clipboard_tx,
            alerts: Vec::new(),
            redraws: 0,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn handler(&self) -> &ImageHandler {
        &self.handler
    }

    /// 事件投递端，可交给其他任务使用。
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// 取出尚未展示的弹窗消息。
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// 加载图片并构建栅格；成功投递 `ImageReady`，失败投递 `ImageFailed`。
    ///
    /// 返回是否加载成功。
    pub async fn load(&mut self, source: ImageSource, redraw: bool) -> bool {
        let event = match self.load_raster(source).await {
            Ok(raster) => Event::ImageReady { raster, redraw },
            Err(err) => Event::ImageFailed(err),
        };
        let loaded = matches!(event, Event::ImageReady { .. });
        self.dispatch(event);
        loaded
    }

    async fn load_raster(&self, source: ImageSource) -> Result<Raster, ImageLoadError> {
        let identifier = source.identifier();
        let decoded = self.handler.load(source).await?;
        let filter = self.handler.config().resize_filter;
        let (max_width, max_height) = (self.max_width, self.max_height);

        tokio::task::spawn_blocking(move || {
            Raster::build(&decoded.image, max_width, max_height, filter)
        })
        .await
        .map_err(|e| {
            ImageLoadError::new(
                identifier.clone(),
                ImageError::Decode(format!("栅格构建线程失败：{}", e)),
            )
        })?
        .map_err(|e| ImageLoadError::new(identifier, e))
    }

    /// 把事件交给控制器并执行返回的副作用。
    pub fn dispatch(&mut self, event: Event) {
        log::debug!("📨 事件: {:?}", EventName(&event));
        for effect in self.controller.handle(event) {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::WriteClipboard(text) => {
                if self.clipboard_tx.send(ClipboardJob::Write(text)).is_err() {
                    log::warn!("⚠️ 剪贴板写入任务已退出，丢弃本次写入");
                }
            }
            Effect::ScheduleConfirmReset { generation, delay } => {
                self.schedule(delay, Event::ConfirmElapsed { generation });
            }
            Effect::ScheduleExportReset { generation, delay } => {
                self.schedule(delay, Event::ExportFeedbackElapsed { generation });
            }
            Effect::RequestRedraw => {
                self.redraws += 1;
                log::debug!("🎬 请求重绘（第 {} 次）", self.redraws);
            }
            Effect::Alert(message) => {
                self.alerts.push(message);
            }
        }
    }

    fn schedule(&self, delay: Duration, event: Event) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // 会话结束后接收端已释放，投递失败可忽略
            let _ = tx.send(event);
        });
    }

    /// 处理队列中已到达的全部事件，不等待。
    pub fn drain(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(event);
        }
    }

    /// 在 `duration` 内持续处理到达的事件（计时器到期等）。
    pub async fn wait(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                received = self.rx.recv() => match received {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
            }
        }
        self.drain();
    }

    /// 等待此前提交的剪贴板写入全部完成。
    pub async fn flush_clipboard(&mut self) -> Result<(), AppError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let closed = || AppError::Clipboard("剪贴板写入任务已退出".to_string());
        self.clipboard_tx
            .send(ClipboardJob::Flush(ack_tx))
            .map_err(|_| closed())?;
        ack_rx.await.map_err(|_| closed())
    }
}

enum ClipboardJob {
    Write(String),
    /// 之前的写入都完成后回执。
    Flush(oneshot::Sender<()>),
}

/// 逐条执行剪贴板写入：上一条完成前不开始下一条，剪贴板最终内容总是最后一次提交。
async fn run_clipboard_writer(
    mut jobs: mpsc::UnboundedReceiver<ClipboardJob>,
    clipboard: Arc<dyn ClipboardSink>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            ClipboardJob::Write(text) => {
                let sink = Arc::clone(&clipboard);
                match tokio::task::spawn_blocking(move || sink.write_text(&text)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => log::warn!("⚠️ 剪贴板写入失败（已忽略）：{}", err),
                    Err(err) => log::warn!("⚠️ 剪贴板写入线程异常：{}", err),
                }
            }
            ClipboardJob::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    log::debug!("📋 剪贴板写入任务结束");
}

/// 日志中只输出事件名，避免把整块栅格打印出来。
struct EventName<'a>(&'a Event);

impl std::fmt::Debug for EventName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Event::ImageReady { raster, .. } => {
                write!(f, "ImageReady({}x{})", raster.width(), raster.height())
            }
            Event::ImageFailed(err) => write!(f, "ImageFailed({})", err.identifier),
            Event::Move { x, y, .. } => write!(f, "Move({x}, {y})"),
            Event::Click { x, y, modifiers, .. } => {
                write!(f, "Click({x}, {y}, shift={})", modifiers.shift)
            }
            other => write!(f, "{other:?}"),
        }
    }
}
