//! # 交互控制器（controller）
//!
//! ## 设计思路
//!
//! 控制器是一个纯状态机：`handle(&mut self, Event) -> Vec<Effect>`。
//! 它持有当前栅格、色板、模式与放大镜视图模型，但不做任何 I/O；
//! 剪贴板写入、计时器、重绘、弹窗都以 `Effect` 的形式交给会话层执行。
//! 这样事件处理天然串行，测试时也无需真实时钟或剪贴板。
//!
//! ## 计时器
//!
//! "已复制"提示与导出按钮提示都用代数（generation）标记：
//! 每次提交都让代数 +1 并安排新的到期事件，到期事件代数不匹配时直接丢弃。
//! 效果等价于"取消旧计时器并重新计时"。

mod event;
mod loupe;
mod state;

use std::time::Duration;

use crate::color::{ColorValue, DEFAULT_PRECISION, Mode};
use crate::raster::Raster;
use crate::sampler::{PointerSampler, SampleResult};
use crate::swatch::SwatchSet;
use crate::viewport::ViewportRect;

pub use event::{Effect, Event, Modifiers};
pub use loupe::{LOUPE_HEIGHT, LoupeView};
pub use state::PickerState;

/// 提交后放大镜显示的确认文案。
pub const CONFIRM_TEXT: &str = "Copied to clipboard!";
pub const EXPORT_LABEL: &str = "copy";
pub const EXPORT_COPIED_LABEL: &str = "copied!";

/// 控制器参数。
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// 初始模式。
    pub mode: Mode,
    /// 函数式写法的有效数字位数。
    pub precision: usize,
    /// "已复制"提示时长。
    pub confirm_delay: Duration,
    /// 黑字 APCA 对比度低于该值时改用白字。
    pub contrast_threshold: f64,
    pub window_width: f64,
    pub window_height: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            precision: DEFAULT_PRECISION,
            confirm_delay: Duration::from_millis(1500),
            contrast_threshold: 50.0,
            window_width: 1280.0,
            window_height: 800.0,
        }
    }
}

pub struct InteractionController {
    config: ControllerConfig,
    state: PickerState,
    mode: Mode,
    raster: Option<Raster>,
    sampler: PointerSampler,
    swatches: SwatchSet,
    loupe: LoupeView,
    current: Option<ColorValue>,
    live_text: String,
    copying: bool,
    confirm_generation: u64,
    export_copied: bool,
    export_generation: u64,
}

impl InteractionController {
    pub fn new(config: ControllerConfig) -> Self {
        let rect = ViewportRect::fit_canvas(config.window_width, config.window_height, 1.0);
        let mut loupe = LoupeView::default();
        loupe.place(&rect);

        Self {
            mode: config.mode,
            config,
            state: PickerState::NoImage,
            raster: None,
            sampler: PointerSampler::new(rect),
            swatches: SwatchSet::new(),
            loupe,
            current: None,
            live_text: String::new(),
            copying: false,
            confirm_generation: 0,
            export_copied: false,
            export_generation: 0,
        }
    }

    /// 处理一个事件，返回需要执行的副作用。
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::ImageReady { raster, redraw } => self.on_image_ready(raster, redraw),
            Event::ImageFailed(err) => {
                log::error!("❌ {}", err);
                vec![Effect::Alert(err.to_string())]
            }
            Event::Move { x, y, swatch } => {
                self.update_pointer(x, y, swatch.as_deref());
                Vec::new()
            }
            Event::Click {
                x,
                y,
                modifiers,
                swatch,
            } => self.on_click(x, y, modifiers, swatch),
            Event::ConfirmElapsed { generation } => {
                self.on_confirm_elapsed(generation);
                Vec::new()
            }
            Event::SetMode(mode) => {
                log::debug!("🎛️ 模式切换: {} -> {}", self.mode, mode);
                self.mode = mode;
                Vec::new()
            }
            Event::Resize {
                window_width,
                window_height,
            } => {
                self.on_resize(window_width, window_height);
                Vec::new()
            }
            Event::RemoveSwatch(text) => {
                self.swatches.remove(&text);
                Vec::new()
            }
            Event::Export => self.on_export(),
            Event::ExportFeedbackElapsed { generation } => {
                if generation == self.export_generation {
                    self.export_copied = false;
                }
                Vec::new()
            }
        }
    }

    fn on_image_ready(&mut self, raster: Raster, redraw: bool) -> Vec<Effect> {
        log::info!(
            "🖼️ 图片就绪 - 栅格 {}x{}（原图 {}x{}）",
            raster.width(),
            raster.height(),
            raster.source_width(),
            raster.source_height()
        );

        let rect = ViewportRect::fit_canvas(
            self.config.window_width,
            self.config.window_height,
            raster.aspect(),
        );
        self.sampler.set_rect(rect);
        self.loupe.place(&rect);
        self.raster = Some(raster);

        self.loupe.visible = false;
        self.current = None;
        self.copying = false;
        // 作废仍在途中的确认计时器
        self.confirm_generation += 1;
        self.state = PickerState::Loaded;

        if redraw {
            vec![Effect::RequestRedraw]
        } else {
            Vec::new()
        }
    }

    fn update_pointer(&mut self, x: f64, y: f64, swatch: Option<&str>) {
        let result = self.sampler.locate(self.raster.as_ref(), x, y, swatch);
        self.apply_sample(result);
    }

    fn apply_sample(&mut self, result: SampleResult) {
        self.loupe.place(&self.sampler.rect());
        self.loupe.visible = !result.is_outside();
        self.current = result.color();

        if let Some(color) = self.current {
            self.live_text = color.serialize(self.mode, self.config.precision);
            self.loupe.background = color.to_css();
            self.loupe.text_color = color.legible_text_color(self.config.contrast_threshold);
            if !self.copying {
                self.loupe.text = self.live_text.clone();
            }
        }

        self.state = self.resting_state();
    }

    /// 非确认期间应处的状态。
    fn resting_state(&self) -> PickerState {
        if self.copying {
            PickerState::Confirming
        } else if self.loupe.visible {
            PickerState::Previewing
        } else if self.raster.is_some() {
            PickerState::Hovering
        } else {
            PickerState::NoImage
        }
    }

    fn on_click(
        &mut self,
        x: f64,
        y: f64,
        modifiers: Modifiers,
        swatch: Option<String>,
    ) -> Vec<Effect> {
        if modifiers.shift {
            if let Some(text) = swatch {
                self.swatches.remove(&text);
                return Vec::new();
            }
        }

        self.update_pointer(x, y, swatch.as_deref());

        let Some(color) = self.current else {
            return Vec::new();
        };
        if !self.loupe.visible {
            return Vec::new();
        }

        let text = self.live_text.clone();
        log::info!("📋 取色提交: {}", text);
        self.swatches.add(text.clone(), color);

        self.copying = true;
        self.loupe.text = CONFIRM_TEXT.to_string();
        self.confirm_generation += 1;
        self.state = PickerState::Confirming;

        vec![
            Effect::WriteClipboard(text),
            Effect::ScheduleConfirmReset {
                generation: self.confirm_generation,
                delay: self.config.confirm_delay,
            },
        ]
    }

    fn on_confirm_elapsed(&mut self, generation: u64) {
        if generation != self.confirm_generation || !self.copying {
            log::debug!("⏱️ 忽略过期的确认计时器 generation={}", generation);
            return;
        }

        self.copying = false;
        self.loupe.text = self.live_text.clone();
        self.state = self.resting_state();
    }

    fn on_resize(&mut self, window_width: f64, window_height: f64) {
        self.config.window_width = window_width;
        self.config.window_height = window_height;

        let aspect = self.raster.as_ref().map(Raster::aspect).unwrap_or(1.0);
        let rect = ViewportRect::fit_canvas(window_width, window_height, aspect);
        log::debug!(
            "📐 窗口 {}x{}，画布 {:.1}x{:.1} @ ({:.1}, {:.1})",
            window_width,
            window_height,
            rect.width,
            rect.height,
            rect.left,
            rect.top
        );
        self.sampler.set_rect(rect);
        // 以图外坐标重新取样：隐藏放大镜
        self.update_pointer(-1.0, -1.0, None);
    }

    fn on_export(&mut self) -> Vec<Effect> {
        if self.swatches.is_empty() {
            log::debug!("📤 色板为空，忽略导出");
            return Vec::new();
        }

        let json = match self.swatches.export_json(self.mode, self.config.precision) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("⚠️ 色板导出失败：{}", err);
                return Vec::new();
            }
        };

        log::info!("📤 导出 {} 个色板（{}）", self.swatches.len(), self.mode);
        self.export_copied = true;
        self.export_generation += 1;

        vec![
            Effect::WriteClipboard(json),
            Effect::ScheduleExportReset {
                generation: self.export_generation,
                delay: self.config.confirm_delay,
            },
        ]
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn swatches(&self) -> &SwatchSet {
        &self.swatches
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn loupe(&self) -> &LoupeView {
        &self.loupe
    }

    pub fn viewport(&self) -> ViewportRect {
        self.sampler.rect()
    }

    pub fn current_color(&self) -> Option<ColorValue> {
        self.current
    }

    pub fn is_copying(&self) -> bool {
        self.copying
    }

    pub fn precision(&self) -> usize {
        self.config.precision
    }

    /// 导出按钮仅在有色板时显示。
    pub fn export_visible(&self) -> bool {
        !self.swatches.is_empty()
    }

    pub fn export_label(&self) -> &'static str {
        if self.export_copied {
            EXPORT_COPIED_LABEL
        } else {
            EXPORT_LABEL
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops::FilterType;
    use image::{DynamicImage, ImageBuffer, Rgba};

    /// 左半绿色、右半红色的 4x2 栅格。
    fn split_raster() -> Raster {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_fn(4, 2, |x, _| {
            if x < 2 { Rgba([0, 255, 0, 255]) } else { Rgba([255, 0, 0, 255]) }
        }));
        Raster::build(&img, 2048, 2048, FilterType::Nearest).expect("build should succeed")
    }

    fn loaded() -> InteractionController {
        let mut controller = InteractionController::new(ControllerConfig {
            window_width: 1000.0,
            window_height: 1000.0,
            ..ControllerConfig::default()
        });
        controller.handle(Event::ImageReady {
            raster: split_raster(),
            redraw: false,
        });
        controller
    }

    /// 画布中左侧绿色区域内的一点。
    fn green_point(controller: &InteractionController) -> (f64, f64) {
        let rect = controller.viewport();
        (rect.left + rect.width * 0.1, rect.top + rect.height * 0.5)
    }

    fn click_at(controller: &mut InteractionController, (x, y): (f64, f64)) -> Vec<Effect> {
        controller.handle(Event::Click {
            x,
            y,
            modifiers: Modifiers::NONE,
            swatch: None,
        })
    }

    #[test]
    fn starts_without_image() {
        let controller = InteractionController::default();
        assert_eq!(controller.state(), PickerState::NoImage);
        assert!(!controller.loupe().visible);
        assert!(!controller.export_visible());
    }

    #[test]
    fn image_ready_enters_loaded_and_requests_redraw() {
        let mut controller = InteractionController::default();
        let effects = controller.handle(Event::ImageReady {
            raster: split_raster(),
            redraw: true,
        });

        assert_eq!(effects, vec![Effect::RequestRedraw]);
        assert_eq!(controller.state(), PickerState::Loaded);
        assert!((controller.viewport().width / controller.viewport().height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn move_inside_previews_and_outside_hides() {
        let mut controller = loaded();
        let (x, y) = green_point(&controller);

        controller.handle(Event::Move { x, y, swatch: None });
        assert_eq!(controller.state(), PickerState::Previewing);
        assert!(controller.loupe().visible);
        assert_eq!(controller.loupe().text, "#00ff00");
        assert_eq!(controller.loupe().cursor(), "crosshair");

        controller.handle(Event::Move {
            x: -5.0,
            y: -5.0,
            swatch: None,
        });
        assert_eq!(controller.state(), PickerState::Hovering);
        assert!(!controller.loupe().visible);
    }

    #[test]
    fn commit_records_swatch_once_and_copies() {
        let mut controller = loaded();
        let point = green_point(&controller);

        let effects = click_at(&mut controller, point);
        assert_eq!(effects[0], Effect::WriteClipboard("#00ff00".to_string()));
        assert!(matches!(
            effects[1],
            Effect::ScheduleConfirmReset { generation: 2, .. }
        ));
        assert_eq!(controller.state(), PickerState::Confirming);
        assert_eq!(controller.loupe().text, CONFIRM_TEXT);
        assert_eq!(controller.swatches().texts(), vec!["#00ff00"]);

        click_at(&mut controller, point);
        assert_eq!(controller.swatches().len(), 1);
    }

    #[test]
    fn click_outside_commits_nothing() {
        let mut controller = loaded();
        let effects = click_at(&mut controller, (-10.0, -10.0));

        assert!(effects.is_empty());
        assert!(controller.swatches().is_empty());
    }

    #[test]
    fn stale_confirm_timer_is_ignored() {
        let mut controller = loaded();
        let point = green_point(&controller);

        click_at(&mut controller, point);
        let effects = click_at(&mut controller, point);
        let Effect::ScheduleConfirmReset { generation, .. } = effects[1] else {
            panic!("expected confirm timer, got {effects:?}");
        };

        controller.handle(Event::ConfirmElapsed {
            generation: generation - 1,
        });
        assert_eq!(controller.state(), PickerState::Confirming);

        controller.handle(Event::ConfirmElapsed { generation });
        assert_eq!(controller.state(), PickerState::Previewing);
        assert_eq!(controller.loupe().text, "#00ff00");
        assert!(!controller.is_copying());
    }

    #[test]
    fn move_during_confirm_keeps_confirmation_text() {
        let mut controller = loaded();
        let point = green_point(&controller);
        click_at(&mut controller, point);

        let rect = controller.viewport();
        controller.handle(Event::Move {
            x: rect.left + rect.width * 0.9,
            y: rect.top + rect.height * 0.5,
            swatch: None,
        });
        assert_eq!(controller.loupe().text, CONFIRM_TEXT);
        assert_eq!(controller.state(), PickerState::Confirming);

        controller.handle(Event::ConfirmElapsed { generation: 2 });
        assert_eq!(controller.loupe().text, "#ff0000");
    }

    #[test]
    fn mode_change_affects_only_new_swatches() {
        let mut controller = loaded();
        let point = green_point(&controller);
        click_at(&mut controller, point);

        controller.handle(Event::SetMode(Mode::Srgb));
        click_at(&mut controller, point);

        assert_eq!(
            controller.swatches().texts(),
            vec!["#00ff00", "rgb(0% 100% 0%)"]
        );
    }

    #[test]
    fn shift_click_on_swatch_removes_it_without_commit() {
        let mut controller = loaded();
        let point = green_point(&controller);
        click_at(&mut controller, point);

        let effects = controller.handle(Event::Click {
            x: 5.0,
            y: 995.0,
            modifiers: Modifiers::SHIFT,
            swatch: Some("#00ff00".to_string()),
        });

        assert!(effects.is_empty());
        assert!(controller.swatches().is_empty());
        assert!(!controller.export_visible());
    }

    #[test]
    fn hovering_a_swatch_previews_its_color() {
        let mut controller = loaded();
        controller.handle(Event::Move {
            x: 5.0,
            y: 995.0,
            swatch: Some("rgb(100% 0% 0%)".to_string()),
        });

        assert_eq!(controller.state(), PickerState::Previewing);
        assert_eq!(controller.loupe().text, "#ff0000");
    }

    #[test]
    fn resize_refits_canvas_and_hides_loupe() {
        let mut controller = loaded();
        let point = green_point(&controller);
        controller.handle(Event::Move {
            x: point.0,
            y: point.1,
            swatch: None,
        });

        controller.handle(Event::Resize {
            window_width: 2000.0,
            window_height: 500.0,
        });

        let rect = controller.viewport();
        assert_eq!(rect.height, 400.0);
        assert_eq!(rect.width, 800.0);
        assert!(!controller.loupe().visible);
        assert_eq!(controller.loupe().top, rect.bottom() + 10.0);
    }

    #[test]
    fn export_copies_json_in_current_mode() {
        let mut controller = loaded();
        assert!(controller.handle(Event::Export).is_empty());

        let point = green_point(&controller);
        click_at(&mut controller, point);
        controller.handle(Event::SetMode(Mode::Srgb));

        let effects = controller.handle(Event::Export);
        assert_eq!(
            effects[0],
            Effect::WriteClipboard(r#"["rgb(0% 100% 0%)"]"#.to_string())
        );
        assert_eq!(controller.export_label(), EXPORT_COPIED_LABEL);

        controller.handle(Event::ExportFeedbackElapsed { generation: 1 });
        assert_eq!(controller.export_label(), EXPORT_LABEL);
    }

    #[test]
    fn reload_keeps_swatches_and_resets_preview() {
        let mut controller = loaded();
        let point = green_point(&controller);
        click_at(&mut controller, point);

        controller.handle(Event::ImageReady {
            raster: split_raster(),
            redraw: false,
        });

        assert_eq!(controller.state(), PickerState::Loaded);
        assert!(!controller.is_copying());
        assert!(!controller.loupe().visible);
        assert_eq!(controller.swatches().len(), 1);

        // 旧的确认计时器到期后不影响新状态
        controller.handle(Event::ConfirmElapsed { generation: 2 });
        assert_eq!(controller.state(), PickerState::Loaded);
    }
}
