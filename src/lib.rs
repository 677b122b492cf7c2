//! # 图片取色器：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │          入口 (main.rs：命令行 + 标准输入事件脚本)         │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Event / Effect
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  session ─────── 串行事件队列 · 计时器 · 执行副作用        │
//! │    │                                                     │
//! │    ├─ image_handler   URL/文件/拖入/Data URL 加载 + 解码   │
//! │    ├─ clipboard       ClipboardSink（arboard / 内存）     │
//! │    └─ controller      交互状态机 + 放大镜视图模型          │
//! │          │                                               │
//! │          ├─ sampler   客户区坐标 → 栅格像素               │
//! │          ├─ raster    等比缩小后的 RGBA 工作栅格          │
//! │          ├─ swatch    有序去重色板                        │
//! │          ├─ viewport  画布矩形适配                        │
//! │          └─ color     色彩空间转换 · 规范文本 · 对比度     │
//! │                                                          │
//! │  settings ── PickerSettings（JSON）   error ── AppError    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`color`] | `ColorValue`：sRGB / Lab / LCh / OKLCH 转换、序列化、解析、APCA 对比度 |
//! | [`raster`] | 按 `maxSize` 等比缩小并取样 |
//! | [`sampler`] | `PointerSampler::locate`：右开区间命中测试 |
//! | [`swatch`] | `SwatchSet`：插入顺序、去重、删除、JSON 导出 |
//! | [`controller`] | `InteractionController`：事件 → 状态 + 副作用 |
//! | [`session`] | 会话运行时：异步加载、剪贴板写入、计时器 |
//! | [`script`] | 无界面运行时的逐行事件脚本 |
//! | [`image_handler`] | 图片来源加载与安全校验、解码、缩放 |
//! | [`clipboard`] | 剪贴板写入端（系统 / 内存） |
//! | [`viewport`] | 画布矩形与窗口适配 |
//! | [`settings`] | 设置文件 |
//! | [`error`] | 统一错误类型 `AppError` |

pub mod clipboard;
pub mod color;
pub mod controller;
pub mod error;
pub mod image_handler;
pub mod raster;
pub mod sampler;
pub mod script;
pub mod session;
pub mod settings;
pub mod swatch;
pub mod viewport;
