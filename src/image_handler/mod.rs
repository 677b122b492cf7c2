//! # 图片加载模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将"图片来源识别 → 加载校验 → 解码 → 缩放"按职责拆分为多个子模块，
//! 避免单文件膨胀与耦合。取色逻辑只依赖这里输出的 `DecodedImage`。
//!
//! - `handler`：编排整条加载流水线
//! - `loader`：负责 URL / Data URL / 文件 / 拖入字节加载与体积、签名校验
//! - `pipeline`：负责解码、像素限制、缩放
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! session.rs（收到 drop / url 指令）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积/签名校验）
//!    └─ pipeline.rs（header 检查 + 解码）
//!    ↓
//! raster.rs（按 maxSize 缩放，调用 pipeline::resize_rgba）
//! ```

mod config;
mod error;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use config::{ImageConfig, ResampleQuality};
pub use error::{ImageError, ImageLoadError};
pub use handler::ImageHandler;
pub use pipeline::resize_rgba;
pub use source::{DecodedImage, ImageSource};
