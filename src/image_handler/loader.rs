//! 来源加载
//!
//! 把四种 `ImageSource` 统一读成原始字节，交给解码流水线。
//! 每种来源都过两道检查：体积不超过 `max_file_size`，文件头是图片签名。
//! 网络来源另受 `download_timeout` 约束，重定向由 reqwest 按 `max_redirects` 跟随；
//! 请求是匿名的，不带 Cookie 也不带凭据。

use std::path::Path;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};

use super::source::RawImageData;
use super::{ImageConfig, ImageError, ImageSource};

/// 读取任意来源的原始字节并校验签名。
pub(super) async fn fetch(
    source: ImageSource,
    config: &ImageConfig,
) -> Result<RawImageData, ImageError> {
    let (bytes, source_hint) = match source {
        ImageSource::Url(url) => (download(&url, config).await?, "url"),
        ImageSource::DataUrl(data) => {
            log::info!("📝 开始处理 Data URL 图片");
            (decode_data_url(&data, config.max_file_size)?, "data-url")
        }
        ImageSource::FilePath(path) => (read_file(Path::new(&path), config.max_file_size)?, "file"),
        ImageSource::Dropped { name, bytes } => {
            log::info!("🖱️ 收到拖入文件 - 名称: {} 大小: {} bytes", name, bytes.len());
            ensure_within_limit(bytes.len() as u64, config.max_file_size)?;
            (bytes, "drop")
        }
    };

    ensure_image_signature(&bytes)?;
    Ok(RawImageData { bytes, source_hint })
}

async fn download(url: &str, config: &ImageConfig) -> Result<Vec<u8>, ImageError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ImageError::InvalidFormat(format!("URL 格式错误：{}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ImageError::InvalidFormat("仅支持 HTTP/HTTPS".to_string()));
    }

    log::info!("🌐 开始下载图片 - URL: {}", redact_url(url));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout))
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .map_err(|e| ImageError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;

    let mut response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| network_error(e, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Network(format!("HTTP {}", status)));
    }
    if let Some(declared) = response.content_length() {
        ensure_within_limit(declared, config.max_file_size)?;
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| network_error(e, config))? {
        // Content-Length 可能缺失或不实，按实际收到的字节再查一次
        ensure_within_limit((body.len() + chunk.len()) as u64, config.max_file_size)?;
        body.extend_from_slice(&chunk);
    }

    log::debug!("✅ 下载完成 - {} bytes", body.len());
    Ok(body)
}

fn network_error(err: reqwest::Error, config: &ImageConfig) -> ImageError {
    if err.is_timeout() {
        ImageError::Timeout(format!("下载超时（{} 秒）", config.download_timeout))
    } else if err.is_redirect() {
        ImageError::Network(format!("重定向次数超过限制（{}）", config.max_redirects))
    } else {
        ImageError::Network(format!("请求失败：{}", err.without_url()))
    }
}

fn read_file(path: &Path, limit: u64) -> Result<Vec<u8>, ImageError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    let metadata = std::fs::metadata(path).map_err(|e| {
        ImageError::FileSystem(format!("无法访问文件 {}：{}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(ImageError::FileSystem(format!("不是文件：{}", path.display())));
    }
    ensure_within_limit(metadata.len(), limit)?;

    std::fs::read(path).map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))
}

/// 支持 `data:<mime>;base64,<payload>` 与裸 Base64。解码前按长度估算体积。
fn decode_data_url(data: &str, limit: u64) -> Result<Vec<u8>, ImageError> {
    let data = data.trim();
    let payload = match data.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| ImageError::InvalidFormat("Data URL 缺少 ;base64, 标记".to_string()))?,
        None => data,
    };

    // 每 4 个字符最多解出 3 字节
    let upper_bound = (payload.len() as u64).div_ceil(4).saturating_mul(3);
    ensure_within_limit(upper_bound, limit)?;

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))
}

fn ensure_within_limit(size: u64, limit: u64) -> Result<(), ImageError> {
    if size > limit {
        return Err(ImageError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            size as f64 / 1024.0 / 1024.0,
            limit as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

fn ensure_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
    }

    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(()),
        Some(kind) => Err(ImageError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        ))),
        None => Err(ImageError::InvalidFormat("无法识别图片类型".to_string())),
    }
}

/// 去掉凭据、query 与 fragment，避免日志和提示中泄露令牌。
pub(super) fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return "<invalid-url>".to_string();
    };
    let _ = parsed.set_username("");
    let _ = parsed.set_password(None);
    parsed.set_query(None);
    parsed.set_fragment(None);
    parsed.to_string()
}
