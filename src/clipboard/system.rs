//! # 系统剪贴板写入
//!
//! ## 设计思路
//!
//! 其他应用同时监控剪贴板时，写入可能短暂失败（剪贴板被占用）。
//! 这里对写入做有限次数的指数退避重试，并设置总耗时预算，避免长时间阻塞。
//!
//! ## 实现思路
//!
//! - `arboard::Clipboard` 实例在首次写入时创建并长期持有：
//!   Linux 下剪贴板内容由持有者进程提供，实例一旦释放内容就会丢失。
//! - 写入失败后丢弃实例，下次重试重新创建。
//! - 退避延迟 = 指数增长 + 有界随机抖动，抖动源为无锁 xorshift。

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use super::ClipboardSink;
use crate::error::AppError;

/// 剪贴板写入重试策略。
#[derive(Debug, Clone, Copy)]
pub struct ClipboardRetryPolicy {
    /// 最大尝试次数（至少 1 次）。
    pub retries: u32,
    /// 首次重试前的基础等待（毫秒）。
    pub retry_delay_ms: u64,
    /// 单次等待上限（毫秒）。
    pub max_delay_ms: u64,
    /// 全部重试的总预算（毫秒）。
    pub max_total_ms: u64,
}

impl Default for ClipboardRetryPolicy {
    fn default() -> Self {
        Self {
            retries: 4,
            retry_delay_ms: 40,
            max_delay_ms: 400,
            max_total_ms: 1_800,
        }
    }
}

/// 基于 `arboard` 的系统剪贴板。
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
    policy: ClipboardRetryPolicy,
}

impl SystemClipboard {
    pub fn new(policy: ClipboardRetryPolicy) -> Self {
        Self {
            inner: Mutex::new(None),
            policy,
        }
    }

    fn try_write(&self, text: &str) -> Result<(), String> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| "剪贴板实例锁已中毒".to_string())?;

        if slot.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| format!("无法访问剪贴板：{}", e))?;
            *slot = Some(clipboard);
        }

        let result = match slot.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| format!("写入失败：{}", e)),
            None => Err("剪贴板实例不可用".to_string()),
        };

        if result.is_err() {
            *slot = None;
        }
        result
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(ClipboardRetryPolicy::default())
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), AppError> {
        let policy = self.policy;
        let attempts = policy.retries.max(1);
        let started = Instant::now();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            if attempt > 1 {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let wait_ms = compute_backoff_delay_with_jitter(
                    policy.retry_delay_ms.max(1),
                    attempt - 1,
                    policy.max_delay_ms,
                );

                if would_exceed_retry_budget(elapsed_ms, wait_ms, policy.max_total_ms) {
                    log::warn!(
                        "⏱️ 跳过第 {} 次重试：等待 {}ms 会超过预算 {}ms",
                        attempt,
                        wait_ms,
                        policy.max_total_ms
                    );
                    break;
                }

                std::thread::sleep(Duration::from_millis(wait_ms));
            }

            match self.try_write(text) {
                Ok(()) => {
                    if attempt > 1 {
                        log::info!("✅ 剪贴板写入在第 {} 次尝试成功", attempt);
                    }
                    log::debug!("📋 已复制到剪贴板: {}", text);
                    return Ok(());
                }
                Err(err) => {
                    log::warn!("⚠️ 剪贴板写入失败（第 {}/{} 次）：{}", attempt, attempts, err);
                    last_error = err;
                }
            }
        }

        Err(AppError::Clipboard(last_error))
    }
}

static JITTER_STATE: AtomicU64 = AtomicU64::new(0);

fn seed_jitter_state() -> u64 {
    let time_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let state = time_seed ^ ((std::process::id() as u64) << 32) ^ 0x9E37_79B9_7F4A_7C15;
    if state == 0 { 0xA5A5_5A5A_0123_4567 } else { state }
}

fn next_jitter_u64() -> u64 {
    let mut current = JITTER_STATE.load(Ordering::Relaxed);

    loop {
        let mut next = if current == 0 {
            seed_jitter_state()
        } else {
            current
        };
        next ^= next << 13;
        next ^= next >> 7;
        next ^= next << 17;

        match JITTER_STATE.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => current = observed,
        }
    }
}

fn compute_backoff_delay_with_jitter(base_delay_ms: u64, attempt: u32, max_delay_ms: u64) -> u64 {
    let exp = base_delay_ms.saturating_mul(1_u64 << attempt.saturating_sub(1).min(8));
    let capped = exp.min(max_delay_ms.max(base_delay_ms));
    let jitter_bound = (capped / 3).max(1);
    let jitter = next_jitter_u64() % (jitter_bound + 1);
    capped.saturating_add(jitter)
}

fn would_exceed_retry_budget(elapsed_ms: u64, wait_ms: u64, budget_ms: u64) -> bool {
    elapsed_ms.saturating_add(wait_ms) > budget_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_delay_stays_within_expected_bounds() {
        let delay = compute_backoff_delay_with_jitter(100, 4, 900);

        assert!(delay >= 800, "delay should be at least exponential base");
        assert!(delay <= 1200, "delay should include bounded jitter only");
    }

    #[test]
    fn backoff_delay_respects_max_cap() {
        let delay = compute_backoff_delay_with_jitter(300, 8, 500);

        assert!(delay >= 500);
        assert!(delay <= 666);
    }

    #[test]
    fn retry_budget_checker_works() {
        assert!(would_exceed_retry_budget(1700, 120, 1800));
        assert!(!would_exceed_retry_budget(1600, 120, 1800));
        assert!(!would_exceed_retry_budget(0, 0, 1800));
    }

    #[test]
    fn default_policy_fits_in_budget() {
        let policy = ClipboardRetryPolicy::default();
        assert!(policy.retries >= 1);
        assert!(policy.max_delay_ms <= policy.max_total_ms);
    }
}
