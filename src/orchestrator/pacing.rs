//! 请求节流
//!
//! 每两次检索之间等待 `base × [1.0, 1.5)`，降低被限流的概率

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

/// 随机放大的上限（相对 base 的额外比例）
pub const JITTER_SPAN: f64 = 0.5;

/// 按 `unit ∈ [0, 1)` 放大基础间隔，溢出时取 `Duration::MAX`
pub fn jittered(base: Duration, unit: f64) -> Duration {
    Duration::try_from_secs_f64(base.as_secs_f64() * (1.0 + unit * JITTER_SPAN))
        .unwrap_or(Duration::MAX)
}

pub struct Pacer {
    base: Duration,
}

impl Pacer {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }

    pub fn next_delay(&self) -> Duration {
        jittered(self.base, rand::random::<f64>())
    }

    pub async fn pause(&self) {
        if self.base.is_zero() {
            return;
        }
        let delay = self.next_delay();
        info!("⏳ 等待 {:.2} 秒后继续...", delay.as_secs_f64());
        sleep(delay).await;
    }
}
