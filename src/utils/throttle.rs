use std::time::Duration;

/// 固定間隔的請求節流：第一個請求立即送出，之後每次等待 `delay`。
#[derive(Debug, Clone)]
pub struct RequestThrottle {
    delay: Duration,
    primed: bool,
}

impl RequestThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 在送出下一個請求前呼叫
    pub async fn wait(&mut self) {
        if self.primed && !self.delay.is_zero() {
            tracing::trace!("Waiting {:?} before next request", self.delay);
            tokio::time::sleep(self.delay).await;
        }
        self.primed = true;
    }
}
