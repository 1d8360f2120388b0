use std::time::Duration;

use tracing::debug;

/// Counter-based rate limiter: sleeps for `pause` once every `batch_size` requests.
#[derive(Debug, Clone)]
pub struct BatchThrottle {
    batch_size: usize,
    pause: Duration,
    requests: usize,
    pauses: usize,
}

impl BatchThrottle {
    /// A `batch_size` of zero is treated as one.
    pub fn new(batch_size: usize, pause: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            pause,
            requests: 0,
            pauses: 0,
        }
    }

    /// Record one request; sleep if it closes a batch.
    pub async fn tick(&mut self) {
        self.requests += 1;
        if self.requests % self.batch_size == 0 {
            self.pauses += 1;
            debug!(
                requests = self.requests,
                pause_ms = self.pause.as_millis() as u64,
                "[COLLECT] rate-limit pause"
            );
            tokio::time::sleep(self.pause).await;
        }
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn pauses(&self) -> usize {
        self.pauses
    }
}
