use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// Every deliberate pause of a runner goes through here.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Whole seconds from `now` until `deadline`, clamped at zero. Both are unix
/// timestamps in seconds.
pub fn seconds_until(deadline: f64, now: f64) -> u64 {
    let left = deadline - now;
    if left.is_finite() && left > 0.0 {
        left as u64
    } else {
        0
    }
}

pub fn seconds_until_now(deadline: f64) -> u64 {
    let now = Utc::now().timestamp_millis() as f64 / 1000.0;
    seconds_until(deadline, now)
}

/// Breaks seconds down as `{d}d{h}h {m}m {s}s`, without zero padding.
pub fn format_time_left(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{days}d{hours}h {minutes}m {seconds}s")
}

/// Returns immediately and remembers what it was asked to wait.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingSleeper {
    calls: std::sync::Arc<std::sync::Mutex<Vec<Duration>>>,
}

#[cfg(test)]
impl RecordingSleeper {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn recorded(&self) -> Vec<Duration> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn recorded_secs(&self) -> Vec<u64> {
        self.recorded().iter().map(Duration::as_secs).collect()
    }
}

#[cfg(test)]
#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(duration);
        }
        tokio::task::yield_now().await;
    }
}
