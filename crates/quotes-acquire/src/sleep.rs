use std::future::Future;
use std::time::Duration;

/// Source of the pauses between requests and retries.
///
/// The fetcher never calls `tokio::time::sleep` directly, so tests can swap
/// in a sleeper that records the requested durations and returns at once.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Real wall-clock sleeping on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSleeper {
    calls: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl RecordingSleeper {
    pub(crate) fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.calls.lock().unwrap().push(duration);
        std::future::ready(())
    }
}
