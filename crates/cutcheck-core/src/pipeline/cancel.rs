//! Deadline-bound cancellation for decoders that cannot report failure.
//!
//! A [`DecodeDeadline`] owns a shared [`CancelToken`]. The decoder polls the
//! token while it works; when the deadline passes, the token is tripped so a
//! blocking decode stops at its next checkpoint and frees its buffers.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Cooperative cancellation flag shared with a running decode.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// The deadline expired before the guarded future completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExpired {
    pub timeout: Duration,
}

/// A cancellation token armed with a deadline.
#[derive(Debug)]
pub struct DecodeDeadline {
    timeout: Duration,
    deadline: Instant,
    token: CancelToken,
}

impl DecodeDeadline {
    /// Arm a deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: Instant::now() + timeout,
            token: CancelToken::new(),
        }
    }

    /// Token to hand to the decoder.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Drive `fut` until it completes or the deadline passes.
    ///
    /// On expiry the token is cancelled before returning, so work that keeps
    /// running in the background observes it.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, DeadlineExpired>
    where
        F: Future<Output = T>,
    {
        match tokio::time::timeout_at(self.deadline, fut).await {
            Ok(value) => Ok(value),
            Err(_) => {
                self.token.cancel();
                Err(DeadlineExpired {
                    timeout: self.timeout,
                })
            }
        }
    }
}
