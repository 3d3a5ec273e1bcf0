//! Bounded polling.
//!
//! Every wait in the crate goes through [`poll`] or [`wait_for`]: probe, and
//! if the probe does not succeed, sleep one interval and probe again until the
//! deadline. The probe always runs at least once, so a zero timeout is a
//! single check. Timers are tokio's, which lets tests run against a paused
//! clock.

use crate::config::Timeouts;
use crate::result::{ProbeError, ProbeResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Deadline and interval for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total time allowed
    pub timeout: Duration,
    /// Delay between probes
    pub poll_interval: Duration,
}

impl WaitOptions {
    /// Create options from a timeout and the configured poll interval
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Options for `timeout` using the interval in `timeouts`
    #[must_use]
    pub const fn from_timeouts(timeouts: &Timeouts, timeout: Duration) -> Self {
        Self::new(timeout, timeouts.poll_interval())
    }

    /// Timeout in whole milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Outcome of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent before the condition held
    pub elapsed: Duration,
    /// What was waited for
    pub waited_for: String,
}

// =============================================================================
// POLLING
// =============================================================================

/// Probe until it yields a value or the deadline passes
///
/// Returns `Ok(None)` on timeout. Probe errors end the wait immediately.
pub async fn poll<T, F, Fut>(options: WaitOptions, mut probe: F) -> ProbeResult<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }
        let elapsed = start.elapsed();
        if elapsed >= options.timeout {
            return Ok(None);
        }
        let remaining = options.timeout - elapsed;
        tokio::time::sleep(options.poll_interval.min(remaining)).await;
    }
}

/// Probe a boolean condition until it holds
///
/// Returns `ProbeError::Timeout` naming `what` when the deadline passes.
pub async fn wait_for<F, Fut>(
    options: WaitOptions,
    what: impl Into<String>,
    mut check: F,
) -> ProbeResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<bool>>,
{
    let what = what.into();
    let start = Instant::now();
    let held = poll(options, || {
        let fut = check();
        async move { fut.await.map(|held| held.then_some(())) }
    })
    .await?;

    match held {
        Some(()) => Ok(WaitResult {
            elapsed: start.elapsed(),
            waited_for: what,
        }),
        None => {
            tracing::debug!(what = %what, ms = options.timeout_ms(), "wait timed out");
            Err(ProbeError::Timeout {
                what,
                ms: options.timeout_ms(),
            })
        }
    }
}
