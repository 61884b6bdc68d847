//! Bounded polling for asynchronous server-side state.
//!
//! One primitive serves every wait in the SDK: tool readiness, resource
//! readiness, agent readiness, and message-answer readiness. Callers
//! supply the probe and the two terminal-state predicates; the loop owns
//! attempt counting and pacing.

use std::future::Future;
use std::time::Duration;

use crate::error::{ColloquyError, Result};

/// Attempt bound and pacing for one polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Maximum number of probe calls (including the first).
    pub max_attempts: u32,
    /// Sleep between consecutive probes. The first probe is immediate.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(3),
        }
    }
}

impl PollConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Default pacing for tool/resource readiness gates.
    pub fn gate_default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(3),
        }
    }
}

/// Poll `check` until a terminal state is observed.
///
/// Returns the observed state as soon as `is_ready` holds. Fails with
/// [`ColloquyError::ResourceNotReady`] the moment `is_error` yields a
/// reason, without further attempts, and with [`ColloquyError::Timeout`]
/// once `max_attempts` probes have been made without reaching either
/// condition. Errors from `check` itself propagate unchanged.
pub async fn await_ready<S, C, Fut, R, E>(
    config: PollConfig,
    mut check: C,
    is_ready: R,
    is_error: E,
) -> Result<S>
where
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<S>>,
    R: Fn(&S) -> bool,
    E: Fn(&S) -> Option<String>,
{
    for attempt in 1..=config.max_attempts {
        let state = check().await?;

        if is_ready(&state) {
            return Ok(state);
        }
        if let Some(reason) = is_error(&state) {
            return Err(ColloquyError::not_ready(reason));
        }

        if attempt < config.max_attempts {
            tracing::debug!(
                attempt,
                max_attempts = config.max_attempts,
                "not ready yet, waiting"
            );
            tokio::time::sleep(config.interval).await;
        }
    }

    Err(ColloquyError::Timeout {
        attempts: config.max_attempts,
    })
}
