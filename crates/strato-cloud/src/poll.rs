//! Status polling
//!
//! The control plane has no push channel, so long-running operations are
//! tracked by sampling a status until it reaches a target value.

use crate::error::CloudError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};

/// Polling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Give up when the target has not been observed within this duration
    pub timeout: Duration,

    /// Delay between two samples
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            interval: Duration::from_secs(5),
        }
    }
}

/// A sampled status value
pub trait PollStatus: PartialEq + std::fmt::Debug {
    /// Terminal failure that will never turn into the target
    fn is_failure(&self) -> bool {
        false
    }
}

/// Why a wait ended without reaching its target
#[derive(Error, Debug)]
pub enum WaitError {
    #[error("failed to retrieve task status: {source}")]
    Sampling {
        #[source]
        source: CloudError,
    },

    #[error("timed out after {}s waiting for completion", .timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("operation ended in status {status}")]
    OperationFailed { status: String },
}

/// Sample `sample` until it yields `target`
///
/// Returns as soon as the target is observed. A sampling error ends the wait
/// immediately and is never retried. Statuses other than the target keep the
/// loop going until `config.timeout` has elapsed.
pub async fn wait_until<S, F, Fut>(
    mut sample: F,
    target: S,
    config: &PollConfig,
) -> Result<(), WaitError>
where
    S: PollStatus,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, CloudError>>,
{
    let deadline = Instant::now() + config.timeout;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let status = sample()
            .await
            .map_err(|source| WaitError::Sampling { source })?;

        if status == target {
            tracing::debug!(attempt, ?status, "target status reached");
            return Ok(());
        }

        if status.is_failure() {
            return Err(WaitError::OperationFailed {
                status: format!("{:?}", status),
            });
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout {
                timeout: config.timeout,
            });
        }

        tracing::debug!(attempt, ?status, "still waiting");
        sleep(config.interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Step {
        Running,
        Done,
        Broken,
    }

    impl PollStatus for Step {
        fn is_failure(&self) -> bool {
            *self == Step::Broken
        }
    }

    fn config() -> PollConfig {
        PollConfig::new(Duration::from_secs(30), Duration::from_secs(1))
    }

    /// Sampler that replays a script and then repeats its last entry
    fn scripted(
        script: Vec<Result<Step, CloudError>>,
    ) -> (
        Arc<Mutex<u32>>,
        impl FnMut() -> std::future::Ready<Result<Step, CloudError>>,
    ) {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let mut script: VecDeque<_> = script.into();
        let sampler = move || {
            *counter.lock().unwrap() += 1;
            let next = if script.len() > 1 {
                script.pop_front().unwrap()
            } else if let Some(Ok(step)) = script.front() {
                Ok(*step)
            } else {
                script.pop_front().unwrap()
            };
            std::future::ready(next)
        };
        (calls, sampler)
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_when_target_reached() {
        let (calls, sampler) = scripted(vec![
            Ok(Step::Running),
            Ok(Step::Running),
            Ok(Step::Done),
        ]);

        wait_until(sampler, Step::Done, &config()).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_target_does_not_sleep() {
        let start = Instant::now();
        let (calls, sampler) = scripted(vec![Ok(Step::Done)]);

        wait_until(sampler, Step::Done, &config()).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampling_error_is_not_retried() {
        let (calls, sampler) = scripted(vec![
            Ok(Step::Running),
            Err(CloudError::Api("connection reset".to_string())),
            Ok(Step::Done),
        ]);

        let err = wait_until(sampler, Step::Done, &config()).await.unwrap_err();
        assert!(matches!(err, WaitError::Sampling { .. }));
        assert!(err.to_string().starts_with("failed to retrieve task status: "));
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_target_never_observed() {
        let start = Instant::now();
        let (calls, sampler) = scripted(vec![Ok(Step::Running)]);

        let err = wait_until(sampler, Step::Done, &config()).await.unwrap_err();
        assert!(matches!(err, WaitError::Timeout { .. }));
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        // one sample at t=0 and one after each of the 30 one-second sleeps
        assert_eq!(*calls.lock().unwrap(), 31);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_status_ends_wait() {
        let (_, sampler) = scripted(vec![Ok(Step::Running), Ok(Step::Broken)]);

        let err = wait_until(sampler, Step::Done, &config()).await.unwrap_err();
        assert!(matches!(err, WaitError::OperationFailed { .. }));
    }
}
