use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Fixed, ordered delays slept between attempts after a transport failure.
///
/// A schedule of `n` delays allows `n + 1` attempts. The default schedule is
/// 1s, 3s, 10s. There is no jitter and no growth: the delays are used exactly
/// as given.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackoffSchedule {
    delays: Vec<Duration>,
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::new([
            Duration::from_secs(1),
            Duration::from_secs(3),
            Duration::from_secs(10),
        ])
    }
}

impl BackoffSchedule {
    /// Builds a schedule from explicit delays.
    pub fn new(delays: impl Into<Vec<Duration>>) -> Self {
        Self {
            delays: delays.into(),
        }
    }

    /// Schedule that never retries.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Initial attempt plus one retry per delay.
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }

    /// Runs `op` until it succeeds or the schedule is used up.
    ///
    /// Every `Err` returned by `op` is treated as retryable; callers decide
    /// what counts as a failure by what they map into `Err`.
    pub(crate) async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, Exhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut delays = self.delays.iter();
        let mut attempts = 0usize;

        loop {
            attempts += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => match delays.next() {
                    Some(delay) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            attempt = attempts,
                            "request error: {err}; retrying in {:?}",
                            delay
                        );

                        sleep(*delay).await;
                    }
                    None => {
                        return Err(Exhausted {
                            attempts,
                            last: err,
                        })
                    }
                },
            }
        }
    }
}

/// Last error of a schedule that ran out of attempts.
#[derive(Debug)]
pub(crate) struct Exhausted<E> {
    pub attempts: usize,
    pub last: E,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::Instant;

    use super::BackoffSchedule;

    #[test]
    fn default_schedule_is_one_three_ten_seconds() {
        let schedule = BackoffSchedule::default();
        assert_eq!(
            schedule.delays(),
            &[
                Duration::from_secs(1),
                Duration::from_secs(3),
                Duration::from_secs(10)
            ]
        );
        assert_eq!(schedule.max_attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn two_failures_wait_first_two_delays() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let started = Instant::now();

        let result = BackoffSchedule::default()
            .run(move || async move {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                if call < 2 {
                    Err("connection refused")
                } else {
                    Ok(call)
                }
            })
            .await;

        let elapsed = started.elapsed();
        assert_eq!(result.ok(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(elapsed >= Duration::from_secs(4), "waited {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "waited {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_initial_try_plus_one_per_delay() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let started = Instant::now();

        let result: Result<(), _> = BackoffSchedule::default()
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("dns failure")
            })
            .await;

        let exhausted = result.expect_err("all attempts must fail");
        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.last, "dns failure");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(started.elapsed() >= Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_schedule_makes_single_attempt() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let result: Result<(), _> = BackoffSchedule::none()
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("timeout")
            })
            .await;

        assert_eq!(result.expect_err("must fail").attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
