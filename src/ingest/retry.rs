use std::thread::sleep;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("retry budget of {0} attempts exhausted")]
pub struct RetriesExhausted(pub u32);

/// Retry budget with exponential delay, used per channel while paging.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial_delay: Duration,
    max_delay: Duration,
    max_retries: u32,
    current_attempt: u32,
}

impl Backoff {
    pub fn new(initial_delay: Duration, max_delay: Duration, max_retries: u32) -> Self {
        Self {
            initial_delay,
            max_delay,
            max_retries,
            current_attempt: 0,
        }
    }

    /// Delay before retry number `attempt` (0-based), capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Sleep before the next retry, or fail once the budget is spent.
    pub fn wait(&mut self) -> Result<(), RetriesExhausted> {
        if self.current_attempt >= self.max_retries {
            return Err(RetriesExhausted(self.max_retries));
        }
        let delay = self.delay_for(self.current_attempt);
        self.current_attempt += 1;
        log::debug!(
            "retry attempt {} of {} in {:?}",
            self.current_attempt,
            self.max_retries,
            delay
        );
        if !delay.is_zero() {
            sleep(delay);
        }
        Ok(())
    }

    /// Forget earlier failures after a success.
    pub fn reset(&mut self) {
        self.current_attempt = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.current_attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_up_to_the_cap() {
        let b = Backoff::new(Duration::from_millis(100), Duration::from_millis(500), 10);
        assert_eq!(b.delay_for(0), Duration::from_millis(100));
        assert_eq!(b.delay_for(1), Duration::from_millis(200));
        assert_eq!(b.delay_for(2), Duration::from_millis(400));
        assert_eq!(b.delay_for(3), Duration::from_millis(500));
        assert_eq!(b.delay_for(40), Duration::from_millis(500));
    }

    #[test]
    fn budget_is_enforced_and_reset() {
        let mut b = Backoff::new(Duration::ZERO, Duration::ZERO, 3);
        assert!(b.wait().is_ok());
        assert!(b.wait().is_ok());
        assert!(b.wait().is_ok());
        assert!(b.wait().is_err());
        assert_eq!(b.attempts(), 3);
        b.reset();
        assert!(b.wait().is_ok());
    }
}
