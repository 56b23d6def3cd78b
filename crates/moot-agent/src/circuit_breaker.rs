//! Circuit breaker guarding the model backend
//!
//! After a run of consecutive failures the breaker opens and rejects calls
//! immediately instead of letting every participant turn grind through its
//! own retry budget against a dead backend. Once the cooldown elapses a
//! single probe call is allowed through.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Normal operation
    Closed,
    /// Rejecting calls until the cooldown elapses
    Open,
    /// Cooldown elapsed; one probe call allowed
    Probing,
}

pub struct CircuitBreaker {
    consecutive_failures: AtomicU32,
    last_failure_ms: AtomicU64,
    threshold: u32,
    cooldown: Duration,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl CircuitBreaker {
    /// `threshold` consecutive failures open the breaker for `cooldown`
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            consecutive_failures: AtomicU32::new(0),
            last_failure_ms: AtomicU64::new(0),
            threshold,
            cooldown,
        }
    }

    pub fn state(&self) -> BreakerState {
        if self.consecutive_failures.load(Ordering::Relaxed) < self.threshold {
            return BreakerState::Closed;
        }
        let elapsed = now_ms().saturating_sub(self.last_failure_ms.load(Ordering::Relaxed));
        if elapsed >= self.cooldown.as_millis() as u64 {
            BreakerState::Probing
        } else {
            BreakerState::Open
        }
    }

    /// Whether a call may proceed right now
    pub fn allow(&self) -> bool {
        self.state() != BreakerState::Open
    }

    pub fn on_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    pub fn on_failure(&self) {
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed);
        self.last_failure_ms.store(now_ms(), Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    /// Milliseconds until the next probe is allowed; 0 unless open
    pub fn retry_after_ms(&self) -> u64 {
        match self.state() {
            BreakerState::Open => {
                let elapsed =
                    now_ms().saturating_sub(self.last_failure_ms.load(Ordering::Relaxed));
                (self.cooldown.as_millis() as u64).saturating_sub(elapsed)
            }
            _ => 0,
        }
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(4, Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_starts_closed() {
        let breaker = CircuitBreaker::default();
        assert_eq!(breaker.state(), BreakerState::Closed);
        assert!(breaker.allow());
    }

    #[test]
    fn test_opens_at_threshold() {
        let breaker = CircuitBreaker::new(2, Duration::from_secs(30));
        breaker.on_failure();
        assert!(breaker.allow());
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Open);
        assert!(!breaker.allow());
        assert!(breaker.retry_after_ms() > 0);
    }

    #[test]
    fn test_success_resets() {
        let breaker = CircuitBreaker::new(2, Duration::from_secs(30));
        breaker.on_failure();
        breaker.on_success();
        assert_eq!(breaker.failure_count(), 0);
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[test]
    fn test_probe_after_cooldown() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(50));
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Open);

        sleep(Duration::from_millis(80));
        assert_eq!(breaker.state(), BreakerState::Probing);
        assert!(breaker.allow());

        breaker.on_success();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }
}
