use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW_SIZE: usize = 20;
const FAILURE_RATE_COOLDOWN_THRESHOLD: f64 = 0.5;
const COOLDOWN: Duration = Duration::from_secs(60);

/// Rolling success/failure tracker for one provider, used to skip
/// providers in a cooldown window instead of retrying a source that is
/// currently failing (spec.md §4.C "tracks provider health").
pub struct ProviderHealth {
    results: VecDeque<bool>,
    cooldown_until: Option<Instant>,
}

impl ProviderHealth {
    pub fn new() -> Self {
        Self {
            results: VecDeque::with_capacity(WINDOW_SIZE),
            cooldown_until: None,
        }
    }

    pub fn record_success(&mut self) {
        self.push(true);
    }

    pub fn record_failure(&mut self) {
        self.push(false);
        if self.failure_rate() > FAILURE_RATE_COOLDOWN_THRESHOLD {
            self.cooldown_until = Some(Instant::now() + COOLDOWN);
        }
    }

    fn push(&mut self, ok: bool) {
        if self.results.len() == WINDOW_SIZE {
            self.results.pop_front();
        }
        self.results.push_back(ok);
    }

    pub fn failure_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let failures = self.results.iter().filter(|&&ok| !ok).count();
        failures as f64 / self.results.len() as f64
    }

    pub fn is_available(&self) -> bool {
        match self.cooldown_until {
            Some(until) => Instant::now() >= until,
            None => true,
        }
    }
}

impl Default for ProviderHealth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_available_with_zero_failure_rate() {
        let health = ProviderHealth::new();
        assert!(health.is_available());
        assert_eq!(health.failure_rate(), 0.0);
    }

    #[test]
    fn high_failure_rate_triggers_cooldown() {
        let mut health = ProviderHealth::new();
        for _ in 0..5 {
            health.record_failure();
        }
        assert!(health.failure_rate() > FAILURE_RATE_COOLDOWN_THRESHOLD);
        assert!(!health.is_available());
    }

    #[test]
    fn mixed_results_stay_within_window() {
        let mut health = ProviderHealth::new();
        for _ in 0..WINDOW_SIZE {
            health.record_success();
        }
        health.record_failure();
        assert!(health.failure_rate() < FAILURE_RATE_COOLDOWN_THRESHOLD);
        assert!(health.is_available());
    }
}
