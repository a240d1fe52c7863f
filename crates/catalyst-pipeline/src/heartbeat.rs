use std::collections::HashMap;

use serde::Serialize;

/// Snapshot of one cycle's activity, rolled up into the periodic
/// admin-channel heartbeat (spec.md §4.K). Counters are cumulative since
/// the last heartbeat was emitted, then reset.
#[derive(Debug, Default, Clone, Serialize)]
pub struct HeartbeatStats {
    pub cycles_run: u64,
    pub items_seen: u64,
    pub items_dispatched: u64,
    pub rejection_counts: HashMap<String, u64>,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub provider_errors: HashMap<String, u64>,
}

impl HeartbeatStats {
    pub fn record_cycle(&mut self, items_seen: u64) {
        self.cycles_run += 1;
        self.items_seen += items_seen;
    }

    pub fn record_dispatch(&mut self) {
        self.items_dispatched += 1;
    }

    pub fn record_rejection(&mut self, reason: &str) {
        *self.rejection_counts.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn record_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    pub fn record_provider_error(&mut self, provider: &str) {
        *self.provider_errors.entry(provider.to_string()).or_insert(0) += 1;
    }

    pub fn record_cache_hits(&mut self, n: u64) {
        self.cache_hits += n;
    }

    pub fn record_cache_misses(&mut self, n: u64) {
        self.cache_misses += n;
    }

    pub fn record_provider_errors(&mut self, counts: &HashMap<String, u64>) {
        for (provider, count) in counts {
            *self.provider_errors.entry(provider.clone()).or_insert(0) += count;
        }
    }

    pub fn mean_items_per_cycle(&self) -> f64 {
        if self.cycles_run == 0 {
            return 0.0;
        }
        self.items_seen as f64 / self.cycles_run as f64
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }

    /// Returns a fresh, zeroed snapshot and resets internal counters,
    /// mirroring the reset-after-emit behavior the admin heartbeat expects.
    pub fn take(&mut self) -> HeartbeatStats {
        std::mem::take(self)
    }
}
