use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{error, warn};

use crate::error::DedupError;

/// Append-only dedup ledger keyed by `(source_id, canonical_id)` (spec.md
/// §4.B). Backed by `sled` for crash-safe persistence across restarts;
/// falls back to an in-memory `DashMap` if the on-disk store cannot be
/// opened or a read comes back corrupted, logging the degradation rather
/// than failing the whole pipeline.
pub struct DedupStore {
    db: Option<sled::Db>,
    fallback: DashMap<String, DateTime<Utc>>,
    degraded: AtomicBool,
}

fn dedup_key(source_id: &str, canonical_id: &str) -> String {
    format!("{source_id}\u{1f}{canonical_id}")
}

impl DedupStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        match sled::open(path.as_ref()) {
            Ok(db) => Self {
                db: Some(db),
                fallback: DashMap::new(),
                degraded: AtomicBool::new(false),
            },
            Err(err) => {
                error!(error = %err, "failed to open dedup store, running in-memory only");
                Self {
                    db: None,
                    fallback: DashMap::new(),
                    degraded: AtomicBool::new(true),
                }
            }
        }
    }

    pub fn open_in_memory() -> Self {
        let config = sled::Config::new().temporary(true);
        let db = config.open().expect("in-memory sled config is infallible");
        Self {
            db: Some(db),
            fallback: DashMap::new(),
            degraded: AtomicBool::new(false),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Returns `true` if this `(source_id, canonical_id)` pair has already
    /// been marked seen.
    pub fn seen(&self, source_id: &str, canonical_id: &str) -> Result<bool, DedupError> {
        let key = dedup_key(source_id, canonical_id);
        if let Some(db) = &self.db {
            match db.get(key.as_bytes()) {
                Ok(value) => return Ok(value.is_some()),
                Err(err) => {
                    warn!(error = %err, "dedup read failed, consulting fallback map");
                    self.degraded.store(true, Ordering::Relaxed);
                }
            }
        }
        Ok(self.fallback.contains_key(&key))
    }

    /// Marks `(source_id, canonical_id)` as seen at `now`. Idempotent:
    /// marking an already-seen pair is a no-op write.
    pub fn mark(&self, source_id: &str, canonical_id: &str, now: DateTime<Utc>) -> Result<(), DedupError> {
        let key = dedup_key(source_id, canonical_id);
        let value = now.timestamp().to_le_bytes();
        if let Some(db) = &self.db {
            match db.insert(key.as_bytes(), &value) {
                Ok(_) => return Ok(()),
                Err(err) => {
                    warn!(error = %err, "dedup write failed, using fallback map");
                    self.degraded.store(true, Ordering::Relaxed);
                }
            }
        }
        self.fallback.insert(key, now);
        Ok(())
    }

    /// Removes entries older than `retention`, measured from `now`.
    pub fn purge_older_than(&self, now: DateTime<Utc>, retention: chrono::Duration) -> Result<u64, DedupError> {
        let cutoff = now - retention;
        let mut purged = 0u64;

        if let Some(db) = &self.db {
            let mut stale_keys = Vec::new();
            for entry in db.iter() {
                let (key, value) = entry?;
                if value.len() == 8 {
                    let secs = i64::from_le_bytes(value.as_ref().try_into().unwrap());
                    if secs < cutoff.timestamp() {
                        stale_keys.push(key.to_vec());
                    }
                }
            }
            for key in stale_keys {
                db.remove(&key)?;
                purged += 1;
            }
        }

        self.fallback.retain(|_, ts| {
            let keep = *ts >= cutoff;
            if !keep {
                purged += 1;
            }
            keep
        });

        Ok(purged)
    }

    pub fn len(&self) -> usize {
        let db_len = self.db.as_ref().map(|d| d.len()).unwrap_or(0);
        db_len + self.fallback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
