use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use catalyst_models::Bar;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CacheError;

#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    stored_at_unix: u64,
    ttl_secs: u64,
    bars: Vec<Bar>,
}

/// Content-addressed disk tier: each query key hashes to a file under
/// `root`, holding the bars plus a write timestamp and TTL so staleness can
/// be judged without a database. Generalizes the read-through pattern the
/// in-memory tier also follows, but survives process restarts.
///
/// All access goes through a `Mutex` the way the teacher guards its SQLite
/// connection, since concurrent writers to the same file would otherwise
/// race.
pub struct DiskCache {
    root: PathBuf,
    guard: Mutex<()>,
}

impl DiskCache {
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            guard: Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let digest = hasher.finalize();
        self.root.join(format!("{:x}.json", digest))
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<Bar>>, CacheError> {
        let _lock = self.guard.lock().unwrap();
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path)?;
        let entry: DiskEntry = serde_json::from_slice(&bytes)?;
        let now = unix_now();
        if now.saturating_sub(entry.stored_at_unix) > entry.ttl_secs {
            return Ok(None);
        }
        Ok(Some(entry.bars))
    }

    pub fn insert(
        &self,
        key: &str,
        bars: &[Bar],
        ttl: std::time::Duration,
    ) -> Result<(), CacheError> {
        let _lock = self.guard.lock().unwrap();
        let entry = DiskEntry {
            stored_at_unix: unix_now(),
            ttl_secs: ttl.as_secs(),
            bars: bars.to_vec(),
        };
        let bytes = serde_json::to_vec(&entry)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn root_dir(&self) -> &Path {
        &self.root
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
