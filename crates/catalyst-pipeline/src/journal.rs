use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PipelineError;

const DEFAULT_ROTATION_BYTES: u64 = 64 * 1024 * 1024;

/// Append-only JSONL journal (spec.md §6 `events.jsonl` /
/// `rejected_items.jsonl`). Writers only ever append; readers open a
/// separate file handle and read a point-in-time snapshot, so the
/// historical analyzer never blocks or is blocked by the live pipeline.
/// Rotates to `<name>.<timestamp>.jsonl` once the active file exceeds
/// `rotation_bytes`.
pub struct Journal {
    path: PathBuf,
    rotation_bytes: u64,
    file: Mutex<File>,
}

impl Journal {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        Self::open_with_rotation(path, DEFAULT_ROTATION_BYTES)
    }

    pub fn open_with_rotation(path: impl Into<PathBuf>, rotation_bytes: u64) -> Result<Self, PipelineError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            rotation_bytes,
            file: Mutex::new(file),
        })
    }

    pub fn append<T: Serialize>(&self, record: &T) -> Result<(), PipelineError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().unwrap();
        file.write_all(&line)?;
        file.flush()?;

        let len = file.metadata()?.len();
        if len >= self.rotation_bytes {
            self.rotate(&mut file)?;
        }
        Ok(())
    }

    fn rotate(&self, file: &mut File) -> Result<(), PipelineError> {
        let timestamp = std::fs::metadata(&self.path)?.modified()?;
        let suffix = timestamp
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let archived = self.path.with_extension(format!("{suffix}.jsonl"));
        drop(std::mem::replace(
            file,
            OpenOptions::new().create(true).append(true).open(&self.path)?,
        ));
        std::fs::rename(&self.path, &archived).ok();
        *file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        Ok(())
    }

    /// Reads every record currently in the active journal file, in
    /// append order. Opens its own read handle independent of the writer.
    pub fn snapshot<T: DeserializeOwned>(&self) -> Result<Vec<T>, PipelineError> {
        read_jsonl(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Dummy {
        id: u32,
    }

    #[test]
    fn append_then_snapshot_roundtrips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path().join("events.jsonl")).unwrap();
        journal.append(&Dummy { id: 1 }).unwrap();
        journal.append(&Dummy { id: 2 }).unwrap();

        let records: Vec<Dummy> = journal.snapshot().unwrap();
        assert_eq!(records, vec![Dummy { id: 1 }, Dummy { id: 2 }]);
    }

    #[test]
    fn snapshot_of_nonexistent_journal_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path().join("sub/events.jsonl")).unwrap();
        let records: Vec<Dummy> = journal.snapshot().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn rotates_when_exceeding_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open_with_rotation(dir.path().join("events.jsonl"), 10).unwrap();
        for i in 0..5 {
            journal.append(&Dummy { id: i }).unwrap();
        }
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(entries.len() > 1, "expected at least one rotated file");
    }
}
