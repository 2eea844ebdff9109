use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const INDEX_FILE: &str = "index.json";
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct IndexFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    file: String,
    len: u64,
    fetched_at: u64,
}

/// Headshot bytes kept on disk, keyed by player id.
#[derive(Debug, Clone)]
pub struct PhotoCache {
    dir: PathBuf,
    max_age: Duration,
}

impl PhotoCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Fresh cached bytes, or None on a miss, an expired entry, or any read error.
    pub fn get(&self, player_id: &str) -> Option<Vec<u8>> {
        let index = self.load_index();
        let entry = index.entries.get(player_id)?;
        let now = system_time_to_secs(SystemTime::now())?;
        if now.saturating_sub(entry.fetched_at) > self.max_age.as_secs() {
            return None;
        }
        let bytes = fs::read(self.dir.join(&entry.file)).ok()?;
        if bytes.len() as u64 != entry.len {
            return None;
        }
        Some(bytes)
    }

    pub fn put(&self, player_id: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create photo cache dir {}", self.dir.display()))?;

        let file = format!("{player_id}.img");
        write_atomic(&self.dir.join(&file), bytes).context("write cached photo")?;

        let mut index = self.load_index();
        index.version = CACHE_VERSION;
        index.entries.insert(
            player_id.to_string(),
            CacheEntry {
                file,
                len: bytes.len() as u64,
                fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
            },
        );
        let json = serde_json::to_vec(&index).context("serialize photo cache index")?;
        write_atomic(&self.dir.join(INDEX_FILE), &json).context("write photo cache index")?;
        Ok(())
    }

    /// Forgets an entry and deletes its file. Missing entries are fine.
    pub fn remove(&self, player_id: &str) -> Result<()> {
        let mut index = self.load_index();
        let Some(entry) = index.entries.remove(player_id) else {
            return Ok(());
        };
        let json = serde_json::to_vec(&index).context("serialize photo cache index")?;
        write_atomic(&self.dir.join(INDEX_FILE), &json).context("write photo cache index")?;
        match fs::remove_file(self.dir.join(&entry.file)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("remove cached photo"),
        }
    }

    fn load_index(&self) -> IndexFile {
        let Ok(raw) = fs::read_to_string(self.dir.join(INDEX_FILE)) else {
            return IndexFile::default();
        };
        let index = serde_json::from_str::<IndexFile>(&raw).unwrap_or_default();
        if index.version != CACHE_VERSION {
            return IndexFile::default();
        }
        index
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
