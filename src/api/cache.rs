//! # Country Cache
//!
//! JSON file cache under the configured cache directory:
//! `all_countries.json` for the full listing, `countries/<name>.json` for
//! per-country query results.
//!
//! Each file holds an envelope `{ fetched_at, data }` so cache age shows up
//! in the logs. All writes use atomic rename (write `.tmp`, then `rename()`)
//! for crash safety. Unreadable or malformed entries are treated as misses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// On-disk shape of every cache file.
#[derive(Serialize, Deserialize, Debug)]
pub struct CacheEnvelope {
    pub fetched_at: i64,
    pub data: Vec<Value>,
}

pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: PathBuf) -> Self {
        CacheStore { root }
    }

    fn all_path(&self) -> PathBuf {
        self.root.join("all_countries.json")
    }

    fn country_path(&self, name: &str) -> PathBuf {
        self.root.join("countries").join(format!("{}.json", sanitize(name)))
    }

    /// The cached full listing, or `None` on any miss.
    pub fn load_all(&self) -> Option<Vec<Value>> {
        self.load(&self.all_path())
    }

    pub fn store_all(&self, data: &[Value]) -> io::Result<()> {
        self.store(&self.all_path(), data)
    }

    /// Cached query results for one country name, or `None` on any miss.
    pub fn load_country(&self, name: &str) -> Option<Vec<Value>> {
        self.load(&self.country_path(name))
    }

    pub fn store_country(&self, name: &str, data: &[Value]) -> io::Result<()> {
        self.store(&self.country_path(name), data)
    }

    fn load(&self, path: &Path) -> Option<Vec<Value>> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                debug!("cache miss at {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str::<CacheEnvelope>(&json) {
            Ok(envelope) => {
                let age = Utc::now().timestamp() - envelope.fetched_at;
                debug!("cache hit at {} (age {age}s)", path.display());
                Some(envelope.data)
            }
            Err(e) => {
                warn!("discarding malformed cache file {}: {e}", path.display());
                None
            }
        }
    }

    fn store(&self, path: &Path, data: &[Value]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let envelope = CacheEnvelope {
            fetched_at: Utc::now().timestamp(),
            data: data.to_vec(),
        };
        atomic_write_json(path, &envelope)
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Country names become file names; keep them filesystem-safe.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, CacheStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = CacheStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn missing_files_are_misses() {
        let (_dir, cache) = store();
        assert!(cache.load_all().is_none());
        assert!(cache.load_country("Chad").is_none());
    }

    #[test]
    fn all_listing_round_trips() {
        let (_dir, cache) = store();
        let data = vec![json!({"name": {"common": "Aruba"}})];
        cache.store_all(&data).expect("store");
        assert_eq!(cache.load_all(), Some(data));
    }

    #[test]
    fn country_files_round_trip_and_live_in_their_own_dir() {
        let (dir, cache) = store();
        let data = vec![json!({"name": {"common": "Chad"}})];
        cache.store_country("Chad", &data).expect("store");
        assert_eq!(cache.load_country("Chad"), Some(data));
        assert!(dir.path().join("countries").join("Chad.json").exists());
    }

    #[test]
    fn malformed_files_are_misses() {
        let (dir, cache) = store();
        std::fs::write(dir.path().join("all_countries.json"), "not json").expect("write");
        assert!(cache.load_all().is_none());
    }

    #[test]
    fn stored_files_carry_a_timestamp_envelope() {
        let (dir, cache) = store();
        cache.store_all(&[json!({"x": 1})]).expect("store");
        let raw = std::fs::read_to_string(dir.path().join("all_countries.json")).expect("read");
        let envelope: CacheEnvelope = serde_json::from_str(&raw).expect("envelope");
        assert!(envelope.fetched_at > 0);
        assert_eq!(envelope.data, vec![json!({"x": 1})]);
    }

    #[test]
    fn awkward_names_are_sanitized() {
        let (dir, cache) = store();
        let data = vec![json!({"ok": true})];
        cache.store_country("A/B:C", &data).expect("store");
        assert_eq!(cache.load_country("A/B:C"), Some(data));
        assert!(dir.path().join("countries").join("A_B_C.json").exists());
    }
}
