//! File-based draft store
//!
//! All draft keys live in one `drafts.json` object mapping key to the
//! serialized value.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Mutex;

use sow_domain::repository::DraftRepository;
use sow_types::{Error, Result};
use tracing::warn;

use super::{lock, write_atomic};

pub struct FileDraftRepository {
    store_path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileDraftRepository {
    /// Create or load the draft store in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("drafts.json");

        let entries = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_else(|e| {
                warn!(path = %store_path.display(), error = %e, "unreadable draft store, starting empty");
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            store_path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        write_atomic(&self.store_path, &serde_json::to_vec_pretty(entries)?)
    }
}

impl DraftRepository for FileDraftRepository {
    fn read(&self, key: &str) -> std::result::Result<Option<String>, Error> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> std::result::Result<(), Error> {
        let mut entries = lock(&self.entries)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> std::result::Result<(), Error> {
        let mut entries = lock(&self.entries)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
