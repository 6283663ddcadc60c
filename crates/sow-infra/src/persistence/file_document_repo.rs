//! File-based document library (`documents.json`)

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use sow_domain::repository::{DocumentRepository, NewDocument, StoredDocument};
use sow_types::{DocumentKind, Error, Result};
use tracing::{info, warn};

use super::{lock, quarantine, write_atomic};

/// Stores every saved document as one row in a JSON array, oldest first
pub struct FileDocumentRepository {
    store_path: PathBuf,
    rows: Mutex<Vec<StoredDocument>>,
}

impl FileDocumentRepository {
    /// Create or load the library in `store_dir`
    ///
    /// An unreadable `documents.json` is moved to `documents.json.corrupt`
    /// before the library starts empty, so the next save cannot overwrite it.
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("documents.json");

        let rows = if store_path.exists() {
            let file = File::open(&store_path)?;
            let parsed: std::result::Result<Vec<StoredDocument>, _> =
                serde_json::from_reader(BufReader::new(file));
            match parsed {
                Ok(rows) => rows,
                Err(e) => {
                    let moved_to = quarantine(&store_path)?;
                    warn!(
                        path = %store_path.display(),
                        moved_to = %moved_to.display(),
                        error = %e,
                        "unreadable document library set aside, starting empty"
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            rows: Mutex::new(rows),
        })
    }

    fn persist(&self, rows: &[StoredDocument]) -> Result<()> {
        write_atomic(&self.store_path, &serde_json::to_vec_pretty(rows)?)
    }
}

impl DocumentRepository for FileDocumentRepository {
    fn save(&self, document: NewDocument) -> std::result::Result<StoredDocument, Error> {
        let row = StoredDocument {
            id: uuid::Uuid::new_v4().simple().to_string(),
            kind: document.kind,
            title: document.title,
            content: document.content,
            created_at: Utc::now(),
        };

        let mut rows = lock(&self.rows)?;
        rows.push(row.clone());
        if let Err(e) = self.persist(&rows) {
            rows.pop();
            return Err(e);
        }
        info!(id = %row.id, kind = %row.kind, title = %row.title, "document saved");
        Ok(row)
    }

    fn load(&self, id: &str) -> std::result::Result<Option<StoredDocument>, Error> {
        Ok(lock(&self.rows)?.iter().find(|row| row.id == id).cloned())
    }

    fn list(&self, kind: DocumentKind) -> std::result::Result<Vec<StoredDocument>, Error> {
        let rows = lock(&self.rows)?;
        // Reverse first so rows sharing a timestamp stay newest-inserted first
        let mut matching: Vec<_> = rows.iter().rev().filter(|row| row.kind == kind).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    fn count(&self, kind: DocumentKind) -> std::result::Result<usize, Error> {
        Ok(lock(&self.rows)?.iter().filter(|row| row.kind == kind).count())
    }
}
