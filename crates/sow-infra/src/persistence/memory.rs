//! In-memory repositories for tests and dry runs

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use sow_domain::repository::{DocumentRepository, DraftRepository, NewDocument, StoredDocument};
use sow_types::{DocumentKind, Error};

use super::lock;

#[derive(Default)]
pub struct MemoryDraftRepository {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftRepository for MemoryDraftRepository {
    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Error> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

/// Library kept in a `Vec`; ids are sequential and timestamps strictly increase
#[derive(Default)]
pub struct MemoryDocumentRepository {
    rows: Mutex<Vec<StoredDocument>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentRepository for MemoryDocumentRepository {
    fn save(&self, document: NewDocument) -> Result<StoredDocument, Error> {
        let mut rows = lock(&self.rows)?;
        let created_at = match rows.last() {
            Some(last) => (last.created_at + Duration::milliseconds(1)).max(Utc::now()),
            None => Utc::now(),
        };
        let row = StoredDocument {
            id: (rows.len() + 1).to_string(),
            kind: document.kind,
            title: document.title,
            content: document.content,
            created_at,
        };
        rows.push(row.clone());
        Ok(row)
    }

    fn load(&self, id: &str) -> Result<Option<StoredDocument>, Error> {
        Ok(lock(&self.rows)?.iter().find(|row| row.id == id).cloned())
    }

    fn list(&self, kind: DocumentKind) -> Result<Vec<StoredDocument>, Error> {
        let mut matching: Vec<_> = lock(&self.rows)?
            .iter()
            .filter(|row| row.kind == kind)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    fn count(&self, kind: DocumentKind) -> Result<usize, Error> {
        Ok(lock(&self.rows)?.iter().filter(|row| row.kind == kind).count())
    }
}
