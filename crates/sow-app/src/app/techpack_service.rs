//! Tech pack use cases
//!
//! The tech pack has no explicit "save draft": every edit made through a
//! [`TechPackSession`] rewrites the draft.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use sow_domain::model::TechPackDocument;
use sow_domain::repository::{DocumentRepository, DraftRepository, StoredDocument};
use sow_domain::service::{set_field, set_field_text, DocumentSchema};
use sow_types::Result;

use super::drafts::{clear_draft, load_document, read_draft, save_document, write_draft};

#[derive(Clone)]
pub struct TechPackService {
    drafts: Arc<dyn DraftRepository>,
    library: Arc<dyn DocumentRepository>,
}

impl TechPackService {
    pub fn new(drafts: Arc<dyn DraftRepository>, library: Arc<dyn DocumentRepository>) -> Self {
        Self { drafts, library }
    }

    /// The active draft merged over today's defaults, or the defaults
    pub fn open(&self, today: NaiveDate) -> Result<TechPackDocument> {
        Ok(read_draft(self.drafts.as_ref(), TechPackDocument::new(today))?
            .unwrap_or_else(|| TechPackDocument::new(today)))
    }

    pub fn autosave(&self, doc: &TechPackDocument) -> Result<()> {
        write_draft(self.drafts.as_ref(), doc)
    }

    pub fn reset(&self, today: NaiveDate) -> Result<TechPackDocument> {
        clear_draft::<TechPackDocument>(self.drafts.as_ref())?;
        Ok(TechPackDocument::new(today))
    }

    pub fn save_to_library(&self, doc: &TechPackDocument) -> Result<StoredDocument> {
        doc.validate_for_save()?;
        save_document(self.library.as_ref(), doc, doc.library_title())
    }

    pub fn list_library(&self) -> Result<Vec<StoredDocument>> {
        self.library.list(TechPackDocument::KIND)
    }

    /// Hydrate a library row over today's defaults and make it the active draft
    pub fn load_from_library(&self, id: &str, today: NaiveDate) -> Result<TechPackDocument> {
        let doc = load_document(self.library.as_ref(), id, TechPackDocument::new(today))?;
        self.autosave(&doc)?;
        Ok(doc)
    }
}

/// Working tech pack plus the service that persists it
pub struct TechPackSession {
    service: TechPackService,
    document: TechPackDocument,
}

impl TechPackSession {
    pub fn open(service: TechPackService, today: NaiveDate) -> Result<Self> {
        let document = service.open(today)?;
        Ok(Self { service, document })
    }

    pub fn document(&self) -> &TechPackDocument {
        &self.document
    }

    pub fn service(&self) -> &TechPackService {
        &self.service
    }

    /// Apply a mutation and autosave the result
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut TechPackDocument) -> R) -> Result<R> {
        let result = f(&mut self.document);
        self.service.autosave(&self.document)?;
        Ok(result)
    }

    /// Run `f` against the document; autosave only when it reports a change.
    /// Immediate-mode forms call this every frame.
    pub fn edit_tracked(&mut self, f: impl FnOnce(&mut TechPackDocument) -> bool) -> Result<bool> {
        let changed = f(&mut self.document);
        if changed {
            self.service.autosave(&self.document)?;
        }
        Ok(changed)
    }

    /// Set one field by its stored path and autosave
    pub fn set_field(&mut self, path: &str, value: Value) -> Result<()> {
        set_field(&mut self.document, path, value)?;
        self.service.autosave(&self.document)
    }

    /// Like [`Self::set_field`], but from text typed by a user
    pub fn set_field_text(&mut self, path: &str, raw: &str) -> Result<()> {
        set_field_text(&mut self.document, path, raw)?;
        self.service.autosave(&self.document)
    }

    /// Swap in a whole document (e.g. one loaded from the library) and autosave
    pub fn replace(&mut self, document: TechPackDocument) -> Result<()> {
        self.document = document;
        self.service.autosave(&self.document)
    }

    pub fn reset(&mut self, today: NaiveDate) -> Result<()> {
        self.document = self.service.reset(today)?;
        Ok(())
    }
}
