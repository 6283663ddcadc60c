//! Quote use cases: open with draft recovery, drafts, commit, library

use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, Utc};
use sow_domain::model::quote::UNASSIGNED_ORDER_NUMBER;
use sow_domain::model::QuoteDocument;
use sow_domain::repository::{DocumentRepository, DraftRepository, StoredDocument};
use sow_domain::service::{DocumentSchema, OrderNumber};
use sow_types::Result;
use tracing::warn;

use super::drafts::{clear_draft, load_document, read_draft, save_document, write_draft};
use super::order_numbers::OrderNumberAllocator;

#[derive(Clone)]
pub struct QuoteService {
    drafts: Arc<dyn DraftRepository>,
    library: Arc<dyn DocumentRepository>,
    numbers: OrderNumberAllocator,
}

impl QuoteService {
    pub fn new(drafts: Arc<dyn DraftRepository>, library: Arc<dyn DocumentRepository>) -> Self {
        let numbers = OrderNumberAllocator::new(drafts.clone());
        Self {
            drafts,
            library,
            numbers,
        }
    }

    /// The saved draft if there is one, otherwise a fresh quote with the
    /// next provisional order number
    pub fn open(&self, now: DateTime<Utc>) -> Result<QuoteDocument> {
        let defaults = QuoteDocument::new(UNASSIGNED_ORDER_NUMBER, now);
        match read_draft(self.drafts.as_ref(), defaults)? {
            Some(doc) => Ok(doc),
            None => self.fresh(now),
        }
    }

    fn fresh(&self, now: DateTime<Utc>) -> Result<QuoteDocument> {
        let year = now.with_timezone(&Local).year();
        let number = self.numbers.allocate(year)?;
        Ok(QuoteDocument::new(number.to_string(), now))
    }

    pub fn save_draft(&self, doc: &QuoteDocument) -> Result<()> {
        write_draft(self.drafts.as_ref(), doc)
    }

    /// Save the draft and record its order number as used.
    ///
    /// Called when the quote is printed. A number that does not parse as
    /// `NNN/YYYY` leaves the counter untouched.
    pub fn commit(&self, doc: &QuoteDocument) -> Result<()> {
        self.save_draft(doc)?;
        match doc.order_number.parse::<OrderNumber>() {
            Ok(number) => self.numbers.commit(number),
            Err(e) => {
                warn!(order_number = %doc.order_number, error = %e, "order counter not advanced");
                Ok(())
            }
        }
    }

    /// Drop the draft and start over with a new provisional number
    pub fn reset(&self, now: DateTime<Utc>) -> Result<QuoteDocument> {
        clear_draft::<QuoteDocument>(self.drafts.as_ref())?;
        self.fresh(now)
    }

    pub fn save_to_library(&self, doc: &QuoteDocument) -> Result<StoredDocument> {
        doc.validate_for_save()?;
        save_document(self.library.as_ref(), doc, doc.library_title())
    }

    pub fn list_library(&self) -> Result<Vec<StoredDocument>> {
        self.library.list(QuoteDocument::KIND)
    }

    /// Replace the working quote with a library row
    pub fn load_from_library(&self, id: &str, now: DateTime<Utc>) -> Result<QuoteDocument> {
        load_document(
            self.library.as_ref(),
            id,
            QuoteDocument::new(UNASSIGNED_ORDER_NUMBER, now),
        )
    }
}
