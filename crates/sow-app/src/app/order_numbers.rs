//! Order number allocation backed by the draft store
//!
//! The counter holds the last committed `{year, sequence}`. Allocation only
//! reads it; the counter moves when a quote is committed.

use std::sync::Arc;

use sow_domain::repository::DraftRepository;
use sow_domain::service::{next_order_number, OrderNumber, OrderSequenceState};
use sow_types::Result;
use tracing::{info, warn};

use crate::constants::storage::ORDER_COUNTER_KEY;

#[derive(Clone)]
pub struct OrderNumberAllocator {
    drafts: Arc<dyn DraftRepository>,
}

impl OrderNumberAllocator {
    pub fn new(drafts: Arc<dyn DraftRepository>) -> Self {
        Self { drafts }
    }

    /// Last committed state; an unreadable counter counts as none
    pub fn last_committed(&self) -> Result<Option<OrderSequenceState>> {
        let Some(raw) = self.drafts.read(ORDER_COUNTER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<OrderSequenceState>(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(error = %e, raw = %raw, "corrupt order counter, restarting sequence");
                Ok(None)
            }
        }
    }

    /// Provisional number for a new quote in `year`
    pub fn allocate(&self, year: i32) -> Result<OrderNumber> {
        let number = next_order_number(self.last_committed()?, year);
        info!(order_number = %number, "order number allocated");
        Ok(number)
    }

    /// Persist `number` as the last used one
    pub fn commit(&self, number: OrderNumber) -> Result<()> {
        let state = OrderSequenceState::from(number);
        self.drafts
            .write(ORDER_COUNTER_KEY, &serde_json::to_string(&state)?)?;
        info!(order_number = %number, "order number committed");
        Ok(())
    }
}
