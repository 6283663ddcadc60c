//! Shared draft and library plumbing for both document types

use sow_domain::repository::{DocumentRepository, DraftRepository, NewDocument, StoredDocument};
use sow_domain::service::{hydrate_over_defaults, to_stored_value, DocumentSchema};
use sow_types::{Error, Result};
use tracing::{debug, info, warn};

/// Restore the draft stored under `T::DRAFT_KEY`.
///
/// Unreadable drafts are logged and treated as absent; only storage
/// failures are returned as errors.
pub(crate) fn read_draft<T: DocumentSchema>(
    drafts: &dyn DraftRepository,
    defaults: T,
) -> Result<Option<T>> {
    let Some(raw) = drafts.read(T::DRAFT_KEY)? else {
        return Ok(None);
    };

    let restored = serde_json::from_str(&raw)
        .map_err(Error::from)
        .and_then(|value| hydrate_over_defaults(defaults, value));

    match restored {
        Ok(doc) => {
            debug!(key = T::DRAFT_KEY, "draft restored");
            Ok(Some(doc))
        }
        Err(e) => {
            warn!(key = T::DRAFT_KEY, error = %e, "ignoring malformed draft");
            Ok(None)
        }
    }
}

/// Replace the whole draft for `T`
pub(crate) fn write_draft<T: DocumentSchema>(drafts: &dyn DraftRepository, doc: &T) -> Result<()> {
    let value = to_stored_value(doc)?;
    drafts.write(T::DRAFT_KEY, &serde_json::to_string(&value)?)
}

pub(crate) fn clear_draft<T: DocumentSchema>(drafts: &dyn DraftRepository) -> Result<()> {
    drafts.remove(T::DRAFT_KEY)
}

/// Insert a new library row for `doc`
pub(crate) fn save_document<T: DocumentSchema>(
    library: &dyn DocumentRepository,
    doc: &T,
    title: String,
) -> Result<StoredDocument> {
    let row = library.save(NewDocument {
        kind: T::KIND,
        title,
        content: to_stored_value(doc)?,
    })?;
    info!(id = %row.id, kind = %row.kind, "saved to library");
    Ok(row)
}

/// Load a library row of kind `T::KIND` and merge it over `defaults`
pub(crate) fn load_document<T: DocumentSchema>(
    library: &dyn DocumentRepository,
    id: &str,
    defaults: T,
) -> Result<T> {
    let row = library
        .load(id)?
        .ok_or_else(|| Error::NotFound(format!("documento {}", id)))?;
    if row.kind != T::KIND {
        return Err(Error::NotFound(format!(
            "documento {} não é do tipo {}",
            id,
            T::KIND.label()
        )));
    }
    hydrate_over_defaults(defaults, row.content)
}
