//! Versioned-defaults merge for stored drafts
//!
//! Stored documents may predate fields added later. Loading merges the stored
//! object over a freshly built default so missing keys keep their defaults.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sow_types::{DocumentKind, Error, Result};

use crate::model::{QuoteDocument, TechPackDocument};

/// Marker key stamped on stored documents
pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";

/// Document types persisted as drafts and library rows
pub trait DocumentSchema: Serialize + DeserializeOwned {
    const KIND: DocumentKind;
    const SCHEMA_VERSION: u32;
    /// Key in the local draft store
    const DRAFT_KEY: &'static str;

    /// Rewrite keys from older stored shapes into their current names
    fn upgrade_stored(_stored: &mut Map<String, Value>) {}
}

impl DocumentSchema for QuoteDocument {
    const KIND: DocumentKind = DocumentKind::Quote;
    const SCHEMA_VERSION: u32 = 1;
    const DRAFT_KEY: &'static str = "sow_quote_draft";
}

impl DocumentSchema for TechPackDocument {
    const KIND: DocumentKind = DocumentKind::TechPack;
    const SCHEMA_VERSION: u32 = 1;
    const DRAFT_KEY: &'static str = "sow_techpack_active_draft";

    /// The first tech packs kept sewing data as `machines` checkboxes and
    /// free-text `finishes`. Each maps onto the field that replaced it,
    /// unless the stored object already fills that field.
    fn upgrade_stored(stored: &mut Map<String, Value>) {
        if let Some(Value::Object(machines)) = stored.remove("machines") {
            let checked = |key: &str| machines.get(key).and_then(Value::as_bool).unwrap_or(false);
            if checked("overloque") {
                fill_if_blank(stored, "machineClosing", "Overloque 4 Fios");
            }
            if checked("galoneira") {
                fill_if_blank(stored, "machineHem", "Galoneira");
            }
            if checked("reta") {
                fill_if_blank(stored, "machineReinforcement", "Reta Industrial");
            }
        }

        if let Some(Value::Object(finishes)) = stored.remove("finishes") {
            let text = |key: &str| {
                finishes
                    .get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            if let Some(collar) = text("gola") {
                fill_if_blank(stored, "collarMaterial", &collar);
            }
            if let Some(hem) = text("bainhas") {
                fill_if_blank(stored, "hemSize", &hem);
            }
            if let Some(cleaning) = text("limpeza") {
                let note = format!("Limpeza: {}", cleaning);
                let merged = match stored.get("obsCostura").and_then(Value::as_str).map(str::trim) {
                    Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, note),
                    _ => note,
                };
                stored.insert("obsCostura".to_string(), Value::String(merged));
            }
        }
    }
}

fn fill_if_blank(stored: &mut Map<String, Value>, key: &str, value: &str) {
    let blank = match stored.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if blank {
        stored.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Overlay `loaded` on top of `defaults`.
///
/// Objects merge key by key, arrays and scalars replace. Keys from older
/// shapes are upgraded first; other unknown keys are ignored by the final
/// deserialization.
pub fn hydrate_over_defaults<T: DocumentSchema>(defaults: T, loaded: Value) -> Result<T> {
    let Value::Object(mut loaded) = loaded else {
        return Err(Error::MalformedDraft(format!(
            "expected a JSON object, got {}",
            json_type_name(&loaded)
        )));
    };
    loaded.remove(SCHEMA_VERSION_KEY);
    T::upgrade_stored(&mut loaded);

    let mut base = serde_json::to_value(defaults)?;
    merge_object(&mut base, loaded);

    serde_json::from_value(base).map_err(|e| Error::MalformedDraft(e.to_string()))
}

fn merge_object(base: &mut Value, overlay: Map<String, Value>) {
    let Value::Object(base_map) = base else {
        *base = Value::Object(overlay);
        return;
    };

    for (key, value) in overlay {
        match (base_map.get_mut(&key), value) {
            (Some(existing @ Value::Object(_)), Value::Object(inner)) => merge_object(existing, inner),
            // null in older saves means "not filled in"
            (Some(_), Value::Null) => {}
            (_, value) => {
                base_map.insert(key, value);
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serialize and stamp the schema version
pub fn to_stored_value<T: DocumentSchema>(doc: &T) -> Result<Value> {
    let mut value = serde_json::to_value(doc)?;
    if let Value::Object(map) = &mut value {
        map.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(T::SCHEMA_VERSION));
    }
    Ok(value)
}
