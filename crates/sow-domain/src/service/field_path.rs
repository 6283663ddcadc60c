//! Dotted-path field edits
//!
//! Paths use the stored (camelCase) key names, e.g. `printLocations.local1.art`
//! or `productionGrid.0.color`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sow_types::{Error, Result};

/// Set a single field addressed by `path`.
///
/// Unknown paths and values of the wrong type are rejected and leave `doc`
/// untouched. Text fields accept numbers and booleans as their string form.
pub fn set_field<T>(doc: &mut T, path: &str, value: Value) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let segments = split_path(path)?;
    let mut root = serde_json::to_value(&*doc)?;
    let leaf = resolve_mut(&mut root, &segments)
        .ok_or_else(|| Error::Validation(format!("Campo desconhecido: {}", path)))?;

    let value = match (&*leaf, value) {
        (Value::String(_), Value::Number(n)) => Value::String(n.to_string()),
        (Value::String(_), Value::Bool(b)) => Value::String(b.to_string()),
        (_, value) => value,
    };
    let expected_text = value.as_str().map(str::to_string);
    *leaf = value;

    let updated: T = serde_json::from_value(root)
        .map_err(|e| Error::Validation(format!("Valor inválido para {}: {}", path, e)))?;

    // Closed option lists drop unknown labels on load; surface that here.
    if let Some(expected) = expected_text {
        let check = serde_json::to_value(&updated)?;
        let stored = lookup(&check, &segments).and_then(Value::as_str);
        if stored != Some(expected.as_str()) {
            return Err(Error::Validation(format!(
                "Valor inválido para {}: {}",
                path, expected
            )));
        }
    }

    *doc = updated;
    Ok(())
}

/// Set a field from text typed by a user.
///
/// Text fields keep `raw` exactly as typed (`1.50` stays `1.50`). Other
/// fields read it as JSON, falling back to a plain string.
pub fn set_field_text<T>(doc: &mut T, path: &str, raw: &str) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let segments = split_path(path)?;
    let root = serde_json::to_value(&*doc)?;
    let value = match lookup(&root, &segments) {
        Some(Value::String(_)) => Value::String(raw.to_string()),
        _ => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    };
    set_field(doc, path, value)
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').map(str::trim).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::Validation(format!("Campo inválido: '{}'", path)));
    }
    Ok(segments)
}

fn resolve_mut<'a>(value: &'a mut Value, segments: &[&str]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get_mut(*segment)?,
            Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn lookup<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PrintTechnique, TechPackDocument};
    use chrono::NaiveDate;
    use serde_json::json;

    fn doc() -> TechPackDocument {
        TechPackDocument::new(NaiveDate::from_ymd_opt(2025, 5, 10).unwrap())
    }

    #[test]
    fn test_nested_text() {
        let mut doc = doc();
        set_field(&mut doc, "printLocations.local1.art", json!("Logo bordado")).unwrap();
        assert_eq!(doc.print_locations.local1.art, "Logo bordado");
    }

    #[test]
    fn test_number_into_text_field() {
        let mut doc = doc();
        set_field(&mut doc, "dtfTemp", json!(160)).unwrap();
        assert_eq!(doc.dtf_temp, "160");
    }

    #[test]
    fn test_typed_text_is_kept_verbatim() {
        let mut doc = doc();
        set_field_text(&mut doc, "fabricWidth", "1.50").unwrap();
        set_field_text(&mut doc, "reference", "007").unwrap();
        set_field_text(&mut doc, "dtfTime", "1e1").unwrap();
        assert_eq!(doc.fabric_width, "1.50");
        assert_eq!(doc.reference, "007");
        assert_eq!(doc.dtf_time, "1e1");
    }

    #[test]
    fn test_typed_text_for_other_fields() {
        let mut doc = doc();
        set_field_text(&mut doc, "restTime", "true").unwrap();
        assert!(doc.rest_time);
        set_field_text(&mut doc, "printSpecs.technique", "Sublimação").unwrap();
        assert_eq!(doc.print_specs.technique, Some(PrintTechnique::Sublimation));
        doc.add_grid_row("Preto");
        set_field_text(&mut doc, "productionGrid.0.sizes.M", "8").unwrap();
        assert_eq!(doc.grid_total(), 8);
        assert!(set_field_text(&mut doc, "restTime", "talvez").unwrap_err().is_validation());
    }

    #[test]
    fn test_bool_and_choice() {
        let mut doc = doc();
        set_field(&mut doc, "restTime", json!(true)).unwrap();
        assert!(doc.rest_time);
        set_field(&mut doc, "printSpecs.technique", json!("Sublimação")).unwrap();
        assert_eq!(doc.print_specs.technique, Some(PrintTechnique::Sublimation));
    }

    #[test]
    fn test_grid_index() {
        let mut doc = doc();
        doc.add_grid_row("Preto");
        set_field(&mut doc, "productionGrid.0.sizes.GG", json!(12)).unwrap();
        assert_eq!(doc.grid_total(), 12);
        assert!(set_field(&mut doc, "productionGrid.3.color", json!("x")).is_err());
    }

    #[test]
    fn test_rejections_leave_doc_untouched() {
        let mut doc = doc();
        let before = doc.clone();

        assert!(set_field(&mut doc, "printLocations.local9.art", json!("x")).unwrap_err().is_validation());
        assert!(set_field(&mut doc, "restTime", json!("talvez")).unwrap_err().is_validation());
        assert!(set_field(&mut doc, "printSpecs.touch", json!("Áspero")).unwrap_err().is_validation());
        assert!(set_field(&mut doc, "reference..x", json!("x")).unwrap_err().is_validation());
        assert_eq!(doc, before);
    }
}
