//! Response envelope unwrapping
//!
//! Backends answer list calls either with a bare array or with the array
//! wrapped in an object (`{"leads": [...]}`, `{"data": [...]}`). Callers only
//! ever see the typed items.

use crate::core::error::{ClientError, ClientResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keys tried after the resource-specific ones
const FALLBACK_LIST_KEYS: &[&str] = &["data", "items", "results"];

/// Raw list response shape, decided once at the boundary
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Bare(Vec<Value>),
    Enveloped(Map<String, Value>),
}

/// Unwrap and decode a list response.
///
/// `keys` are tried in order before the generic `data`/`items`/`results`
/// keys; failing those, an envelope with exactly one array-valued field is
/// accepted. Each item is decoded separately so the error names the
/// offending position.
pub fn unwrap_list<T: DeserializeOwned>(value: Value, keys: &[&str], resource: &str) -> ClientResult<Vec<T>> {
    let payload: ListPayload = serde_json::from_value(value).map_err(|_| {
        ClientError::decode(resource, "expected an array or an object envelope")
    })?;

    let items = match payload {
        ListPayload::Bare(items) => items,
        ListPayload::Enveloped(map) => find_array(map, keys).ok_or_else(|| {
            ClientError::decode(resource, "envelope does not contain an array of items")
        })?,
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| ClientError::decode(resource, format!("item {index}: {e}")))
        })
        .collect()
}

fn find_array(mut map: Map<String, Value>, keys: &[&str]) -> Option<Vec<Value>> {
    for key in keys.iter().chain(FALLBACK_LIST_KEYS) {
        match map.remove(*key) {
            Some(Value::Array(items)) => return Some(items),
            // {"data": {"leads": [...]}}
            Some(Value::Object(inner)) => {
                if let Some(items) = find_array(inner, keys) {
                    return Some(items);
                }
            }
            _ => {}
        }
    }

    let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
        Value::Array(items) => Some(items),
        _ => None,
    });
    match (arrays.next(), arrays.next()) {
        (Some(items), None) => Some(items),
        _ => None,
    }
}

/// Unwrap and decode a single-item response.
///
/// An object found under one of `keys` (or `data`) is decoded; otherwise the
/// response object itself is the item.
pub fn unwrap_one<T: DeserializeOwned>(value: Value, keys: &[&str], resource: &str) -> ClientResult<T> {
    let Value::Object(mut map) = value else {
        return Err(ClientError::decode(resource, "expected a JSON object"));
    };

    let wrapper = keys
        .iter()
        .chain(&["data"])
        .find(|key| matches!(map.get(**key), Some(Value::Object(_))))
        .copied();

    let item = match wrapper.and_then(|key| map.remove(key)) {
        Some(inner) => inner,
        None => Value::Object(map),
    };
    serde_json::from_value(item).map_err(|e| ClientError::decode(resource, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    fn ids(items: Vec<Item>) -> Vec<String> {
        items.into_iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_bare_array_passes_through() {
        let items: Vec<Item> = unwrap_list(json!([{"id": "1"}, {"id": "2"}]), &["leads"], "leads").unwrap();
        assert_eq!(ids(items), vec!["1", "2"]);
    }

    #[test]
    fn test_named_envelope() {
        let value = json!({"leads": [{"id": "1"}], "total": 1});
        let items: Vec<Item> = unwrap_list(value, &["leads"], "leads").unwrap();
        assert_eq!(ids(items), vec!["1"]);
    }

    #[test]
    fn test_data_envelope_and_nested() {
        let items: Vec<Item> = unwrap_list(json!({"data": [{"id": "a"}]}), &["budgets"], "budgets").unwrap();
        assert_eq!(ids(items), vec!["a"]);

        let nested = json!({"data": {"budgets": [{"id": "b"}], "page": 1}});
        let items: Vec<Item> = unwrap_list(nested, &["budgets"], "budgets").unwrap();
        assert_eq!(ids(items), vec!["b"]);
    }

    #[test]
    fn test_single_unknown_array_field() {
        let value = json!({"onboardingRecords": [{"id": "x"}], "success": true});
        let items: Vec<Item> = unwrap_list(value, &["onboardings"], "onboardings").unwrap();
        assert_eq!(ids(items), vec!["x"]);
    }

    #[test]
    fn test_ambiguous_envelope_is_decode_error() {
        let value = json!({"a": [], "b": []});
        let err = unwrap_list::<Item>(value, &["leads"], "leads").unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn test_scalar_is_decode_error() {
        let err = unwrap_list::<Item>(json!("nope"), &[], "leads").unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn test_bad_item_names_position() {
        let err = unwrap_list::<Item>(json!([{"id": "1"}, {"name": "x"}]), &[], "leads").unwrap_err();
        assert!(err.to_string().contains("item 1"));
    }

    #[test]
    fn test_unwrap_one_shapes() {
        let item: Item = unwrap_one(json!({"id": "1"}), &["lead"], "lead").unwrap();
        assert_eq!(item.id, "1");

        let item: Item = unwrap_one(json!({"lead": {"id": "2"}, "message": "ok"}), &["lead"], "lead").unwrap();
        assert_eq!(item.id, "2");

        let item: Item = unwrap_one(json!({"data": {"id": "3"}}), &["lead"], "lead").unwrap();
        assert_eq!(item.id, "3");

        assert!(unwrap_one::<Item>(json!([1]), &["lead"], "lead").is_err());
    }
}
