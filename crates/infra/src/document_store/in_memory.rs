use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::DateTime;
use serde_json::Value as JsonValue;

use shopledger_core::DocumentId;

use super::r#trait::{Document, DocumentStore, Filter, OrderBy, SortDirection, StoreError};

/// In-memory document store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<DocumentId, JsonValue>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cross-type rank: null < bool < number < string < array < object.
fn type_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}

// Timestamp fields are stored as RFC 3339 strings with variable subsecond
// precision, where lexicographic order diverges from chronological order.
fn compare_strings(a: &str, b: &str) -> Ordering {
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::String(x), JsonValue::String(y)) => compare_strings(x, y),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(&self, collection: &str, data: JsonValue) -> Result<DocumentId, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let id = DocumentId::new();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, data);

        Ok(id)
    }

    fn query(
        &self,
        collection: &str,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut documents: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| {
                        filter
                            .as_ref()
                            .map_or(true, |f| data.get(&f.field) == Some(&f.value))
                    })
                    .map(|(id, data)| Document {
                        id: *id,
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            documents.sort_by(|a, b| {
                let ordering = compare_values(
                    a.data.get(&order.field).unwrap_or(&JsonValue::Null),
                    b.data.get(&order.field).unwrap_or(&JsonValue::Null),
                );
                match order.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        Ok(documents)
    }

    fn patch(
        &self,
        collection: &str,
        id: DocumentId,
        changes: JsonValue,
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&id))
            .ok_or(StoreError::NotFound(id))?;

        // Application-level read-modify-write merge of top-level keys.
        // Non-object payloads replace the document wholesale.
        match (document, changes) {
            (JsonValue::Object(existing), JsonValue::Object(changes)) => {
                for (key, value) in changes {
                    existing.insert(key, value);
                }
            }
            (document, changes) => *document = changes,
        }

        Ok(())
    }

    fn remove(&self, collection: &str, id: DocumentId) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(&id))
            .ok_or(StoreError::NotFound(id))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_assigns_distinct_ids() {
        let store = InMemoryDocumentStore::new();

        let a = store.insert("things", json!({"n": 1})).unwrap();
        let b = store.insert("things", json!({"n": 2})).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.query("things", None, None).unwrap().len(), 2);
    }

    #[test]
    fn query_on_missing_collection_is_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.query("nope", None, None).unwrap().is_empty());
    }

    #[test]
    fn filter_matches_on_field_equality() {
        let store = InMemoryDocumentStore::new();
        store.insert("things", json!({"color": "red"})).unwrap();
        store.insert("things", json!({"color": "blue"})).unwrap();
        store.insert("things", json!({"color": "red"})).unwrap();

        let red = store
            .query("things", Some(Filter::equals("color", "red")), None)
            .unwrap();
        assert_eq!(red.len(), 2);

        let green = store
            .query("things", Some(Filter::equals("color", "green")), None)
            .unwrap();
        assert!(green.is_empty());
    }

    #[test]
    fn order_by_numbers() {
        let store = InMemoryDocumentStore::new();
        store.insert("things", json!({"n": 3})).unwrap();
        store.insert("things", json!({"n": 1})).unwrap();
        store.insert("things", json!({"n": 2})).unwrap();

        let ascending = store
            .query("things", None, Some(OrderBy::asc("n")))
            .unwrap();
        let ns: Vec<_> = ascending.iter().map(|d| d.data["n"].as_i64()).collect();
        assert_eq!(ns, vec![Some(1), Some(2), Some(3)]);

        let descending = store
            .query("things", None, Some(OrderBy::desc("n")))
            .unwrap();
        let ns: Vec<_> = descending.iter().map(|d| d.data["n"].as_i64()).collect();
        assert_eq!(ns, vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn order_by_compares_timestamps_chronologically() {
        let store = InMemoryDocumentStore::new();
        // Lexicographically "...00Z" sorts after "...00.500Z"; chronologically
        // it comes first. The store must use chronological order.
        store
            .insert("things", json!({"at": "2026-01-01T00:00:00.500Z", "n": 2}))
            .unwrap();
        store
            .insert("things", json!({"at": "2026-01-01T00:00:00Z", "n": 1}))
            .unwrap();

        let ascending = store
            .query("things", None, Some(OrderBy::asc("at")))
            .unwrap();
        let ns: Vec<_> = ascending.iter().map(|d| d.data["n"].as_i64()).collect();
        assert_eq!(ns, vec![Some(1), Some(2)]);
    }

    #[test]
    fn patch_merges_top_level_keys() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert("things", json!({"keep": "yes", "change": "old"}))
            .unwrap();

        store
            .patch("things", id, json!({"change": "new", "added": 1}))
            .unwrap();

        let docs = store.query("things", None, None).unwrap();
        assert_eq!(docs[0].data, json!({"keep": "yes", "change": "new", "added": 1}));
    }

    #[test]
    fn patch_missing_document_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .patch("things", DocumentId::new(), json!({"x": 1}))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn remove_deletes_and_reports_missing() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert("things", json!({"n": 1})).unwrap();

        store.remove("things", id).unwrap();
        assert!(store.query("things", None, None).unwrap().is_empty());

        let err = store.remove("things", id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
