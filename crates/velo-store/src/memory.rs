//! In-memory document store backend.
//!
//! Used for local runs and tests. Implements the full query surface of
//! [`CollectionStore`]: JSON-value filtering, multi-key ordering with a
//! document-id tiebreak, strictly-after cursor resume, limits, and a native
//! count aggregation that can be switched off to exercise the fallback
//! counting path in callers.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::StoreError;
use crate::query::{Direction, Op, Predicate, SortKey, StructuredQuery};
use crate::CollectionStore;

/// In-memory [`CollectionStore`].
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Map<String, Value>>>>,
    counter: AtomicU64,
    aggregation: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(1),
            aggregation: true,
        }
    }

    /// Disable the native count aggregation, forcing callers onto their
    /// fetch-and-count fallback.
    pub fn without_aggregation(mut self) -> Self {
        self.aggregation = false;
        self
    }

    /// Synchronous [`CollectionStore::set`], convenient for seeding test
    /// fixtures.
    pub fn seed(&self, collection: &str, id: impl Into<String>, fields: Map<String, Value>) {
        let mut collections = self.collections.write().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), fields);
    }

    fn next_id(&self) -> String {
        let counter = self.counter.fetch_add(1, AtomicOrdering::SeqCst);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        format!("{:x}{:04x}", nanos ^ (counter << 48), counter & 0xffff)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn run(
        &self,
        collection: &str,
        query: StructuredQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().unwrap();
        let rows = collections.get(collection);

        let mut docs: Vec<Document> = rows
            .map(|rows| {
                rows.iter()
                    .filter(|(_, fields)| matches_all(&query.predicates, fields))
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();

        docs.sort_by(|a, b| compare_documents(a, b, &query.sort_keys));

        if let Some(cursor) = &query.cursor {
            docs = resume_after(docs, cursor, &query.sort_keys);
        }

        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }

        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|rows| rows.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let id = self.next_id();
        let mut collections = self.collections.write().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.seed(collection, id, fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().unwrap();
        let rows = collections.entry(collection.to_string()).or_default();
        match rows.get_mut(id) {
            Some(existing) => {
                *existing = fields;
                Ok(())
            }
            None => Err(StoreError::backend(
                crate::ErrorCode::NotFound,
                format!("no document {id} in {collection}"),
            )),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().unwrap();
        if let Some(rows) = collections.get_mut(collection) {
            rows.remove(id);
        }
        Ok(())
    }

    async fn count(&self, collection: &str, predicates: &[Predicate]) -> Result<u64, StoreError> {
        if !self.aggregation {
            return Err(StoreError::AggregationUnsupported);
        }
        let collections = self.collections.read().unwrap();
        let count = collections
            .get(collection)
            .map(|rows| {
                rows.values()
                    .filter(|fields| matches_all(predicates, fields))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }
}

fn matches_all(predicates: &[Predicate], fields: &Map<String, Value>) -> bool {
    predicates.iter().all(|p| matches(p, fields))
}

fn matches(predicate: &Predicate, fields: &Map<String, Value>) -> bool {
    // A missing field never matches a filter.
    let Some(actual) = fields.get(&predicate.field) else {
        return false;
    };
    match predicate.op {
        Op::Eq => actual == &predicate.value,
        Op::In => match &predicate.value {
            Value::Array(candidates) => candidates.contains(actual),
            _ => false,
        },
        Op::Gt => compare_values(actual, &predicate.value) == Some(Ordering::Greater),
        Op::Ge => matches!(
            compare_values(actual, &predicate.value),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        Op::Lt => compare_values(actual, &predicate.value) == Some(Ordering::Less),
        Op::Le => matches!(
            compare_values(actual, &predicate.value),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
    }
}

/// Compare two JSON values of the same kind. Mixed kinds are incomparable
/// for range filters.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Total order used for sorting: absent and null sort first, then bools,
/// numbers, strings; everything else ranks last by its JSON rendering.
fn order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match rank(a).cmp(&rank(b)) {
        Ordering::Equal => match (a, b) {
            (Some(a), Some(b)) => compare_values(a, b).unwrap_or_else(|| {
                a.to_string().cmp(&b.to_string())
            }),
            _ => Ordering::Equal,
        },
        other => other,
    }
}

fn compare_documents(a: &Document, b: &Document, sort_keys: &[SortKey]) -> Ordering {
    for key in sort_keys {
        let ordering = order_values(a.get(&key.field), b.get(&key.field));
        let ordering = match key.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    // Id tiebreak keeps the order total, which cursors depend on.
    a.id.cmp(&b.id)
}

/// Drop every row up to and including the cursor position.
///
/// When the cursor row is still present it is matched by id; when it has
/// been deleted since the cursor was taken, its sort-key values locate the
/// resume point instead, preserving "resume after a known record".
fn resume_after(docs: Vec<Document>, cursor: &Document, sort_keys: &[SortKey]) -> Vec<Document> {
    if let Some(position) = docs.iter().position(|d| d.id == cursor.id) {
        return docs.into_iter().skip(position + 1).collect();
    }
    docs.into_iter()
        .skip_while(|d| compare_documents(d, cursor, sort_keys) != Ordering::Greater)
        .collect()
}
