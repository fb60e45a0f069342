//! Query builder for collection queries.

use serde_json::Value;

use crate::document::Document;

/// Comparison operators supported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Field equals value.
    Eq,
    /// Field is one of the values in an array.
    In,
    /// Field greater than value.
    Gt,
    /// Field greater than or equal to value.
    Ge,
    /// Field less than value.
    Lt,
    /// Field less than or equal to value.
    Le,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::In => "in",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: Op,
    pub value: Value,
}

/// A sort key. Keys apply in the order they were registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// A fully composed query, ready for [`crate::CollectionStore::run`].
///
/// Backends apply the parts in the fixed order filters, sorts, cursor,
/// limit; the cursor only has meaning under the exact filter and sort set
/// it was produced with.
#[derive(Debug, Clone, Default)]
pub struct StructuredQuery {
    pub predicates: Vec<Predicate>,
    pub sort_keys: Vec<SortKey>,
    pub cursor: Option<Document>,
    pub limit: Option<usize>,
}

/// Accumulates predicates, sort keys, a cursor, and a row limit, in any
/// call order, and composes them into a [`StructuredQuery`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    predicates: Vec<Predicate>,
    sort_keys: Vec<SortKey>,
    cursor: Option<Document>,
    limit: Option<usize>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    ///
    /// A null value or an empty array means "no filter" and is silently
    /// dropped, so callers can pass optional criteria straight through.
    pub fn filter(mut self, field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        let value = value.into();
        if value.is_null() {
            return self;
        }
        if matches!(&value, Value::Array(items) if items.is_empty()) {
            return self;
        }
        self.predicates.push(Predicate {
            field: field.into(),
            op,
            value,
        });
        self
    }

    /// Add a multi-value equality predicate.
    ///
    /// A single-element set becomes a plain equality; a larger set becomes
    /// an `in` predicate. Backends index the two differently, so the
    /// distinction is made here rather than left to the store.
    pub fn filter_any(mut self, field: impl Into<String>, mut values: Vec<Value>) -> Self {
        match values.len() {
            0 => self,
            1 => self.filter(field, Op::Eq, values.remove(0)),
            _ => {
                self.predicates.push(Predicate {
                    field: field.into(),
                    op: Op::In,
                    value: Value::Array(values),
                });
                self
            }
        }
    }

    /// Add a sort key. Keys apply in registration order.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort_keys.push(SortKey {
            field: field.into(),
            direction,
        });
        self
    }

    /// Resume strictly after the given document.
    pub fn start_after(mut self, cursor: Document) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Cap the number of rows returned. Non-positive limits are ignored.
    pub fn limit(mut self, n: i64) -> Self {
        if n > 0 {
            self.limit = Some(n as usize);
        }
        self
    }

    /// Compose the accumulated parts into a single query.
    pub fn build(self) -> StructuredQuery {
        StructuredQuery {
            predicates: self.predicates,
            sort_keys: self.sort_keys,
            cursor: self.cursor,
            limit: self.limit,
        }
    }
}
