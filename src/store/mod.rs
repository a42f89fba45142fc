//! Document store abstraction
//!
//! Data-access code only ever speaks to [`DocumentStore`]: named collections
//! of JSON documents with store-assigned ids, equality filters, a single
//! ordering and a limit. Backends are chosen by the connection provider.

pub mod memory;
pub mod postgres;

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Collection holding user profiles
pub const USER_PROFILES: &str = "userProfiles";
/// Collection holding the book inventory
pub const BOOKS: &str = "books";
/// Collection holding the activity log
pub const ACTIVITIES: &str = "activities";

/// Field map of a document (everything except its id)
pub type Fields = Map<String, Value>;

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Merge the id into the fields and deserialize into a model
    pub fn decode<T: DeserializeOwned>(self) -> AppResult<T> {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert("id".to_string(), Value::String(self.id));
        object.extend(self.fields);
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

/// Sort direction of a query ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Query against a single collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    /// Equality filters, all of which must hold
    pub filters: Vec<(String, Value)>,
    /// Documents lacking this field are excluded from the result
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Operations the data-access layer needs from a document database.
///
/// There is no compare-and-swap and no transaction: `update` is a blind
/// shallow merge, so read-modify-write sequences built on top of it are not
/// serialized against each other.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its generated id
    async fn add(&self, collection: &str, fields: Fields) -> AppResult<String>;

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Shallow-merge `fields` into an existing document.
    /// Fails with a not-found error when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()>;

    async fn query(&self, query: &Query) -> AppResult<Vec<Document>>;

    /// Connectivity probe
    async fn ping(&self) -> AppResult<()>;
}

/// Store representation of a timestamp.
///
/// Fixed microsecond precision keeps lexical order equal to chronological
/// order, which the store relies on when ordering by a timestamp field.
pub fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

pub(crate) fn missing_document(collection: &str, id: &str) -> AppError {
    AppError::NotFound(format!("No document to update: {}/{}", collection, id))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array < object
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(l, r)| compare_values(l, r))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
