use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use thiserror::Error;
use crate::models::Record;
use crate::services::appwrite::AppwriteError;
use crate::services::postgres::PostgresError;

/// Errors surfaced by any document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Appwrite error: {0}")]
    Appwrite(#[from] AppwriteError),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Collections held in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Tutor,
    Student,
    Class,
    Vacancy,
    Attendance,
    LiveSession,
    Reward,
    Connection,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Tutor,
        Collection::Student,
        Collection::Class,
        Collection::Vacancy,
        Collection::Attendance,
        Collection::LiveSession,
        Collection::Reward,
        Collection::Connection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Tutor => "tutor",
            Collection::Student => "student",
            Collection::Class => "class",
            Collection::Vacancy => "vacancy",
            Collection::Attendance => "attendance",
            Collection::LiveSession => "live_session",
            Collection::Reward => "reward",
            Collection::Connection => "connection",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conjunction of top-level field equality constraints
///
/// An empty filter matches every document of a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(BTreeMap<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Require `field` to equal `value` when a value is given
    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Check a document's fields against every constraint
    pub fn matches(&self, document: &Map<String, Value>) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    /// JSON object form, used for containment queries and cache keys
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }
}

/// A document as held by the store, with its identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl StoredDocument {
    /// Decode the document fields into a typed record
    pub fn into_record<T: DeserializeOwned>(self) -> Result<Record<T>, StoreError> {
        let data = serde_json::from_value(Value::Object(self.data))?;
        Ok(Record { id: self.id, data })
    }
}

/// Serialize a typed value into a document body
pub fn to_document<T: Serialize>(value: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Repository interface over the document database
///
/// Backends only need to support inserts and equality queries. Queries
/// return documents in insertion order.
pub trait DocumentStore: Send + Sync + 'static {
    /// Short backend name reported by diagnostics
    fn backend_name(&self) -> &'static str;

    /// Insert a document and return its generated identifier
    fn insert(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Fetch every document of a collection matching the filter
    fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send;

    /// Names of the collections holding documents
    fn list_collections(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    fn health_check(&self) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_filter_matches() {
        let filter = Filter::new().eq("subject", "Math").eq("grade", 12);

        assert!(filter.matches(&doc(json!({"subject": "Math", "grade": 12, "extra": true}))));
        assert!(!filter.matches(&doc(json!({"subject": "Math", "grade": 11}))));
        assert!(!filter.matches(&doc(json!({"subject": "Math"}))));
        assert!(Filter::new().matches(&doc(json!({}))));
    }

    #[test]
    fn test_filter_value_is_stable() {
        let a = Filter::new().eq("b", 1).eq("a", 2);
        let b = Filter::new().eq("a", 2).eq("b", 1);
        assert_eq!(a.to_value().to_string(), b.to_value().to_string());
    }

    #[test]
    fn test_to_document_rejects_scalars() {
        assert!(to_document(&json!({"a": 1})).is_ok());
        assert!(matches!(to_document(&42), Err(StoreError::InvalidDocument(_))));
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::LiveSession.as_str(), "live_session");
        assert_eq!(Collection::Class.to_string(), "class");
    }
}
