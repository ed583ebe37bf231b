use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use crate::config::AppwriteSettings;
use crate::services::store::{Collection, DocumentStore, Filter, StoreError, StoredDocument};

/// Documents requested per page when listing a collection
const DEFAULT_PAGE_SIZE: usize = 100;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite-backed document store
///
/// Each collection maps to an Appwrite collection with the same ID inside a
/// single Appwrite database.
pub struct AppwriteStore {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    page_size: usize,
    client: Client,
}

impl AppwriteStore {
    /// Create a new Appwrite store
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            page_size: DEFAULT_PAGE_SIZE,
            client,
        })
    }

    /// Override how many documents are fetched per request
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn from_settings(settings: &AppwriteSettings) -> Result<Self, AppwriteError> {
        Self::new(
            settings.endpoint.clone(),
            settings.api_key.clone(),
            settings.project_id.clone(),
            settings.database_id.clone(),
        )
    }

    fn documents_url(&self, collection: Collection) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    /// Create a document and return its ID
    pub async fn create_document(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> Result<String, AppwriteError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let payload = json!({
            "documentId": id,
            "data": document,
        });

        let response = self
            .authorized(self.client.post(self.documents_url(collection)))
            .json(&payload)
            .send()
            .await?;

        let json = check_status(response, "create document").await?.json::<Value>().await?;

        let created_id = json
            .get("$id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or(id);

        tracing::debug!("Created document {} in {}", created_id, collection);

        Ok(created_id)
    }

    /// List documents of a collection matching the filter
    ///
    /// Follows `cursorAfter` until every matching document has been read.
    /// The filter is applied again on the parsed documents so results agree
    /// with the other backends.
    pub async fn list_documents(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, AppwriteError> {
        let url = self.documents_url(collection);
        let constraints = build_queries(filter);
        let mut stored: Vec<StoredDocument> = Vec::new();

        loop {
            let cursor = stored.last().map(|doc| doc.id.as_str());
            let page_url = format!(
                "{}?{}",
                url,
                encode_queries(&page_queries(&constraints, self.page_size, cursor))
            );

            tracing::debug!("Querying documents from: {}", page_url);

            let response = self.authorized(self.client.get(&page_url)).send().await?;
            let json: Value = check_status(response, "query documents").await?.json().await?;

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;
            let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

            let page = documents
                .iter()
                .map(parse_document)
                .collect::<Result<Vec<_>, _>>()?;
            let page_len = page.len();
            stored.extend(page);

            if page_len < self.page_size || stored.len() as u64 >= total {
                break;
            }
        }

        let fetched = stored.len();
        stored.retain(|doc| filter.matches(&doc.data));
        tracing::debug!(
            "Queried {} documents from {} ({} kept by filter)",
            fetched,
            collection,
            stored.len()
        );

        Ok(stored)
    }

    pub async fn collection_ids(&self) -> Result<Vec<String>, AppwriteError> {
        let url = format!(
            "{}/databases/{}/collections",
            self.base_url.trim_end_matches('/'),
            self.database_id
        );

        let response = self.authorized(self.client.get(&url)).send().await?;
        let json: Value = check_status(response, "list collections").await?.json().await?;

        let collections = json
            .get("collections")
            .and_then(|c| c.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing collections array".into()))?;

        Ok(collections
            .iter()
            .filter_map(|c| c.get("$id").and_then(|id| id.as_str()))
            .map(str::to_string)
            .collect())
    }

    pub async fn ping(&self) -> Result<bool, AppwriteError> {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));
        let response = self.authorized(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }
}

impl DocumentStore for AppwriteStore {
    fn backend_name(&self) -> &'static str {
        "appwrite"
    }

    async fn insert(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> Result<String, StoreError> {
        Ok(self.create_document(collection, document).await?)
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        Ok(self.list_documents(collection, filter).await?)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collection_ids().await?)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(self.ping().await?)
    }
}

async fn check_status(response: Response, action: &str) -> Result<Response, AppwriteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(AppwriteError::Unauthorized);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read body".to_string());
    tracing::error!("Appwrite failed to {}: {} - {}", action, status, body);
    Err(AppwriteError::ApiError(format!("Failed to {}: {}", action, status)))
}

/// Translate a filter into Appwrite `equal` queries
fn build_queries(filter: &Filter) -> Vec<String> {
    filter
        .iter()
        .map(|(field, value)| {
            json!({"method": "equal", "attribute": field, "values": [value]}).to_string()
        })
        .collect()
}

/// Filter constraints plus the paging queries for one request
fn page_queries(constraints: &[String], page_size: usize, cursor: Option<&str>) -> Vec<String> {
    let mut queries = constraints.to_vec();
    queries.push(json!({"method": "limit", "values": [page_size]}).to_string());
    if let Some(id) = cursor {
        queries.push(json!({"method": "cursorAfter", "values": [id]}).to_string());
    }
    queries
}

/// Encode queries as repeated `queries[]` parameters
fn encode_queries(queries: &[String]) -> String {
    queries
        .iter()
        .map(|query| format!("queries%5B%5D={}", urlencoding::encode(query)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Extract a stored document, dropping Appwrite's `$` metadata
fn parse_document(doc: &Value) -> Result<StoredDocument, AppwriteError> {
    let id = doc
        .get("$id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppwriteError::InvalidResponse("Document without $id".into()))?
        .to_string();

    let fields = doc
        .get("data")
        .and_then(|d| d.as_object())
        .or_else(|| doc.as_object())
        .ok_or_else(|| AppwriteError::InvalidResponse(format!("Document {} is not an object", id)))?;

    let data = fields
        .iter()
        .filter(|(key, _)| !key.starts_with('$') && key.as_str() != "_id")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(StoredDocument { id, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appwrite_store_creation() {
        let store = AppwriteStore::new(
            "https://appwrite.test/v1/".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
        )
        .unwrap();

        assert_eq!(store.api_key, "test_key");
        assert_eq!(
            store.documents_url(Collection::Vacancy),
            "https://appwrite.test/v1/databases/test_db/collections/vacancy/documents"
        );
    }

    #[test]
    fn test_build_queries() {
        let filter = Filter::new().eq("grade", 12).eq("subject", "Math");
        let queries: Vec<Value> = build_queries(&filter)
            .iter()
            .map(|q| serde_json::from_str(q).unwrap())
            .collect();

        assert_eq!(
            queries,
            vec![
                json!({"method": "equal", "attribute": "grade", "values": [12]}),
                json!({"method": "equal", "attribute": "subject", "values": ["Math"]}),
            ]
        );
    }

    #[test]
    fn test_page_queries_add_limit_and_cursor() {
        let first = page_queries(&[], 25, None);
        assert_eq!(first.len(), 1);
        assert_eq!(
            serde_json::from_str::<Value>(&first[0]).unwrap(),
            json!({"method": "limit", "values": [25]})
        );

        let next = page_queries(&["x".to_string()], 25, Some("doc9"));
        assert_eq!(next.len(), 3);
        assert_eq!(next[0], "x");
        assert_eq!(
            serde_json::from_str::<Value>(&next[2]).unwrap(),
            json!({"method": "cursorAfter", "values": ["doc9"]})
        );
    }

    #[test]
    fn test_encode_queries_repeats_parameter() {
        let encoded = encode_queries(&["a b".to_string(), "{\"c\":1}".to_string()]);
        assert_eq!(encoded, "queries%5B%5D=a%20b&queries%5B%5D=%7B%22c%22%3A1%7D");
    }

    #[test]
    fn test_parse_document_strips_metadata() {
        let doc = json!({
            "$id": "doc1",
            "$createdAt": "2025-01-01T00:00:00Z",
            "$collectionId": "vacancy",
            "subject": "Math",
            "grade": 11
        });

        let parsed = parse_document(&doc).unwrap();
        assert_eq!(parsed.id, "doc1");
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data["subject"], json!("Math"));
    }

    #[test]
    fn test_parse_document_without_id() {
        assert!(parse_document(&json!({"subject": "Math"})).is_err());
    }
}
