use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use crate::config::DatabaseSettings;
use crate::services::store::{Collection, DocumentStore, Filter, StoreError, StoredDocument};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL-backed document store
///
/// Every collection shares one `documents` table. Document bodies are kept
/// as JSONB and filters are evaluated with JSONB containment, so a filter
/// on a scalar field behaves as plain equality.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }

    pub async fn insert_document(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> Result<String, PostgresError> {
        let id = uuid::Uuid::new_v4().to_string();

        let query = r#"
            INSERT INTO documents (id, collection, data, created_at)
            VALUES ($1, $2, $3, NOW())
        "#;

        sqlx::query(query)
            .bind(&id)
            .bind(collection.as_str())
            .bind(Json(Value::Object(document)))
            .execute(&self.pool)
            .await?;

        tracing::debug!("Inserted document {} into {}", id, collection);

        Ok(id)
    }

    pub async fn find_documents(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, PostgresError> {
        let query = r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND data @> $2
            ORDER BY seq
        "#;

        let rows = sqlx::query(query)
            .bind(collection.as_str())
            .bind(Json(filter.to_value()))
            .fetch_all(&self.pool)
            .await?;

        let documents = rows
            .iter()
            .map(|row| {
                let Json(data): Json<Map<String, Value>> = row.try_get("data")?;
                Ok(StoredDocument {
                    id: row.try_get("id")?,
                    data,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!("Found {} documents in {}", documents.len(), collection);

        Ok(documents)
    }

    pub async fn collection_names(&self) -> Result<Vec<String>, PostgresError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT collection FROM documents ORDER BY collection",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Health check for the database connection
    pub async fn ping(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

impl DocumentStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> Result<String, StoreError> {
        Ok(self.insert_document(collection, document).await?)
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        Ok(self.find_documents(collection, filter).await?)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collection_names().await?)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(self.ping().await?)
    }
}
