use actix_web::{web, HttpResponse, Responder};
use crate::models::{HealthResponse, MessageResponse, StoreStatusResponse};
use crate::routes::AppState;
use crate::services::DocumentStore;

/// Number of collection names reported by the diagnostics endpoint
const MAX_LISTED_COLLECTIONS: usize = 10;

pub fn configure<S: DocumentStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/hello", web::get().to(hello))
        .route("/health", web::get().to(health_check::<S>));
}

pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse {
        message: "KK360 backend running".to_string(),
    })
}

async fn hello() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse {
        message: "Hello from KK360 API".to_string(),
    })
}

/// Health check endpoint
async fn health_check<S: DocumentStore>(state: web::Data<AppState<S>>) -> impl Responder {
    let healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Document store diagnostics
///
/// GET /test
///
/// Always answers 200; store failures are reported in the body.
pub async fn store_status<S: DocumentStore>(state: web::Data<AppState<S>>) -> impl Responder {
    let (database, connection_status, collections) = match state.store.list_collections().await {
        Ok(mut names) => {
            names.truncate(MAX_LISTED_COLLECTIONS);
            ("connected".to_string(), "Connected", names)
        }
        Err(e) => {
            tracing::warn!("Store diagnostics failed: {}", e);
            let detail: String = e.to_string().chars().take(80).collect();
            (format!("error: {}", detail), "Not Connected", vec![])
        }
    };

    let info = &state.store_info;

    HttpResponse::Ok().json(StoreStatusResponse {
        backend: "running".to_string(),
        database,
        connection_status: connection_status.to_string(),
        store_backend: state.store.backend_name().to_string(),
        database_url: if info.database_url_configured { "set" } else { "not set" }.to_string(),
        database_name: info
            .database_name
            .clone()
            .unwrap_or_else(|| "not set".to_string()),
        collections,
    })
}
