// Route exports
pub mod records;
pub mod schedule;
pub mod system;

use actix_web::{error, http::StatusCode, web, HttpResponse};
use std::sync::Arc;
use crate::core::LiveLinks;
use crate::models::ErrorResponse;
use crate::services::{DocumentStore, StoreError};

/// Application state shared across all handlers
pub struct AppState<S> {
    pub store: Arc<S>,
    pub live_links: LiveLinks,
    pub store_info: StoreInfo,
}

// Manual impl so `S` itself does not need to be `Clone`
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            live_links: self.live_links.clone(),
            store_info: self.store_info.clone(),
        }
    }
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(store: S, live_links: LiveLinks, store_info: StoreInfo) -> Self {
        Self {
            store: Arc::new(store),
            live_links,
            store_info,
        }
    }
}

/// Connection details reported by the diagnostics endpoint
#[derive(Debug, Clone, Default)]
pub struct StoreInfo {
    pub database_url_configured: bool,
    pub database_name: Option<String>,
}

pub fn configure_routes<S: DocumentStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(system::root))
        .route("/test", web::get().to(system::store_status::<S>))
        .service(
            web::scope("/api")
                .configure(system::configure::<S>)
                .configure(records::configure::<S>)
                .configure(schedule::configure),
        );
}

/// Rejection raised by the body and query extractors before a handler runs
///
/// Serializes with the same shape as [`ErrorResponse`] so clients see one
/// error format across the API.
#[derive(Debug)]
pub struct RequestRejection {
    kind: &'static str,
    body: ErrorResponse,
}

impl RequestRejection {
    fn bad_request(kind: &'static str, message: String) -> Self {
        Self {
            kind,
            body: ErrorResponse {
                error: kind.to_string(),
                message,
                status_code: StatusCode::BAD_REQUEST.as_u16(),
            },
        }
    }
}

impl std::fmt::Display for RequestRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.body.message)
    }
}

impl std::error::Error for RequestRejection {}

impl error::ResponseError for RequestRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(&self.body)
    }
}

/// Body that is not JSON or does not fit the endpoint's record type
pub fn reject_body(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected body for {} {}: {}", req.method(), req.path(), err);
    RequestRejection::bad_request(
        "invalid_json",
        format!("Request body for {} is not a valid record: {}", req.path(), err),
    )
    .into()
}

/// Query string filters that do not parse, e.g. a non-numeric grade
pub fn reject_query(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected filters for {}: {}", req.path(), err);
    RequestRejection::bad_request(
        "invalid_query",
        format!("Unsupported filter for {}: {}", req.path(), err),
    )
    .into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(reject_body)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(reject_query)
}

pub(crate) fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

pub(crate) fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {}", errors);
    bad_request("Validation failed", errors.to_string())
}

pub(crate) fn store_failure(action: &str, err: StoreError) -> HttpResponse {
    tracing::error!("Failed to {}: {}", action, err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: format!("Failed to {}", action),
        message: err.to_string(),
        status_code: 500,
    })
}
