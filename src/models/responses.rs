use serde::{Deserialize, Serialize};
use crate::models::domain::ScheduleEntry;

/// Response for the schedule endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub schedule: Vec<ScheduleEntry>,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Document store diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatusResponse {
    pub backend: String,
    pub database: String,
    pub connection_status: String,
    pub store_backend: String,
    pub database_url: String,
    pub database_name: String,
    pub collections: Vec<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Generic creation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub status: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub status: String,
    pub connection_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub status: String,
    pub attendance_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSessionResponse {
    pub status: String,
    pub id: String,
    pub live_url: String,
}

/// Listing of stored documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}
