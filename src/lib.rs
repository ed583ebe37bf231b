//! KK360 API - Tutoring platform backend
//!
//! This library provides the HTTP surface of the KK360 tutoring platform:
//! CRUD endpoints over a document store for tutors, students, classes,
//! vacancies, attendance, live sessions and rewards, plus the availability
//! matcher that proposes a lesson schedule.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{live_url, match_availability, LiveLinks, ScheduleError};
pub use models::{ScheduleEntry, ScheduleRequest, ScheduleResponse};
pub use services::{Collection, DocumentStore, Filter, MemoryStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let schedule = match_availability(
            &["Mon-10:00".to_string()],
            &["Mon-10:00".to_string()],
            &["Math".to_string()],
        )
        .unwrap();
        assert_eq!(schedule, vec![ScheduleEntry::new("Mon-10:00", "Math")]);
    }
}
