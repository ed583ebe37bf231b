use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::{match_availability, ScheduleError};
use crate::models::{ScheduleRequest, ScheduleResponse};
use crate::routes::{bad_request, validation_failed};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ai-schedule", web::post().to(ai_schedule));
}

/// Propose a schedule from tutor availability and student preferences
///
/// POST /api/ai-schedule
///
/// Request body:
/// ```json
/// {
///   "tutor_availability": ["Mon-10:00", "Tue-11:00"],
///   "student_preferences": ["Tue-11:00"],
///   "subjects": ["Math"]
/// }
/// ```
async fn ai_schedule(req: web::Json<ScheduleRequest>) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    propose_schedule(&req)
}

/// Run the matcher on a request. Also reached by callers that skip
/// validation, so the matcher's own input check still maps to a 400.
fn propose_schedule(req: &ScheduleRequest) -> HttpResponse {
    match match_availability(&req.tutor_availability, &req.student_preferences, &req.subjects) {
        Ok(schedule) => {
            tracing::debug!(
                "Proposed {} lessons from {} tutor slots",
                schedule.len(),
                req.tutor_availability.len()
            );
            HttpResponse::Ok().json(ScheduleResponse { schedule })
        }
        Err(ScheduleError::InvalidInput(message)) => bad_request("invalid_input", message),
    }
}
