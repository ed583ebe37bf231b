use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{AttendanceStatus, StreamPlatform, VacancyStatus};
use crate::services::Filter;

/// Request to propose a schedule
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleRequest {
    pub tutor_availability: Vec<String>,
    pub student_preferences: Vec<String>,
    #[validate(length(min = 1, message = "at least one subject is required"))]
    pub subjects: Vec<String>,
}

/// Request to start a live session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LiveSessionCreate {
    #[validate(length(min = 1))]
    pub class_id: String,
    #[validate(length(min = 1))]
    pub tutor_id: String,
    #[validate(length(min = 1))]
    pub topic: String,
    #[serde(default)]
    pub platform: StreamPlatform,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TutorQuery {
    pub institution_id: Option<String>,
}

impl TutorQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::new().eq_opt("institution_id", self.institution_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
    pub grade: Option<u8>,
    pub tutor_id: Option<String>,
}

impl StudentQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("grade", self.grade)
            .eq_opt("tutor_id", self.tutor_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassQuery {
    pub tutor_id: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<u8>,
}

impl ClassQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("tutor_id", self.tutor_id.as_deref())
            .eq_opt("subject", self.subject.as_deref())
            .eq_opt("grade", self.grade)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyQuery {
    pub institution_id: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<u8>,
    pub status: Option<VacancyStatus>,
}

impl VacancyQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("institution_id", self.institution_id.as_deref())
            .eq_opt("subject", self.subject.as_deref())
            .eq_opt("grade", self.grade)
            .eq_opt("status", self.status.map(|s| s.as_str()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
    pub class_id: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("class_id", self.class_id.as_deref())
            .eq_opt("student_id", self.student_id.as_deref())
            .eq_opt("status", self.status.map(|s| s.as_str()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveSessionQuery {
    pub class_id: Option<String>,
    pub tutor_id: Option<String>,
}

impl LiveSessionQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("class_id", self.class_id.as_deref())
            .eq_opt("tutor_id", self.tutor_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewardQuery {
    pub student_id: Option<String>,
}

impl RewardQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::new().eq_opt("student_id", self.student_id.as_deref())
    }
}
