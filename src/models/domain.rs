use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tutor profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Tutor {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Subjects the tutor can teach
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Available time slots, e.g. `Mon-10:00`
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub institution_id: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Student enrolled in grade 11 or 12
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Student {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 11, max = 12))]
    pub grade: u8,
    #[validate(length(min = 1))]
    pub student_id: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[validate(email)]
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Linked tutor, if any
    #[serde(default)]
    pub tutor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Class {
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(range(min = 11, max = 12))]
    pub grade: u8,
    #[validate(length(min = 1))]
    pub tutor_id: String,
    #[serde(default)]
    pub student_ids: Vec<String>,
    #[serde(default)]
    pub schedule: Vec<String>,
}

/// Teaching vacancy posted by an institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Vacancy {
    #[validate(length(min = 1))]
    pub institution_id: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(range(min = 11, max = 12))]
    pub grade: u8,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: VacancyStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacancyStatus {
    #[default]
    Open,
    Closed,
}

impl VacancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::Open => "open",
            VacancyStatus::Closed => "closed",
        }
    }
}

/// Attendance mark for one student in one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Attendance {
    #[validate(length(min = 1))]
    pub class_id: String,
    #[validate(length(min = 1))]
    pub student_id: String,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub method: Option<AttendanceMethod>,
    /// QR token used, if any
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMethod {
    Qr,
    Face,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Reward {
    #[validate(length(min = 1))]
    pub student_id: String,
    pub points: u32,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Live session as stored, including its generated link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSession {
    pub class_id: String,
    pub tutor_id: String,
    pub topic: String,
    pub platform: StreamPlatform,
    pub live_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamPlatform {
    #[default]
    Yt,
    Webrtc,
}

/// Student to tutor link, kept as an audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Connection {
    #[validate(length(min = 1))]
    pub student_id: String,
    #[validate(length(min = 1))]
    pub tutor_id: String,
}

/// One proposed lesson: a time slot paired with a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub slot: String,
    pub subject: String,
}

impl ScheduleEntry {
    pub fn new(slot: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            subject: subject.into(),
        }
    }
}

/// A stored document with its identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_grade_range() {
        let mut student = Student {
            name: "Asha".to_string(),
            grade: 11,
            student_id: "S-1".to_string(),
            subjects: vec![],
            contact_email: None,
            tutor_id: None,
        };
        assert!(student.validate().is_ok());

        student.grade = 10;
        assert!(student.validate().is_err());

        student.grade = 13;
        assert!(student.validate().is_err());
    }

    #[test]
    fn test_tutor_rating_and_email() {
        let mut tutor: Tutor = serde_json::from_value(json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "rating": 4.5
        }))
        .unwrap();
        assert!(tutor.validate().is_ok());
        assert!(tutor.subjects.is_empty());

        tutor.rating = Some(5.5);
        assert!(tutor.validate().is_err());

        tutor.rating = None;
        tutor.email = "not-an-email".to_string();
        assert!(tutor.validate().is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let vacancy: Vacancy = serde_json::from_value(json!({
            "institution_id": "inst-1",
            "subject": "Physics",
            "grade": 12
        }))
        .unwrap();
        assert_eq!(vacancy.status, VacancyStatus::Open);

        let attendance: Attendance = serde_json::from_value(json!({
            "class_id": "c1",
            "student_id": "s1"
        }))
        .unwrap();
        assert_eq!(attendance.status, AttendanceStatus::Present);
        assert_eq!(attendance.method, None);
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let result: Result<Attendance, _> = serde_json::from_value(json!({
            "class_id": "c1",
            "student_id": "s1",
            "status": "sleeping"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_flattens_fields() {
        let record: Record<Connection> = serde_json::from_value(json!({
            "_id": "abc",
            "student_id": "s1",
            "tutor_id": "t1"
        }))
        .unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.data.tutor_id, "t1");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_id"], "abc");
        assert_eq!(value["student_id"], "s1");
    }
}
