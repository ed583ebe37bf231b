// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Attendance, AttendanceMethod, AttendanceStatus, Class, Connection, LiveSession, Record,
    Reward, ScheduleEntry, StreamPlatform, Student, Tutor, Vacancy, VacancyStatus,
};
pub use requests::{
    AttendanceQuery, ClassQuery, LiveSessionCreate, LiveSessionQuery, RewardQuery,
    ScheduleRequest, StudentQuery, TutorQuery, VacancyQuery,
};
pub use responses::{
    AttendanceResponse, ConnectionResponse, CreatedResponse, ErrorResponse, HealthResponse,
    ListResponse, LiveSessionResponse, MessageResponse, ScheduleResponse, StoreStatusResponse,
};
