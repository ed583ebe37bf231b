// Core algorithm exports
pub mod live;
pub mod scheduler;

pub use live::{live_url, LiveLinks};
pub use scheduler::{match_availability, ScheduleError};
