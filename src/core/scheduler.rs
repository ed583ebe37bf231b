use crate::models::ScheduleEntry;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised by the availability matcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Propose a schedule from a tutor's availability and a student's preferences
///
/// Tutor slots are kept in their given order when they appear anywhere in
/// `student_slots`. Duplicated tutor slots produce duplicated entries. The
/// matched slots are paired with `subjects` round-robin.
///
/// # Errors
/// Returns `ScheduleError::InvalidInput` when `subjects` is empty, whatever
/// the other inputs are.
pub fn match_availability(
    tutor_slots: &[String],
    student_slots: &[String],
    subjects: &[String],
) -> Result<Vec<ScheduleEntry>, ScheduleError> {
    if subjects.is_empty() {
        return Err(ScheduleError::InvalidInput(
            "at least one subject is required".to_string(),
        ));
    }

    let preferred: HashSet<&str> = student_slots.iter().map(String::as_str).collect();

    let schedule = tutor_slots
        .iter()
        .filter(|slot| preferred.contains(slot.as_str()))
        .enumerate()
        .map(|(i, slot)| ScheduleEntry {
            slot: slot.clone(),
            subject: subjects[i % subjects.len()].clone(),
        })
        .collect();

    Ok(schedule)
}
