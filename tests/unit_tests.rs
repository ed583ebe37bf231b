// Unit tests for KK360 API

use kk360_api::core::{live_url, match_availability, LiveLinks, ScheduleError};
use kk360_api::models::{ScheduleEntry, StreamPlatform};
use kk360_api::services::Filter;
use serde_json::{json, Map, Value};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_scenario_single_match() {
    let schedule = match_availability(
        &strings(&["Mon-10:00", "Tue-11:00"]),
        &strings(&["Tue-11:00"]),
        &strings(&["Math"]),
    )
    .unwrap();

    assert_eq!(schedule, vec![ScheduleEntry::new("Tue-11:00", "Math")]);
}

#[test]
fn test_scenario_round_robin_subjects() {
    let schedule = match_availability(
        &strings(&["Mon-10:00", "Tue-11:00", "Wed-09:00"]),
        &strings(&["Mon-10:00", "Wed-09:00"]),
        &strings(&["Math", "Physics"]),
    )
    .unwrap();

    assert_eq!(
        schedule,
        vec![
            ScheduleEntry::new("Mon-10:00", "Math"),
            ScheduleEntry::new("Wed-09:00", "Physics"),
        ]
    );
}

#[test]
fn test_scenario_no_tutor_slots() {
    let schedule = match_availability(&[], &strings(&["Mon-10:00"]), &strings(&["Math"])).unwrap();
    assert!(schedule.is_empty());
}

#[test]
fn test_scenario_empty_subjects() {
    let result = match_availability(
        &strings(&["Mon-10:00"]),
        &strings(&["Mon-10:00"]),
        &[],
    );

    assert!(matches!(result, Err(ScheduleError::InvalidInput(_))));
}

#[test]
fn test_scenario_duplicate_slot() {
    let schedule = match_availability(
        &strings(&["Mon-10:00", "Mon-10:00"]),
        &strings(&["Mon-10:00"]),
        &strings(&["Math", "Bio"]),
    )
    .unwrap();

    assert_eq!(
        schedule,
        vec![
            ScheduleEntry::new("Mon-10:00", "Math"),
            ScheduleEntry::new("Mon-10:00", "Bio"),
        ]
    );
}

#[test]
fn test_length_counts_tutor_slots_with_multiplicity() {
    let days = ["Mon", "Tue", "Wed", "Thu", "Fri"];
    let tutor: Vec<String> = (0..40)
        .map(|i| format!("{}-{:02}:00", days[i % days.len()], 8 + i % 7))
        .collect();
    let student: Vec<String> = (0..20)
        .map(|i| format!("{}-{:02}:00", days[(i * 2) % days.len()], 8 + i % 5))
        .collect();
    let subjects = strings(&["Math", "Physics", "Chemistry"]);

    let schedule = match_availability(&tutor, &student, &subjects).unwrap();

    let expected = tutor.iter().filter(|slot| student.contains(slot)).count();
    assert_eq!(schedule.len(), expected);

    // Order follows the tutor's slots
    let matched: Vec<&String> = tutor.iter().filter(|slot| student.contains(slot)).collect();
    for (entry, slot) in schedule.iter().zip(matched) {
        assert_eq!(&entry.slot, slot);
    }

    // Subjects cycle in order
    for (i, entry) in schedule.iter().enumerate() {
        assert_eq!(entry.subject, subjects[i % subjects.len()]);
    }
}

#[test]
fn test_student_order_is_irrelevant() {
    let tutor = strings(&["Mon-10:00", "Tue-11:00", "Wed-09:00"]);
    let subjects = strings(&["Math"]);

    let a = match_availability(&tutor, &strings(&["Wed-09:00", "Mon-10:00"]), &subjects).unwrap();
    let b = match_availability(&tutor, &strings(&["Mon-10:00", "Wed-09:00", "Mon-10:00"]), &subjects).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_matching_is_idempotent() {
    let tutor = strings(&["Mon-10:00", "Tue-11:00", "Fri-15:00"]);
    let student = strings(&["Fri-15:00", "Tue-11:00"]);
    let subjects = strings(&["Math", "Bio"]);

    let first = match_availability(&tutor, &student, &subjects).unwrap();
    let second = match_availability(&tutor, &student, &subjects).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_slots_compared_exactly() {
    let schedule = match_availability(
        &strings(&["Mon-10:00", "mon-10:00", "Mon-10:00 "]),
        &strings(&["Mon-10:00"]),
        &strings(&["Math"]),
    )
    .unwrap();

    assert_eq!(schedule.len(), 1);
}

#[test]
fn test_live_links() {
    let links = LiveLinks::default();

    assert_eq!(
        live_url(StreamPlatform::Yt, &links, "class-7", "tutor-3"),
        "https://youtube.com/live/class-7-tutor-3"
    );
    assert_eq!(
        live_url(StreamPlatform::Webrtc, &links, "class-7", "tutor-3"),
        "https://webrtc.example/room/class-7-tutor-3"
    );
}

#[test]
fn test_filter_equality_semantics() {
    let mut doc = Map::new();
    doc.insert("grade".to_string(), json!(12));
    doc.insert("subjects".to_string(), json!(["Math"]));

    assert!(Filter::new().eq("grade", 12).matches(&doc));
    assert!(!Filter::new().eq("grade", "12").matches(&doc));
    // Array fields are not searched element-wise
    assert!(!Filter::new().eq("subjects", "Math").matches(&doc));
    assert!(Filter::new().eq("subjects", Value::from(vec!["Math"])).matches(&doc));
}
