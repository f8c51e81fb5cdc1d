
use super::*;
use crate::scheduler::types::Action;
use chrono::TimeZone;
use std::sync::Mutex;

fn noop_action() -> Action {
    Arc::new(|_token| Box::pin(async {}))
}

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn fixed_schedule(at: DateTime<Local>) -> Schedule {
    Schedule::new("test", Trigger::time(move || at), noop_action())
}

#[test]
fn test_comparator_less_than() {
    let reference = local(2025, 3, 20, 12, 0);
    assert!(Comparator::LessThan.check(local(2025, 3, 19, 12, 0), reference));
    assert!(!Comparator::LessThan.check(local(2025, 3, 21, 12, 0), reference));
    assert!(!Comparator::LessThan.check(reference, reference));
}

#[test]
fn test_comparator_greater_than() {
    let reference = local(2025, 3, 20, 12, 0);
    assert!(Comparator::GreaterThan.check(local(2025, 3, 21, 12, 0), reference));
    assert!(!Comparator::GreaterThan.check(local(2025, 3, 19, 12, 0), reference));
    assert!(!Comparator::GreaterThan.check(reference, reference));
}

#[test]
fn test_comparator_equal_ignores_time_of_day() {
    let reference = local(2025, 3, 20, 8, 0);
    assert!(Comparator::Equal.check(local(2025, 3, 20, 0, 0), reference));
    assert!(Comparator::Equal.check(local(2025, 3, 20, 23, 59), reference));
    assert!(!Comparator::Equal.check(local(2025, 3, 21, 0, 0), reference));
    assert!(!Comparator::Equal.check(local(2026, 3, 20, 8, 0), reference));
}

#[test]
fn test_comparator_unknown_passes() {
    let reference = local(2025, 3, 20, 8, 0);
    assert!(Comparator::Unknown.check(local(2025, 1, 1, 0, 0), reference));
}

#[test]
fn test_should_fire_threshold() {
    let schedule = fixed_schedule(local(2025, 3, 20, 18, 30));

    assert!(!schedule.should_fire(local(2025, 3, 20, 18, 0)));
    assert!(!schedule.should_fire(local(2025, 3, 20, 18, 29)));
    assert!(schedule.should_fire(local(2025, 3, 20, 18, 30)));
    assert!(schedule.should_fire(local(2025, 3, 20, 18, 50)));
    assert!(schedule.should_fire(local(2025, 3, 20, 19, 5)));
}

#[test]
fn test_should_fire_ignores_seconds() {
    let target = Local.with_ymd_and_hms(2025, 3, 20, 18, 30, 59).unwrap();
    let schedule = fixed_schedule(target);

    let now = Local.with_ymd_and_hms(2025, 3, 20, 18, 30, 0).unwrap();
    assert!(schedule.should_fire(now));
}

#[test]
fn test_should_fire_locked_out_after_firing() {
    let schedule = fixed_schedule(local(2025, 3, 20, 18, 30));
    schedule.mark_triggered(local(2025, 3, 20, 18, 30));

    assert!(!schedule.should_fire(local(2025, 3, 20, 19, 0)));
    assert!(!schedule.should_fire(local(2025, 3, 20, 23, 59)));
    // New calendar day clears the lockout.
    assert!(schedule.should_fire(local(2025, 3, 21, 18, 30)));
}

#[test]
fn test_trigger_time_recomputed_each_evaluation() {
    let target = Arc::new(Mutex::new(local(2025, 3, 20, 23, 59)));
    let shared = target.clone();
    let schedule = Schedule::new(
        "moving target",
        Trigger::time(move || *shared.lock().unwrap()),
        noop_action(),
    );

    let noon = local(2025, 3, 20, 12, 0);
    assert!(!schedule.should_fire(noon));

    *target.lock().unwrap() = local(2025, 3, 20, 10, 0);
    assert!(schedule.should_fire(noon));
}

#[test]
fn test_filters_pass_empty() {
    let schedule = fixed_schedule(local(2025, 3, 20, 0, 0));
    assert!(schedule.filters_pass(local(2025, 3, 20, 12, 0)));
}

#[test]
fn test_filters_and_logic() {
    let now = local(2025, 3, 20, 12, 0);
    let passing = Filter::date(local(2025, 1, 1, 0, 0), Comparator::GreaterThan);
    let failing = Filter::date(local(2025, 1, 1, 0, 0), Comparator::LessThan);

    let both_pass = fixed_schedule(local(2025, 3, 20, 0, 0))
        .with_filter(passing.clone())
        .with_filter(Filter::date(now, Comparator::Equal));
    assert!(both_pass.filters_pass(now));

    let one_fails = fixed_schedule(local(2025, 3, 20, 0, 0))
        .with_filter(passing)
        .with_filter(failing);
    assert!(!one_fails.filters_pass(now));
}

#[test]
fn test_filters_or_logic() {
    let now = local(2025, 3, 20, 12, 0);
    let passing = Filter::date(local(2025, 1, 1, 0, 0), Comparator::GreaterThan);
    let failing = Filter::date(local(2025, 1, 1, 0, 0), Comparator::LessThan);

    let one_passes = fixed_schedule(local(2025, 3, 20, 0, 0))
        .with_filter_logic(FilterLogic::Or)
        .with_filter(failing.clone())
        .with_filter(passing);
    assert!(one_passes.filters_pass(now));

    let none_pass = fixed_schedule(local(2025, 3, 20, 0, 0))
        .with_filter_logic(FilterLogic::Or)
        .with_filter(failing.clone())
        .with_filter(failing);
    assert!(!none_pass.filters_pass(now));
}

#[test]
fn test_filter_serde_roundtrip() {
    let filter = Filter::date(local(2025, 3, 20, 8, 0), Comparator::Equal);
    let json = serde_json::to_string(&filter).unwrap();
    assert!(json.contains("\"type\":\"date\""));
    assert!(json.contains("\"comparator\":\"equal\""));

    let deserialized: Filter = serde_json::from_str(&json).unwrap();
    let Filter::Date(date_filter) = deserialized;
    assert_eq!(date_filter.comparator, Comparator::Equal);
    assert_eq!(date_filter.date, local(2025, 3, 20, 8, 0));
}

#[test]
fn test_unrecognized_comparator_deserializes_as_unknown() {
    let json = r#"{"type":"date","date":"2025-03-20T08:00:00+02:00","comparator":"between"}"#;
    let filter: Filter = serde_json::from_str(json).unwrap();
    let Filter::Date(date_filter) = filter;
    assert_eq!(date_filter.comparator, Comparator::Unknown);
}
