use chrono::NaiveDate;
use tempfile::tempdir;
use wellnest::core::error::WellnestError;
use wellnest::core::store::Store;
use wellnest::subsystems::activity::{
    ActivityEntry, MAX_CALORIES, MAX_STEPS, all, append, reset, summary,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn entry(d: &str, steps: i64, calories: i64, sleep_hours: f64) -> ActivityEntry {
    ActivityEntry {
        date: date(d),
        steps,
        calories,
        sleep_hours,
    }
}

#[test]
fn test_append_and_read_back() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    append(&store, "a@x.com", &entry("2024-03-01", 8000, 2100, 7.5)).unwrap();
    append(&store, "a@x.com", &entry("2024-03-02", 9000, 2200, 8.0)).unwrap();

    let mut entries = all(&store, "a@x.com").unwrap();
    entries.sort_by_key(|e| e.date);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].steps, 8000);
    assert_eq!(entries[1].sleep_hours, 8.0);
}

#[test]
fn test_duplicate_date_rejected() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    append(&store, "a@x.com", &entry("2024-03-01", 8000, 2100, 7.5)).unwrap();
    match append(&store, "a@x.com", &entry("2024-03-01", 1, 1, 1.0)) {
        Err(WellnestError::DuplicateDate(d)) => assert_eq!(d, "2024-03-01"),
        other => panic!("expected DuplicateDate, got {:?}", other),
    }
    // a different date is fine
    append(&store, "a@x.com", &entry("2024-03-02", 1, 1, 1.0)).unwrap();
}

#[test]
fn test_ledgers_are_per_user() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    append(&store, "a@x.com", &entry("2024-03-01", 8000, 2100, 7.5)).unwrap();
    // same date, different user: not a duplicate
    append(&store, "b@x.com", &entry("2024-03-01", 100, 100, 1.0)).unwrap();

    assert_eq!(all(&store, "a@x.com").unwrap().len(), 1);
    assert_eq!(all(&store, "b@x.com").unwrap().len(), 1);
}

#[test]
fn test_validation_boundaries_inclusive() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    append(&store, "a@x.com", &entry("2024-03-01", 0, 0, 0.0)).unwrap();
    append(
        &store,
        "a@x.com",
        &entry("2024-03-02", MAX_STEPS, MAX_CALORIES, 24.0),
    )
    .unwrap();
}

#[test]
fn test_validation_names_the_field() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    match append(&store, "a@x.com", &entry("2024-03-01", -1, 2000, 7.0)) {
        Err(WellnestError::ValidationFailed(reasons)) => {
            assert_eq!(reasons.len(), 1);
            assert!(reasons[0].contains("Steps"));
        }
        other => panic!("expected ValidationFailed, got {:?}", other),
    }

    match append(
        &store,
        "a@x.com",
        &entry("2024-03-01", MAX_STEPS + 1, 2000, 7.0),
    ) {
        Err(WellnestError::ValidationFailed(reasons)) => {
            assert!(reasons[0].contains("Steps"));
        }
        other => panic!("expected ValidationFailed, got {:?}", other),
    }

    // nothing was written
    assert!(all(&store, "a@x.com").unwrap().is_empty());
}

#[test]
fn test_reset_clears_only_that_user() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    append(&store, "a@x.com", &entry("2024-03-01", 8000, 2100, 7.5)).unwrap();
    append(&store, "b@x.com", &entry("2024-03-01", 100, 100, 1.0)).unwrap();

    reset(&store, "a@x.com").unwrap();

    assert!(all(&store, "a@x.com").unwrap().is_empty());
    assert_eq!(all(&store, "b@x.com").unwrap().len(), 1);

    // reset of an already-empty ledger succeeds
    reset(&store, "a@x.com").unwrap();

    // and the date is loggable again after reset
    append(&store, "a@x.com", &entry("2024-03-01", 1, 1, 1.0)).unwrap();
}

#[test]
fn test_summary_averages() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    let empty = summary(&store, "a@x.com").unwrap();
    assert_eq!(empty.entries, 0);

    append(&store, "a@x.com", &entry("2024-03-01", 8000, 2000, 7.0)).unwrap();
    append(&store, "a@x.com", &entry("2024-03-02", 10000, 2400, 8.0)).unwrap();

    let s = summary(&store, "a@x.com").unwrap();
    assert_eq!(s.entries, 2);
    assert_eq!(s.avg_steps, 9000.0);
    assert_eq!(s.avg_calories, 2200.0);
    assert!((s.avg_sleep_hours - 7.5).abs() < 1e-9);
}
