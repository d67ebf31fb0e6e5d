use aivan_config::ChatMode;
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use super::*;

fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

fn assistant(premium: bool, daily_limit: u32) -> AssistantConfig {
    AssistantConfig {
        model: "gemini-2.5-flash".to_owned(),
        mode: ChatMode::Creator,
        premium,
        daily_limit,
        researcher_alias: "researcher-designer".to_owned(),
        researcher_model: "gemini-3-pro-preview".to_owned(),
    }
}

#[test]
fn test_record_stops_at_limit() {
    let mut usage = Usage::default();

    usage.record(day(17), 2).unwrap();
    usage.record(day(17), 2).unwrap();
    let error = usage.record(day(17), 2).unwrap_err();

    assert_matches!(error, Error::QuotaExceeded { limit: 2 });
    assert_eq!(usage, Usage {
        date: Some(day(17)),
        count: 2,
    });
}

#[test]
fn test_count_resets_on_a_new_day() {
    let mut usage = Usage {
        date: Some(day(16)),
        count: 20,
    };

    assert_eq!(usage.count_on(day(17)), 0);
    usage.record(day(17), 20).unwrap();

    assert_eq!(usage, Usage {
        date: Some(day(17)),
        count: 1,
    });
}

#[test]
fn test_charge_persists_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join(USAGE_FILE);
    let config = assistant(false, 2);

    charge(&path, &config, day(17)).unwrap();
    charge(&path, &config, day(17)).unwrap();
    let error = charge(&path, &config, day(17)).unwrap_err();

    assert_eq!(
        error.to_string(),
        "You have reached the daily request limit (2). Upgrade to premium to keep working \
         without limits."
    );
    assert_eq!(load(&path).unwrap().count, 2);

    charge(&path, &config, day(18)).unwrap();
    assert_eq!(load(&path).unwrap(), Usage {
        date: Some(day(18)),
        count: 1,
    });
}

#[test]
fn test_premium_is_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(USAGE_FILE);

    charge(&path, &assistant(true, 0), day(17)).unwrap();

    assert!(!path.exists());
}

#[test]
fn test_zero_limit_rejects_free_tier() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(USAGE_FILE);

    assert_matches!(
        charge(&path, &assistant(false, 0), day(17)),
        Err(Error::QuotaExceeded { limit: 0 })
    );
    assert!(!path.exists());
}

#[test]
fn test_invalid_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(USAGE_FILE);
    std::fs::write(&path, "[]").unwrap();

    let error = charge(&path, &assistant(false, 20), day(17)).unwrap_err();

    assert_matches!(&error, Error::Usage { path: p, .. } if p == &path);
}
