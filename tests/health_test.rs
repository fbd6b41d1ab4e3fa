//! Portfolio health evaluation against exported collections

use chrono::{DateTime, TimeZone, Utc};
use vc_portfolio_search::config::{Config, HealthConfig};
use vc_portfolio_search::health::{HealthChecker, HealthStatus};
use vc_portfolio_search::models::Collections;

fn evaluated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
}

fn collections() -> Collections {
    serde_json::from_str(
        r#"{
            "companies": [
                {"id": "c1", "name": "TechCorp", "last_update_at": "2026-04-20T10:00:00Z"},
                {"id": "c2", "name": "Acme", "last_update_at": "2026-02-01T10:00:00Z",
                 "last_reminder_at": "2026-04-28T10:00:00Z"},
                {"id": "c3", "name": "Bluebird", "last_update_at": "2026-01-15T10:00:00Z",
                 "last_reminder_at": "2026-04-01T10:00:00Z"},
                {"id": "c4", "name": "Nimbus"}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_portfolio_summary_with_default_thresholds() {
    let checker = HealthChecker::new(&Config::default().health).unwrap();
    let collections = collections();

    let health = checker.summarize(&collections.companies, evaluated_at());

    assert_eq!(health.total, 4);
    assert_eq!(health.current, 1);
    assert_eq!(health.needs_update, 2);
    assert_eq!(health.never_reported, 1);
    // Acme was reminded three days ago and waits for the re-notify window
    assert_eq!(health.due_reminders, vec!["c3", "c4"]);
}

#[test]
fn test_tighter_thresholds_flag_more_companies() {
    let checker = HealthChecker::new(&HealthConfig {
        needs_update_after_days: 7,
        renotify_after_days: 2,
    })
    .unwrap();
    let companies = collections().companies;
    let now = evaluated_at();

    assert_eq!(checker.status(&companies[0], now), HealthStatus::NeedsUpdate);
    assert!(checker.should_notify(&companies[1], now));

    let health = checker.summarize(&companies, now);
    assert_eq!(health.current, 0);
    assert_eq!(health.due_reminders.len(), 4);
}

#[test]
fn test_status_names() {
    assert_eq!(HealthStatus::NeedsUpdate.to_string(), "needs_update");
    assert_eq!(
        serde_json::to_string(&HealthStatus::NeverReported).unwrap(),
        "\"never_reported\""
    );
}
