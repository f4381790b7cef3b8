use super::*;

fn name(s: &str) -> StepName {
    StepName::new(s)
}

#[test]
fn test_new_report_is_empty_and_successful() {
    let report = ExecutionReport::new();
    assert!(report.entries().is_empty());
    assert!(report.is_success());
    assert!(!report.is_finished());
    assert_eq!(report.summary(), ReportSummary::default());
}

#[test]
fn test_record_keeps_order_and_counts() {
    let mut report = ExecutionReport::new();
    report.record(name("create_users"), Outcome::Applied, "created");
    report.record(name("add_ical_url"), Outcome::Skipped, "already present");
    report.record_failure(
        name("seed_autopilot"),
        FailureKind::MissingPrerequisite,
        "table host_ai_autopilot_settings does not exist",
    );

    let steps: Vec<&str> = report.entries().iter().map(|e| e.step.as_str()).collect();
    assert_eq!(steps, vec!["create_users", "add_ical_url", "seed_autopilot"]);

    let summary = report.summary();
    assert_eq!(summary.applied, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.to_string(), "1 applied, 1 skipped, 1 failed");
    assert!(!report.is_success());

    let failed = report.entry("seed_autopilot").unwrap();
    assert_eq!(failed.failure, Some(FailureKind::MissingPrerequisite));
    assert_eq!(report.outcome("add_ical_url"), Some(Outcome::Skipped));
    assert_eq!(report.outcome("unknown"), None);
}

#[test]
fn test_finished_report_is_frozen() {
    let mut report = ExecutionReport::new();
    report.record(name("create_users"), Outcome::Applied, "created");
    let mut report = report.finish();
    assert!(report.is_finished());
    assert!(report.duration_ms().unwrap() >= 0);

    report.record(name("late"), Outcome::Applied, "too late");
    assert_eq!(report.entries().len(), 1);
}

#[test]
fn test_json_output() {
    let mut report = ExecutionReport::new();
    report.record(name("create_users"), Outcome::Applied, "created");
    report.record_failure(name("seed"), FailureKind::ApplyFailure, "constraint violated");
    let report = report.finish();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["entries"][0]["outcome"], "applied");
    assert!(json["entries"][0].get("failure").is_none());
    assert_eq!(json["entries"][1]["failure"], "apply_failure");
    assert_eq!(json["run_id"], report.run_id.as_str());
}

#[test]
fn test_display_labels() {
    assert_eq!(Outcome::Skipped.to_string(), "skipped");
    assert_eq!(FailureKind::RolledBack.to_string(), "rolled_back");
}
