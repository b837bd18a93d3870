use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::app_context::AppContext;
use crate::monitor::{PingSample, PingStatus, hardware_sample, record};
use crate::notifier::RecordingNotifier;

use super::{ReportOutcome, ReportScope, send_report};

fn friday_evening() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 8, 17, 30, 0)
        .single()
        .expect("unambiguous local time")
}

fn saturday() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 9, 17, 30, 0)
        .single()
        .expect("unambiguous local time")
}

fn ping(timestamp: f64, status: PingStatus) -> PingSample {
    PingSample {
        timestamp,
        status,
        attempts: 1,
        status_code: None,
        error: None,
    }
}

fn populate(context: &AppContext) {
    let day = NaiveDate::from_ymd_opt(2024, 3, 8).expect("valid date");
    let ping_file = context.paths.ping_results_file(day);
    for (index, status) in [PingStatus::Success, PingStatus::Success, PingStatus::Failure, PingStatus::Success]
        .into_iter()
        .enumerate()
    {
        record(&ping(index as f64, status), &ping_file).expect("record ping");
    }

    let hardware_file = context.paths.hardware_results_file(day);
    for cpu in [10.0, 20.0, 30.0, 40.0] {
        record(&hardware_sample(cpu, 50.0, 30.0, 70.0), &hardware_file).expect("record hardware");
    }
}

#[tokio::test]
async fn daily_report_goes_to_the_mailing_list() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), "");
    populate(&context);
    let notifier = RecordingNotifier::default();

    let outcome = send_report(&context, &notifier, ReportScope::Daily, friday_evening())
        .await
        .expect("report");
    assert_eq!(outcome, ReportOutcome::Sent);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Daily Report for acme");
    assert_eq!(sent[0].recipients, vec!["ops@acme.example.com".to_string()]);
    assert!(sent[0].body.contains("Average Ping Success: 75.00 %."));
    assert!(sent[0].body.contains("Average CPU Usage: 25.00 %."));
    assert!(sent[0].body.contains("Average Disk Usage: 30.00 %."));
}

#[tokio::test]
async fn daily_report_skips_weekends() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), "");
    populate(&context);
    let notifier = RecordingNotifier::default();

    let outcome = send_report(&context, &notifier, ReportScope::Daily, saturday())
        .await
        .expect("report");
    assert_eq!(outcome, ReportOutcome::Skipped("outside_business_week"));
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn last_items_report_uses_the_adhoc_list_any_day() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), "");
    populate(&context);
    let notifier = RecordingNotifier::default();

    let outcome = send_report(&context, &notifier, ReportScope::LastItems(2), saturday())
        .await
        .expect("report");
    assert_eq!(outcome, ReportOutcome::Sent);

    let sent = notifier.sent();
    assert_eq!(
        sent[0].subject,
        "Recent Activity Report for acme (Last 2 Items)."
    );
    assert_eq!(sent[0].recipients, vec!["oncall@acme.example.com".to_string()]);
    assert!(sent[0].body.contains("Average Ping Success: 50.00 %."));
    assert!(sent[0].body.contains("Average CPU Usage: 35.00 %."));
}

#[tokio::test]
async fn empty_results_are_not_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), "");
    let notifier = RecordingNotifier::default();

    let outcome = send_report(&context, &notifier, ReportScope::Daily, friday_evening())
        .await
        .expect("report");
    assert_eq!(outcome, ReportOutcome::Skipped("no_samples"));
}

#[tokio::test]
async fn send_failures_are_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), "");
    populate(&context);
    let notifier = RecordingNotifier::failing();

    let result = send_report(&context, &notifier, ReportScope::LastItems(1), friday_evening()).await;
    assert!(result.is_err());
}
