use std::fs;

use chrono::{DateTime, Duration, Local, TimeZone};

use crate::app_context::AppContext;
use crate::monitor::probe::{MockProber, ProbeAttempt};
use crate::monitor::provider::{MockMetricsProvider, hardware_sample};
use crate::monitor::state::{self, HardwareAlertState, PingAlertState, StateStoreError};
use crate::monitor::{Dimension, HardwareSample, PingSample, read_all};
use crate::notifier::{OutgoingEmail, RecordingNotifier};

use super::{CycleError, CycleOutcome, deliver, run_hardware_cycle, run_ping_cycle};

const IMMEDIATE: &str = "max_triggers = 1\nwindow_size = 1";

fn tuesday_morning() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 5, 10, 0, 0)
        .single()
        .expect("unambiguous local time")
}

fn sunday_noon() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
        .single()
        .expect("unambiguous local time")
}

fn seeded(context: &AppContext) {
    state::seed::<HardwareAlertState>(&context.paths.hardware_state_file()).expect("seed hardware");
    state::seed::<PingAlertState>(&context.paths.ping_state_file()).expect("seed ping");
}

#[tokio::test]
async fn sunday_cycle_touches_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);
    seeded(&context);
    let state_before = fs::read(context.paths.hardware_state_file()).expect("state");

    let mut provider = MockMetricsProvider::new(vec![hardware_sample(99.0, 99.0, 99.0, 1.0)]);
    let notifier = RecordingNotifier::default();
    let now = sunday_noon();

    let outcome = run_hardware_cycle(&context, &mut provider, &notifier, now)
        .await
        .expect("cycle");
    assert_eq!(outcome, CycleOutcome::Skipped);

    let prober = MockProber::new(vec![ProbeAttempt::Status(503); 4]);
    let outcome = run_ping_cycle(&context, &prober, &notifier, now)
        .await
        .expect("ping cycle");
    assert_eq!(outcome, CycleOutcome::Skipped);
    assert_eq!(prober.calls(), 0);

    assert!(!context.paths.hardware_results_file(now.date_naive()).exists());
    assert!(!context.paths.ping_results_file(now.date_naive()).exists());
    assert_eq!(
        fs::read(context.paths.hardware_state_file()).expect("state"),
        state_before
    );
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn sustained_breach_notifies_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);
    seeded(&context);

    let hot = hardware_sample(95.0, 20.0, 10.0, 90.0);
    let mut provider = MockMetricsProvider::new(vec![hot, hot]);
    let notifier = RecordingNotifier::default();
    let now = tuesday_morning();

    let first = run_hardware_cycle(&context, &mut provider, &notifier, now)
        .await
        .expect("first cycle");
    assert_eq!(
        first,
        CycleOutcome::Evaluated {
            alarms: vec![Dimension::CpuUsage],
            clears: Vec::new(),
            notified: true,
        }
    );

    let second = run_hardware_cycle(&context, &mut provider, &notifier, now + Duration::minutes(1))
        .await
        .expect("second cycle");
    assert_eq!(
        second,
        CycleOutcome::Evaluated {
            alarms: Vec::new(),
            clears: Vec::new(),
            notified: false,
        }
    );

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "1 Hardware metrics exceeded.");
    assert_eq!(sent[0].recipients, vec!["ops@acme.example.com".to_string()]);

    let stored: HardwareAlertState =
        state::load(&context.paths.hardware_state_file()).expect("state");
    assert!(stored.cpu_usage.exceeded);
    assert_eq!(stored.cpu_usage.trigger_count, 1);
    assert_eq!(stored.ram_usage.trigger_count, 0);

    let series: Vec<HardwareSample> =
        read_all(&context.paths.hardware_results_file(now.date_naive()));
    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn missing_state_file_aborts_the_cycle() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);

    let mut provider = MockMetricsProvider::new(vec![hardware_sample(95.0, 20.0, 10.0, 90.0)]);
    let notifier = RecordingNotifier::default();

    let result = run_hardware_cycle(&context, &mut provider, &notifier, tuesday_morning()).await;
    assert!(matches!(
        result,
        Err(CycleError::State(StateStoreError::Missing { .. }))
    ));
    assert!(!context.paths.hardware_state_file().exists());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn metric_source_failure_aborts_the_cycle() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);
    seeded(&context);

    let mut provider = MockMetricsProvider::new(Vec::new());
    let notifier = RecordingNotifier::default();
    let now = tuesday_morning();

    let result = run_hardware_cycle(&context, &mut provider, &notifier, now).await;
    assert!(matches!(result, Err(CycleError::Metrics(_))));
    assert!(!context.paths.hardware_results_file(now.date_naive()).exists());
}

#[tokio::test]
async fn mail_failure_keeps_persisted_state() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);
    seeded(&context);

    let hot = hardware_sample(20.0, 20.0, 95.0, 5.0);
    let mut provider = MockMetricsProvider::new(vec![hot, hot]);
    let notifier = RecordingNotifier::failing();
    let now = tuesday_morning();

    let outcome = run_hardware_cycle(&context, &mut provider, &notifier, now)
        .await
        .expect("cycle survives mail failure");
    assert_eq!(
        outcome,
        CycleOutcome::Evaluated {
            alarms: vec![Dimension::DiskUsage],
            clears: Vec::new(),
            notified: false,
        }
    );

    let stored: HardwareAlertState =
        state::load(&context.paths.hardware_state_file()).expect("state");
    assert!(stored.disk_usage.exceeded);
    assert_eq!(stored.disk_usage.trigger_count, 1);

    run_hardware_cycle(&context, &mut provider, &notifier, now + Duration::minutes(1))
        .await
        .expect("second cycle");
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn unreachable_site_alarms_then_recovers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(
        dir.path(),
        "max_triggers = 1\nwindow_size = 10\nnotify_on_clear = true",
    );
    seeded(&context);

    let notifier = RecordingNotifier::default();
    let now = tuesday_morning();

    let down = MockProber::new(vec![ProbeAttempt::Status(503), ProbeAttempt::Status(503)]);
    let outcome = run_ping_cycle(&context, &down, &notifier, now)
        .await
        .expect("ping cycle");
    assert_eq!(
        outcome,
        CycleOutcome::Evaluated {
            alarms: vec![Dimension::PingStatus],
            clears: Vec::new(),
            notified: true,
        }
    );
    assert_eq!(down.calls(), 2);

    let up = MockProber::new(Vec::new());
    let outcome = run_ping_cycle(&context, &up, &notifier, now + Duration::minutes(1))
        .await
        .expect("ping cycle");
    assert_eq!(
        outcome,
        CycleOutcome::Evaluated {
            alarms: Vec::new(),
            clears: vec![Dimension::PingStatus],
            notified: true,
        }
    );

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, "Site acme is not accessible.");
    assert!(sent[0].body.contains("after 2 attempts"));
    assert!(sent[1].body.contains("acme is reachable again."));

    let stored: PingAlertState = state::load(&context.paths.ping_state_file()).expect("state");
    assert!(!stored.alarm_triggered);
    assert_eq!(stored.trigger_count, 1);

    let series: Vec<PingSample> = read_all(&context.paths.ping_results_file(now.date_naive()));
    assert_eq!(series.len(), 2);
    assert!(series[0].is_failure());
    assert_eq!(series[0].status_code, Some(503));
    assert!(!series[1].is_failure());
}

#[tokio::test]
async fn recovery_is_silent_by_default() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);
    seeded(&context);

    let hot = hardware_sample(95.0, 20.0, 10.0, 5.0);
    let cool = hardware_sample(20.0, 20.0, 10.0, 5.0);
    let mut provider = MockMetricsProvider::new(vec![hot, cool]);
    let notifier = RecordingNotifier::default();
    let now = tuesday_morning();

    run_hardware_cycle(&context, &mut provider, &notifier, now)
        .await
        .expect("alarm cycle");
    let outcome = run_hardware_cycle(&context, &mut provider, &notifier, now + Duration::minutes(1))
        .await
        .expect("recovery cycle");
    assert_eq!(
        outcome,
        CycleOutcome::Evaluated {
            alarms: Vec::new(),
            clears: vec![Dimension::CpuUsage],
            notified: false,
        }
    );
    assert_eq!(notifier.sent().len(), 1);

    let stored: HardwareAlertState =
        state::load(&context.paths.hardware_state_file()).expect("state");
    assert!(!stored.cpu_usage.exceeded);
    assert_eq!(stored.cpu_usage.trigger_count, 1);
}

#[tokio::test]
async fn ping_recovery_is_silent_by_default() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);
    seeded(&context);

    let notifier = RecordingNotifier::default();
    let now = tuesday_morning();

    let down = MockProber::new(vec![ProbeAttempt::Status(503), ProbeAttempt::Status(503)]);
    run_ping_cycle(&context, &down, &notifier, now)
        .await
        .expect("alarm cycle");

    let up = MockProber::new(Vec::new());
    let outcome = run_ping_cycle(&context, &up, &notifier, now + Duration::minutes(1))
        .await
        .expect("recovery cycle");
    assert_eq!(
        outcome,
        CycleOutcome::Evaluated {
            alarms: Vec::new(),
            clears: vec![Dimension::PingStatus],
            notified: false,
        }
    );
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn ping_mail_failure_does_not_repeat_the_alarm() {
    let dir = tempfile::tempdir().expect("temp dir");
    let context = AppContext::for_tests(dir.path(), IMMEDIATE);
    seeded(&context);

    let notifier = RecordingNotifier::failing();
    let now = tuesday_morning();

    let down = MockProber::new(vec![ProbeAttempt::Status(503), ProbeAttempt::Status(503)]);
    let first = run_ping_cycle(&context, &down, &notifier, now)
        .await
        .expect("cycle survives mail failure");
    assert_eq!(
        first,
        CycleOutcome::Evaluated {
            alarms: vec![Dimension::PingStatus],
            clears: Vec::new(),
            notified: false,
        }
    );

    let still_down = MockProber::new(vec![ProbeAttempt::Status(503), ProbeAttempt::Status(503)]);
    let second = run_ping_cycle(&context, &still_down, &notifier, now + Duration::minutes(1))
        .await
        .expect("second cycle");
    assert_eq!(
        second,
        CycleOutcome::Evaluated {
            alarms: Vec::new(),
            clears: Vec::new(),
            notified: false,
        }
    );
    assert_eq!(notifier.sent().len(), 1);

    let stored: PingAlertState = state::load(&context.paths.ping_state_file()).expect("state");
    assert!(stored.alarm_triggered);
    assert_eq!(stored.trigger_count, 1);
}

#[tokio::test]
async fn email_without_recipients_is_not_counted_as_sent() {
    let notifier = RecordingNotifier::default();
    let email = OutgoingEmail {
        recipients: Vec::new(),
        subject: "Site acme is not accessible.".to_string(),
        body: "Greetings".to_string(),
        attachments: Vec::new(),
    };

    assert!(!deliver(&notifier, Some(email)).await);
    assert!(notifier.sent().is_empty());
}
