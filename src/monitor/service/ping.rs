use chrono::{DateTime, Local};

use crate::app_context::AppContext;
use crate::graph::render_attachments;
use crate::notifier::{Breach, Notifier, recovery_email, warning_email};

use super::super::dimension::Dimension;
use super::super::evaluator::evaluate_ping;
use super::super::probe::{Prober, RetryPolicy, ping_with_retry};
use super::super::recorder::{read_all, record, tail};
use super::super::sample::PingSample;
use super::super::state::{self, PingAlertState};
use super::{CycleError, CycleOutcome, deliver, unix_seconds};

/// One reachability cycle: probe with retries, record, evaluate, persist, then notify.
pub async fn run_ping_cycle<P: Prober, N: Notifier>(
    context: &AppContext,
    prober: &P,
    notifier: &N,
    now: DateTime<Local>,
) -> Result<CycleOutcome, CycleError> {
    if !context.business_window.is_open(now.naive_local()) {
        log::debug!("ping_cycle_skipped reason=outside_business_hours");
        return Ok(CycleOutcome::Skipped);
    }

    let config = &context.config;
    let timestamp = unix_seconds(now);
    let sample = ping_with_retry(
        prober,
        &config.ping.url,
        RetryPolicy::from_config(&config.ping),
        timestamp,
    )
    .await;

    let series_file = context.paths.ping_results_file(now.date_naive());
    record(&sample, &series_file)?;
    let window: Vec<PingSample> = tail(&series_file, config.alarm.window_size);

    let state_file = context.paths.ping_state_file();
    let previous: PingAlertState = state::load(&state_file)?;
    let evaluation = evaluate_ping(&sample, &window, previous.alarm_triggered, &config.alarm);

    tracing::info!(
        target: "monitor",
        module = "ping",
        site = %config.site_name,
        url = %config.ping.url,
        status = ?sample.status,
        attempts = sample.attempts,
        status_code = sample.status_code,
        failures_in_window = evaluation.failures_in_window,
        required_failures = evaluation.required,
        alarm = evaluation.evaluation.exceeded,
        "ping_status"
    );

    state::update::<PingAlertState>(&state_file, &evaluation.evaluation, timestamp)?;

    let mut alarms = Vec::new();
    let mut clears = Vec::new();
    let mut notified = false;

    if evaluation.evaluation.transitioned_to_alarm {
        alarms.push(Dimension::PingStatus);
        log::warn!(
            "ping_alarm_raised site={} url={} attempts={} status_code={:?} error={:?}",
            config.site_name,
            config.ping.url,
            sample.attempts,
            sample.status_code,
            sample.error
        );

        let today: Vec<PingSample> = read_all(&series_file);
        let samples = today.iter().map(PingSample::metric).collect();
        let attachments =
            render_attachments(context, vec![(Dimension::PingStatus, None, samples)], now).await;

        notified = deliver(
            notifier,
            warning_email(
                &config.site_name,
                &config.mail.mailing_list,
                &[Breach::Unreachable {
                    attempts: sample.attempts,
                }],
                attachments,
            ),
        )
        .await;
    }

    if evaluation.evaluation.transitioned_to_clear {
        clears.push(Dimension::PingStatus);
        log::info!(
            "ping_alarm_cleared site={} url={}",
            config.site_name,
            config.ping.url
        );

        if config.alarm.notify_on_clear {
            notified |= deliver(
                notifier,
                recovery_email(
                    &config.site_name,
                    &config.mail.mailing_list,
                    &[(Dimension::PingStatus, 0.0)],
                ),
            )
            .await;
        }
    }

    Ok(CycleOutcome::Evaluated {
        alarms,
        clears,
        notified,
    })
}
