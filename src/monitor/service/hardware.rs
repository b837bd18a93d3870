use chrono::{DateTime, Local};

use crate::app_context::AppContext;
use crate::graph::render_attachments;
use crate::notifier::{Breach, Notifier, recovery_email, warning_email};

use super::super::dimension::Dimension;
use super::super::evaluator::evaluate_hardware;
use super::super::provider::MetricsProvider;
use super::super::recorder::{read_all, record, tail};
use super::super::sample::HardwareSample;
use super::super::state::{self, HardwareAlertState};
use super::{CycleError, CycleOutcome, deliver, unix_seconds};

/// One hardware cycle: sample, record, evaluate, persist, then notify.
pub async fn run_hardware_cycle<P: MetricsProvider, N: Notifier>(
    context: &AppContext,
    provider: &mut P,
    notifier: &N,
    now: DateTime<Local>,
) -> Result<CycleOutcome, CycleError> {
    if !context.business_window.is_open(now.naive_local()) {
        log::debug!("hardware_cycle_skipped reason=outside_business_hours");
        return Ok(CycleOutcome::Skipped);
    }

    let config = &context.config;
    let timestamp = unix_seconds(now);
    let sample = provider.collect_metrics(timestamp).await?;

    let series_file = context.paths.hardware_results_file(now.date_naive());
    record(&sample, &series_file)?;
    let window: Vec<HardwareSample> = tail(&series_file, config.alarm.window_size);

    let state_file = context.paths.hardware_state_file();
    let previous: HardwareAlertState = state::load(&state_file)?;
    let evaluation = evaluate_hardware(
        &sample,
        &window,
        &previous,
        &config.thresholds,
        &config.alarm,
    );

    tracing::info!(
        target: "monitor",
        module = "hardware",
        site = %config.site_name,
        cpu = sample.cpu_usage,
        ram = sample.ram_usage_percentage,
        disk = sample.value(Dimension::DiskUsage).unwrap_or_default(),
        load_10m = sample.load_avg_last_10_mins,
        exceeded_dimensions = evaluation.corroboration.exceeded_dimensions,
        window_triggers = evaluation.corroboration.triggers,
        required_triggers = evaluation.corroboration.required,
        "hardware_metrics"
    );

    state::update::<HardwareAlertState>(&state_file, &evaluation.updates, timestamp)?;

    let alarms = evaluation.alarms().copied().collect::<Vec<_>>();
    let clears = evaluation.clears().copied().collect::<Vec<_>>();
    for update in &clears {
        log::info!(
            "hardware_alarm_cleared site={} dimension={} value={:.2}",
            config.site_name,
            update.dimension.key(),
            update.value
        );
    }

    let mut notified = false;
    if !alarms.is_empty() {
        for update in &alarms {
            log::warn!(
                "hardware_alarm_raised site={} dimension={} value={:.2} threshold={:?}",
                config.site_name,
                update.dimension.key(),
                update.value,
                update.threshold
            );
        }

        let today: Vec<HardwareSample> = read_all(&series_file);
        let requests = alarms
            .iter()
            .map(|update| {
                let samples = today
                    .iter()
                    .filter_map(|sample| sample.metric(update.dimension))
                    .collect();
                (update.dimension, update.threshold, samples)
            })
            .collect();
        let attachments = render_attachments(context, requests, now).await;

        let breaches = alarms
            .iter()
            .map(|update| Breach::Metric {
                dimension: update.dimension,
                value: update.value,
            })
            .collect::<Vec<_>>();
        notified = deliver(
            notifier,
            warning_email(
                &config.site_name,
                &config.mail.mailing_list,
                &breaches,
                attachments,
            ),
        )
        .await;
    }

    if config.alarm.notify_on_clear && !clears.is_empty() {
        let cleared = clears
            .iter()
            .map(|update| (update.dimension, update.value))
            .collect::<Vec<_>>();
        notified |= deliver(
            notifier,
            recovery_email(&config.site_name, &config.mail.mailing_list, &cleared),
        )
        .await;
    }

    Ok(CycleOutcome::Evaluated {
        alarms: alarms.iter().map(|update| update.dimension).collect(),
        clears: clears.iter().map(|update| update.dimension).collect(),
        notified,
    })
}
