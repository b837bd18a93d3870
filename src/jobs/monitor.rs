use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::time::{Duration, sleep};

use crate::app_context::AppContext;
use crate::monitor::{
    ActiveMetricsProvider, CycleOutcome, HttpProber, run_hardware_cycle, run_ping_cycle,
};
use crate::notifier::MailNotifier;

pub(super) fn start_ping_job(app_context: AppContext, notifier: Arc<MailNotifier>) {
    let config = app_context.config.clone();
    let prober = match HttpProber::new(config.ping.request_timeout_secs) {
        Ok(prober) => prober,
        Err(error) => {
            log::error!("CRITICAL: ping job not started: http client error: {}", error);
            return;
        }
    };

    tokio::spawn(async move {
        let interval_secs = config.ping.interval_secs;
        let mut previous_tick = None;

        loop {
            let now = Local::now();
            warn_if_delayed("ping", previous_tick, now, interval_secs);
            previous_tick = Some(now);

            match run_ping_cycle(&app_context, &prober, notifier.as_ref(), now).await {
                Ok(outcome) => log_outcome("ping", &outcome),
                Err(error) => log::error!("ping_cycle_failed error={}", error),
            }

            sleep(Duration::from_secs(interval_secs)).await;
        }
    });
}

pub(super) fn start_hardware_job(app_context: AppContext, notifier: Arc<MailNotifier>) {
    tokio::spawn(async move {
        let config = app_context.config.clone();
        let mut provider = ActiveMetricsProvider::new(
            config.simulation.enabled,
            &config.hardware.disk_mount_point,
        );
        if config.simulation.enabled {
            log::warn!("simulation_mode_enabled source=hardware_provider");
        }

        let interval_secs = config.hardware.interval_secs;
        let mut previous_tick = None;

        loop {
            let now = Local::now();
            warn_if_delayed("hardware", previous_tick, now, interval_secs);
            previous_tick = Some(now);

            match run_hardware_cycle(&app_context, &mut provider, notifier.as_ref(), now).await {
                Ok(outcome) => log_outcome("hardware", &outcome),
                Err(error) => log::error!("hardware_cycle_failed error={}", error),
            }

            sleep(Duration::from_secs(interval_secs)).await;
        }
    });
}

fn warn_if_delayed(
    job: &str,
    previous: Option<DateTime<Local>>,
    now: DateTime<Local>,
    interval_secs: u64,
) {
    let Some(previous) = previous else {
        return;
    };

    let elapsed_secs = now.signed_duration_since(previous).num_seconds().max(0);
    let threshold_secs = i64::try_from(interval_secs.saturating_mul(2)).unwrap_or(i64::MAX);
    if elapsed_secs > threshold_secs {
        log::warn!(
            "monitor_loop_delayed job={} elapsed_secs={} threshold_secs={}",
            job,
            elapsed_secs,
            threshold_secs
        );
    }
}

fn log_outcome(job: &str, outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Skipped => log::debug!("cycle_skipped job={}", job),
        CycleOutcome::Evaluated {
            alarms,
            clears,
            notified,
        } => {
            if !alarms.is_empty() || !clears.is_empty() {
                log::info!(
                    "cycle_transitions job={} alarms={:?} clears={:?} notified={}",
                    job,
                    alarms,
                    clears,
                    notified
                );
            }
        }
    }
}
