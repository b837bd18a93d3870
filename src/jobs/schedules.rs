use std::sync::Arc;

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use tokio::time::{Duration, interval, sleep};

use crate::app_context::AppContext;
use crate::graph::prune_exports;
use crate::notifier::MailNotifier;
use crate::report::{ReportOutcome, ReportScope, send_report};

const MAINTENANCE_INTERVAL_SECS: u64 = 3600;

pub(super) fn start_daily_report_job(app_context: AppContext, notifier: Arc<MailNotifier>) {
    tokio::spawn(async move {
        loop {
            let wait = duration_until_next_report(
                app_context.config.report.hour,
                app_context.config.report.minute,
                Local::now(),
            );
            sleep(wait).await;

            match send_report(&app_context, notifier.as_ref(), ReportScope::Daily, Local::now())
                .await
            {
                Ok(ReportOutcome::Sent) => log::info!("daily_report_sent"),
                Ok(ReportOutcome::Skipped(reason)) => {
                    log::info!("daily_report_skipped reason={}", reason)
                }
                Err(error) => log::error!("failed to send daily report: {}", error),
            }

            // The report minute may still be current; wait it out before rescheduling.
            sleep(Duration::from_secs(61)).await;
        }
    });
}

pub(super) fn start_maintenance_job(app_context: AppContext) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(MAINTENANCE_INTERVAL_SECS));

        loop {
            ticker.tick().await;
            match prune_exports(
                app_context.paths.exports_dir(),
                app_context.config.storage.max_export_folder_mb,
            ) {
                Ok(outcome) => log::info!(
                    "exports_maintenance removed_files={} remaining_bytes={}",
                    outcome.removed_files,
                    outcome.remaining_bytes
                ),
                Err(error) => log::warn!("exports_maintenance_failed error={}", error),
            }
        }
    });
}

fn duration_until_next_report(hour: u8, minute: u8, now: DateTime<Local>) -> Duration {
    let today = now.date_naive();

    let mut scheduled = match scheduled_at(today, hour, minute) {
        Some(value) => value,
        None => return Duration::from_secs(60),
    };
    if scheduled <= now {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        scheduled = match scheduled_at(tomorrow, hour, minute) {
            Some(value) => value,
            None => return Duration::from_secs(60),
        };
    }

    (scheduled - now)
        .to_std()
        .unwrap_or_else(|_| Duration::from_secs(60))
}

fn scheduled_at(day: NaiveDate, hour: u8, minute: u8) -> Option<DateTime<Local>> {
    let naive = day.and_hms_opt(u32::from(hour), u32::from(minute), 0)?;
    Local.from_local_datetime(&naive).earliest()
}
