use std::sync::Arc;

use crate::app_context::AppContext;
use crate::notifier::MailNotifier;

mod monitor;
mod schedules;

pub fn start_background_jobs(app_context: AppContext, notifier: Arc<MailNotifier>) {
    if app_context.config.ping.enabled {
        monitor::start_ping_job(app_context.clone(), notifier.clone());
    }

    if app_context.config.hardware.enabled {
        monitor::start_hardware_job(app_context.clone(), notifier.clone());
    }

    if app_context.config.report.enabled {
        schedules::start_daily_report_job(app_context.clone(), notifier);
    }

    schedules::start_maintenance_job(app_context);
}
