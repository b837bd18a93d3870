use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::app_context::AppContext;
use crate::graph::render_attachments;
use crate::monitor::{Dimension, HardwareSample, MetricSample, PingSample, latest_file, read_all, tail};
use crate::notifier::{Notifier, NotifyError, OutgoingEmail};

mod stats;

pub use stats::{ReportStats, compute_stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    /// Whole latest day, sent to the regular mailing list on business days.
    Daily,
    /// Last N samples of the latest day, sent to the ad-hoc list at any time.
    LastItems(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Sent,
    Skipped(&'static str),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to send report: {0}")]
    Notify(#[from] NotifyError),
}

/// Builds the report email, or the reason there is none.
pub async fn build_report(
    context: &AppContext,
    scope: ReportScope,
    now: DateTime<Local>,
) -> Result<OutgoingEmail, &'static str> {
    let config = &context.config;
    if scope == ReportScope::Daily && !context.business_window.is_business_day(now.naive_local()) {
        return Err("outside_business_week");
    }
    if config.report.exclude_ping && config.report.exclude_hardware {
        return Err("all_domains_excluded");
    }

    let ping: Vec<PingSample> = if config.report.exclude_ping {
        Vec::new()
    } else {
        load_latest(&context.paths.ping_results_dir, scope)
    };
    let hardware: Vec<HardwareSample> = if config.report.exclude_hardware {
        Vec::new()
    } else {
        load_latest(&context.paths.hardware_results_dir, scope)
    };
    if ping.is_empty() && hardware.is_empty() {
        return Err("no_samples");
    }

    let stats = compute_stats(&ping, &hardware);
    log::info!(
        "report_stats site={} scope={:?} ping_samples={} hardware_samples={}",
        config.site_name,
        scope,
        stats.ping_samples,
        stats.hardware_samples
    );

    let mut requests: Vec<(Dimension, Option<f64>, Vec<MetricSample>)> = Vec::new();
    if !ping.is_empty() {
        requests.push((
            Dimension::PingStatus,
            None,
            ping.iter().map(PingSample::metric).collect(),
        ));
    }
    if !hardware.is_empty() {
        for dimension in Dimension::HARDWARE {
            requests.push((
                dimension,
                dimension.threshold(&config.thresholds),
                hardware
                    .iter()
                    .filter_map(|sample| sample.metric(dimension))
                    .collect(),
            ));
        }
    }
    let attachments = render_attachments(context, requests, now).await;

    let (subject, recipients) = match scope {
        ReportScope::Daily => (
            format!("Daily Report for {}", config.site_name),
            config.mail.mailing_list.clone(),
        ),
        ReportScope::LastItems(count) => (
            format!(
                "Recent Activity Report for {} (Last {} Items).",
                config.site_name, count
            ),
            config.mail.adhoc_mailing_list.clone(),
        ),
    };

    Ok(OutgoingEmail {
        recipients,
        subject,
        body: report_body(&config.site_name, &stats),
        attachments,
    })
}

pub async fn send_report<N: Notifier>(
    context: &AppContext,
    notifier: &N,
    scope: ReportScope,
    now: DateTime<Local>,
) -> Result<ReportOutcome, ReportError> {
    let email = match build_report(context, scope, now).await {
        Ok(email) => email,
        Err(reason) => {
            log::info!(
                "report_skipped site={} scope={:?} reason={}",
                context.config.site_name,
                scope,
                reason
            );
            return Ok(ReportOutcome::Skipped(reason));
        }
    };

    notifier.send(email).await?;
    Ok(ReportOutcome::Sent)
}

fn load_latest<T: DeserializeOwned>(dir: &Path, scope: ReportScope) -> Vec<T> {
    let Some(file) = latest_file(dir) else {
        return Vec::new();
    };
    match scope {
        ReportScope::Daily => read_all(&file),
        ReportScope::LastItems(count) => tail(&file, count),
    }
}

fn report_body(site: &str, stats: &ReportStats) -> String {
    let mut breakdown = String::new();
    if let Some(success) = stats.ping_success_percent {
        let _ = writeln!(breakdown, "Average Ping Success: {:.2} %.", success);
    }
    if let Some(disk) = stats.disk_avg {
        let _ = writeln!(breakdown, "Average Disk Usage: {:.2} %.", disk);
    }
    if let Some(ram) = stats.ram_avg {
        let _ = writeln!(breakdown, "Average RAM Usage: {:.2} %.", ram);
    }
    if let Some(cpu) = stats.cpu_avg {
        let _ = writeln!(breakdown, "Average CPU Usage: {:.2} %.", cpu);
    }
    if let Some(load) = stats.load_10m_avg {
        let _ = writeln!(breakdown, "Load Avg (10 Min): {:.2}.", load);
    }

    format!(
        "Please find the attached graphics for the report for {}.\n\n\
         Below is the breakdown of the site's performance:\n{}",
        site, breakdown
    )
}

#[cfg(test)]
mod tests;
