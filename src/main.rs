mod app_context;
mod cli;
mod config;
mod graph;
mod jobs;
mod logging;
mod monitor;
mod notifier;
mod paths;
mod report;

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;

use crate::app_context::AppContext;
use crate::cli::{Cli, Command};
use crate::config::load_config;
use crate::jobs::start_background_jobs;
use crate::logging::init_json_logging;
use crate::monitor::{
    ActiveMetricsProvider, HardwareAlertState, HttpProber, PingAlertState, run_hardware_cycle,
    run_ping_cycle, seed_state,
};
use crate::notifier::MailNotifier;
use crate::paths::ensure_site_dirs;
use crate::report::{ReportScope, send_report};

/// Creates result folders and default state files. Existing state is kept.
fn prepare_site(app_context: &AppContext) -> Result<(), String> {
    let paths = &app_context.paths;
    ensure_site_dirs(paths).map_err(|error| format!("failed to create site folders: {}", error))?;

    for (file, created) in [
        (
            paths.hardware_state_file(),
            seed_state::<HardwareAlertState>(&paths.hardware_state_file()),
        ),
        (
            paths.ping_state_file(),
            seed_state::<PingAlertState>(&paths.ping_state_file()),
        ),
    ] {
        match created {
            Ok(true) => log::info!("alert_state_seeded path={}", file.display()),
            Ok(false) => log::debug!("alert_state_present path={}", file.display()),
            Err(error) => return Err(error.to_string()),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(error) => {
            init_json_logging(None);
            log::error!("Configuration error: {}", error);
            return ExitCode::FAILURE;
        }
    };
    init_json_logging(Some(&config.logging));

    let app_context = match AppContext::new(config) {
        Ok(app_context) => app_context,
        Err(error) => {
            log::error!("Configuration validation failed: {}", error);
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = prepare_site(&app_context) {
        log::error!("CRITICAL: site initialization failed: {}", error);
        return ExitCode::FAILURE;
    }

    let command = cli.command();
    if command == Command::Init {
        log::info!(
            "site_initialized site={} config={}",
            app_context.config.site_name,
            cli.config.display()
        );
        return ExitCode::SUCCESS;
    }

    let notifier = match MailNotifier::from_config(&app_context.config.mail) {
        Ok(notifier) => Arc::new(notifier),
        Err(error) => {
            log::error!("Mail configuration error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Init => ExitCode::SUCCESS,
        Command::Run => {
            log::info!(
                "sitewatch is starting site={} url={}",
                app_context.config.site_name,
                app_context.config.ping.url
            );
            start_background_jobs(app_context, notifier);

            if let Err(error) = tokio::signal::ctrl_c().await {
                log::error!("shutdown signal listener failed: {}", error);
                return ExitCode::FAILURE;
            }
            log::info!("sitewatch is shutting down");
            ExitCode::SUCCESS
        }
        Command::PingOnce => {
            let prober = match HttpProber::new(app_context.config.ping.request_timeout_secs) {
                Ok(prober) => prober,
                Err(error) => {
                    log::error!("http client error: {}", error);
                    return ExitCode::FAILURE;
                }
            };
            match run_ping_cycle(&app_context, &prober, notifier.as_ref(), Local::now()).await {
                Ok(outcome) => {
                    log::info!("ping_once outcome={:?}", outcome);
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    log::error!("ping_cycle_failed error={}", error);
                    ExitCode::FAILURE
                }
            }
        }
        Command::HardwareOnce => {
            let config = &app_context.config;
            let mut provider =
                ActiveMetricsProvider::new(config.simulation.enabled, &config.hardware.disk_mount_point);
            match run_hardware_cycle(&app_context, &mut provider, notifier.as_ref(), Local::now())
                .await
            {
                Ok(outcome) => {
                    log::info!("hardware_once outcome={:?}", outcome);
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    log::error!("hardware_cycle_failed error={}", error);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Report { last } => {
            let scope = match last {
                Some(count) => ReportScope::LastItems(count),
                None => ReportScope::Daily,
            };
            match send_report(&app_context, notifier.as_ref(), scope, Local::now()).await {
                Ok(outcome) => {
                    log::info!("report outcome={:?}", outcome);
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    log::error!("report_failed error={}", error);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
