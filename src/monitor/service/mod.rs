use chrono::{DateTime, Local};
use thiserror::Error;

use crate::notifier::{Notifier, OutgoingEmail};

use super::dimension::Dimension;
use super::provider::MonitorError;
use super::recorder::RecorderError;
use super::state::StateStoreError;

mod hardware;
mod ping;

pub use hardware::run_hardware_cycle;
pub use ping::run_ping_cycle;

/// Failures that abort one cycle. The next cycle starts fresh.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("metric source failed: {0}")]
    Metrics(#[from] MonitorError),
    #[error(transparent)]
    Record(#[from] RecorderError),
    #[error(transparent)]
    State(#[from] StateStoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Outside business hours; nothing was sampled.
    Skipped,
    Evaluated {
        alarms: Vec<Dimension>,
        clears: Vec<Dimension>,
        notified: bool,
    },
}

pub(crate) fn unix_seconds(now: DateTime<Local>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}

/// Mail failures never fail the cycle: state is already persisted.
/// Returns whether a message was actually handed to the notifier and accepted.
pub(crate) async fn deliver<N: Notifier>(notifier: &N, email: Option<OutgoingEmail>) -> bool {
    let Some(email) = email else {
        return false;
    };
    if email.recipients.is_empty() {
        log::warn!("notification_skipped reason=no_recipients subject={:?}", email.subject);
        return false;
    }

    let subject = email.subject.clone();
    match notifier.send(email).await {
        Ok(()) => true,
        Err(error) => {
            log::error!("notification_failed subject={:?} error={}", subject, error);
            false
        }
    }
}

#[cfg(test)]
mod tests;
