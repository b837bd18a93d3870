use std::path::PathBuf;

use thiserror::Error;

mod compose;
mod mail;

pub use compose::{Breach, recovery_email, warning_email};
pub use mail::MailNotifier;

/// A plaintext email with optional PNG attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mail address {address}: {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[cfg(test)]
    #[error("{0}")]
    Mock(String),
}

pub trait Notifier {
    async fn send(&self, email: OutgoingEmail) -> Result<(), NotifyError>;
}

#[cfg(test)]
pub(crate) use recording::RecordingNotifier;

#[cfg(test)]
mod recording {
    use std::sync::Mutex;

    use super::{Notifier, NotifyError, OutgoingEmail};

    /// Keeps every email it is asked to send; optionally fails each send afterwards.
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        sent: Mutex<Vec<OutgoingEmail>>,
        failing: bool,
    }

    impl RecordingNotifier {
        pub(crate) fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                failing: true,
            }
        }

        pub(crate) fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().expect("recording lock").clone()
        }
    }

    impl Notifier for RecordingNotifier {
        async fn send(&self, email: OutgoingEmail) -> Result<(), NotifyError> {
            self.sent.lock().expect("recording lock").push(email);
            if self.failing {
                return Err(NotifyError::Mock("smtp unavailable".to_string()));
            }
            Ok(())
        }
    }
}
