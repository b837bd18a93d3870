use std::path::Path;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Mail;

use super::{Notifier, NotifyError, OutgoingEmail};

const IMPLICIT_TLS_PORT: u16 = 465;

pub enum MailNotifier {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        sender: Mailbox,
    },
    /// Mail is switched off; messages are only logged.
    Disabled,
}

impl MailNotifier {
    pub fn from_config(config: &Mail) -> Result<Self, NotifyError> {
        if !config.enabled {
            return Ok(Self::Disabled);
        }

        let sender = parse_mailbox(&config.sender)?;
        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.sender.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self::Smtp { transport, sender })
    }
}

impl Notifier for MailNotifier {
    async fn send(&self, email: OutgoingEmail) -> Result<(), NotifyError> {
        if email.recipients.is_empty() {
            log::warn!("mail_skipped reason=no_recipients subject={:?}", email.subject);
            return Ok(());
        }

        match self {
            MailNotifier::Disabled => {
                log::info!(
                    "mail_disabled recipients={} subject={:?} attachments={}",
                    email.recipients.join(","),
                    email.subject,
                    email.attachments.len()
                );
                Ok(())
            }
            MailNotifier::Smtp { transport, sender } => {
                let message = build_message(sender, &email)?;
                transport.send(message).await?;
                log::info!(
                    "mail_sent recipients={} subject={:?} attachments={}",
                    email.recipients.join(","),
                    email.subject,
                    email.attachments.len()
                );
                Ok(())
            }
        }
    }
}

fn build_message(sender: &Mailbox, email: &OutgoingEmail) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(sender.clone())
        .subject(email.subject.clone());
    for recipient in &email.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));
    for path in &email.attachments {
        if let Some(part) = png_attachment(path) {
            body = body.singlepart(part);
        }
    }

    Ok(builder.multipart(body)?)
}

/// Unreadable attachments are skipped so the alert still goes out.
fn png_attachment(path: &Path) -> Option<SinglePart> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            log::warn!(
                "mail_attachment_skipped path={} error={}",
                path.display(),
                error
            );
            return None;
        }
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart.png".to_string());
    let content_type = ContentType::parse("image/png").ok()?;
    Some(Attachment::new(file_name).body(bytes, content_type))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| NotifyError::Address {
            address: address.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{MailNotifier, build_message, parse_mailbox};
    use crate::config::Mail;
    use crate::notifier::{Notifier, NotifyError, OutgoingEmail};

    fn email(attachments: Vec<PathBuf>) -> OutgoingEmail {
        OutgoingEmail {
            recipients: vec!["ops@example.com".to_string(), "noc@example.com".to_string()],
            subject: "Site acme is not accessible.".to_string(),
            body: "Greetings".to_string(),
            attachments,
        }
    }

    #[test]
    fn message_carries_every_recipient_and_attachment() {
        let dir = tempfile::tempdir().expect("temp dir");
        let chart = dir.path().join("ping.png");
        std::fs::write(&chart, [0x89, b'P', b'N', b'G']).expect("write chart");

        let sender = parse_mailbox("monitor@example.com").expect("sender");
        let message = build_message(
            &sender,
            &email(vec![chart, dir.path().join("missing.png")]),
        )
        .expect("message");
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        assert!(raw.contains("ops@example.com"));
        assert!(raw.contains("noc@example.com"));
        assert!(raw.contains("filename=\"ping.png\""));
        assert!(!raw.contains("missing.png"));
    }

    #[test]
    fn invalid_recipient_is_reported() {
        let sender = parse_mailbox("monitor@example.com").expect("sender");
        let mut bad = email(Vec::new());
        bad.recipients = vec!["not an address".to_string()];

        assert!(matches!(
            build_message(&sender, &bad),
            Err(NotifyError::Address { .. })
        ));
    }

    #[tokio::test]
    async fn disabled_mailer_accepts_messages() {
        let config = Mail {
            enabled: false,
            ..Mail::default()
        };
        let notifier = MailNotifier::from_config(&config).expect("notifier");
        assert!(matches!(notifier, MailNotifier::Disabled));
        notifier.send(email(Vec::new())).await.expect("logged only");
    }
}
