use std::fmt::Write as _;
use std::path::PathBuf;

use crate::monitor::Dimension;

use super::OutgoingEmail;

/// One line of a warning email.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Breach {
    Unreachable { attempts: u32 },
    Metric { dimension: Dimension, value: f64 },
}

impl Breach {
    fn describe(&self, site: &str) -> String {
        match self {
            Breach::Unreachable { attempts } => format!(
                "{} has not been reachable after {} attempts to connect.",
                site, attempts
            ),
            Breach::Metric { dimension, value } => format!(
                "{} currently has a value of {:.2}{}.",
                dimension.key().to_uppercase(),
                value,
                unit_suffix(*dimension)
            ),
        }
    }
}

/// Returns `None` when there is nothing to report.
pub fn warning_email(
    site: &str,
    recipients: &[String],
    breaches: &[Breach],
    attachments: Vec<PathBuf>,
) -> Option<OutgoingEmail> {
    if breaches.is_empty() {
        return None;
    }

    let mut subject = String::new();
    if breaches
        .iter()
        .any(|breach| matches!(breach, Breach::Unreachable { .. }))
    {
        let _ = write!(subject, "Site {} is not accessible. ", site);
    }
    let metric_count = breaches
        .iter()
        .filter(|breach| matches!(breach, Breach::Metric { .. }))
        .count();
    if metric_count > 0 {
        let _ = write!(subject, "{} Hardware metrics exceeded.", metric_count);
    }

    let body = format!(
        "Greetings,\n\n\
         Kindly note that the site {site}'s metrics are not optimal. Please check the attached graphics for more details.\n\n\
         The following parameters have been breached:\n\n\
         {issues}\n\
         Regards",
        site = site,
        issues = numbered(breaches.iter().map(|breach| breach.describe(site))),
    );

    Some(OutgoingEmail {
        recipients: recipients.to_vec(),
        subject: subject.trim_end().to_string(),
        body,
        attachments,
    })
}

/// `cleared` lists the dimensions that left alarm this cycle.
pub fn recovery_email(
    site: &str,
    recipients: &[String],
    cleared: &[(Dimension, f64)],
) -> Option<OutgoingEmail> {
    if cleared.is_empty() {
        return None;
    }

    let lines = cleared.iter().map(|(dimension, value)| match dimension {
        Dimension::PingStatus => format!("{} is reachable again.", site),
        other => format!(
            "{} is back to {:.2}{}.",
            other.key().to_uppercase(),
            value,
            unit_suffix(*other)
        ),
    });

    Some(OutgoingEmail {
        recipients: recipients.to_vec(),
        subject: format!("Site {} recovered: {} metric(s) back to normal.", site, cleared.len()),
        body: format!(
            "Greetings,\n\nThe following parameters of {} are back within their limits:\n\n{}\nRegards",
            site,
            numbered(lines)
        ),
        attachments: Vec::new(),
    })
}

fn numbered(lines: impl Iterator<Item = String>) -> String {
    lines
        .enumerate()
        .fold(String::new(), |mut out, (index, line)| {
            let _ = writeln!(out, "{}. {}\n", index + 1, line);
            out
        })
}

fn unit_suffix(dimension: Dimension) -> &'static str {
    match dimension.unit() {
        "" => "",
        _ => " %",
    }
}
