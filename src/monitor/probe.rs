use std::time::Duration;

use tokio::time::sleep;

use crate::config::Ping;

use super::sample::{PingSample, PingStatus};

/// Outcome of a single HTTP GET against the monitored URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeAttempt {
    Reached,
    Status(u16),
    Error(String),
}

pub trait Prober {
    async fn probe(&self, url: &str) -> ProbeAttempt;
}

pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(request_timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .user_agent(concat!("sitewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeAttempt {
        match self.client.get(url).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => ProbeAttempt::Reached,
            Ok(response) => ProbeAttempt::Status(response.status().as_u16()),
            Err(error) => ProbeAttempt::Error(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retry_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(ping: &Ping) -> Self {
        Self {
            max_retry_attempts: ping.max_retry_attempts,
            backoff: Duration::from_secs(ping.retry_backoff_secs),
        }
    }
}

/// Probes once, then retries up to the policy bound. Exhaustion yields a failure sample.
pub async fn ping_with_retry<P: Prober>(
    prober: &P,
    url: &str,
    policy: RetryPolicy,
    timestamp: f64,
) -> PingSample {
    let mut attempts = 1u32;
    let mut last = prober.probe(url).await;

    while last != ProbeAttempt::Reached && attempts <= policy.max_retry_attempts {
        log::info!(
            "ping_retry url={} attempt={} max_retries={} last={:?}",
            url,
            attempts,
            policy.max_retry_attempts,
            last
        );
        sleep(policy.backoff).await;
        attempts += 1;
        last = prober.probe(url).await;
    }

    let (status, status_code, error) = match last {
        ProbeAttempt::Reached => (PingStatus::Success, None, None),
        ProbeAttempt::Status(code) => (PingStatus::Failure, Some(code), None),
        ProbeAttempt::Error(message) => (PingStatus::Failure, None, Some(message)),
    };

    PingSample {
        timestamp,
        status,
        attempts,
        status_code,
        error,
    }
}

#[cfg(test)]
pub(crate) struct MockProber {
    script: std::sync::Mutex<Vec<ProbeAttempt>>,
    calls: std::sync::atomic::AtomicU32,
}

#[cfg(test)]
impl MockProber {
    /// Replays `script` in order; once exhausted every probe reaches the site.
    pub(crate) fn new(script: Vec<ProbeAttempt>) -> Self {
        Self {
            script: std::sync::Mutex::new(script),
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Prober for MockProber {
    async fn probe(&self, _url: &str) -> ProbeAttempt {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut script = self.script.lock().expect("mock prober lock");
        if script.is_empty() {
            ProbeAttempt::Reached
        } else {
            script.remove(0)
        }
    }
}
