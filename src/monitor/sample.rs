use serde::{Deserialize, Serialize};

use super::dimension::{Dimension, MetricSample};
use super::evaluator::disk_usage_percent;

/// One hardware reading as appended to the per-day hardware file. Sizes are GiB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardwareSample {
    pub timestamp: f64,
    pub cpu_usage: f64,
    #[serde(default)]
    pub ram_usage_free: f64,
    #[serde(default)]
    pub ram_usage_used: f64,
    pub ram_usage_percentage: f64,
    #[serde(default)]
    pub load_avg_last_5_mins: f64,
    #[serde(default)]
    pub load_avg_last_10_mins: f64,
    #[serde(default)]
    pub load_avg_last_15_mins: f64,
    #[serde(default)]
    pub disk_usage_free: f64,
    #[serde(default)]
    pub disk_usage_used: f64,
}

impl HardwareSample {
    pub fn value(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::CpuUsage => Some(self.cpu_usage),
            Dimension::RamUsage => Some(self.ram_usage_percentage),
            Dimension::DiskUsage => Some(disk_usage_percent(
                self.disk_usage_used,
                self.disk_usage_free,
            )),
            Dimension::LoadAvg10m => Some(self.load_avg_last_10_mins),
            Dimension::PingStatus => None,
        }
    }

    pub fn metric(&self, dimension: Dimension) -> Option<MetricSample> {
        self.value(dimension).map(|value| MetricSample {
            timestamp: self.timestamp,
            value,
            dimension,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PingStatus {
    Success,
    Failure,
}

/// One ping cycle as appended to the per-day ping file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingSample {
    pub timestamp: f64,
    pub status: PingStatus,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_attempts() -> u32 {
    1
}

impl PingSample {
    pub fn is_failure(&self) -> bool {
        self.status == PingStatus::Failure
    }

    /// Failures plot as 1.0 so they line up with the alarm direction of other dimensions.
    pub fn metric(&self) -> MetricSample {
        MetricSample {
            timestamp: self.timestamp,
            value: if self.is_failure() { 1.0 } else { 0.0 },
            dimension: Dimension::PingStatus,
        }
    }
}
