use serde::{Deserialize, Serialize};

use crate::config::Thresholds;

/// A monitored metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CpuUsage,
    RamUsage,
    DiskUsage,
    LoadAvg10m,
    PingStatus,
}

impl Dimension {
    pub const HARDWARE: [Dimension; 4] = [
        Dimension::CpuUsage,
        Dimension::RamUsage,
        Dimension::DiskUsage,
        Dimension::LoadAvg10m,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::CpuUsage => "cpu_usage",
            Self::RamUsage => "ram_usage",
            Self::DiskUsage => "disk_usage",
            Self::LoadAvg10m => "load_avg_10m",
            Self::PingStatus => "ping_status",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::CpuUsage => "CPU Usage",
            Self::RamUsage => "RAM Usage",
            Self::DiskUsage => "Disk Usage",
            Self::LoadAvg10m => "Load Average (10 min)",
            Self::PingStatus => "Ping Status",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::CpuUsage | Self::RamUsage | Self::DiskUsage => "%",
            Self::LoadAvg10m | Self::PingStatus => "",
        }
    }

    /// `None` means the dimension is recorded but never alarms.
    pub fn threshold(self, thresholds: &Thresholds) -> Option<f64> {
        match self {
            Self::CpuUsage => Some(thresholds.cpu),
            Self::RamUsage => Some(thresholds.ram),
            Self::DiskUsage => Some(thresholds.disk),
            Self::LoadAvg10m => thresholds.load_avg_10m,
            Self::PingStatus => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Unix seconds.
    pub timestamp: f64,
    pub value: f64,
    pub dimension: Dimension,
}
