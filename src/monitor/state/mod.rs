use serde::{Deserialize, Serialize};

use super::dimension::Dimension;

mod alert_logic;
mod store;

pub use store::{StateStoreError, load, seed, update};

/// Persisted alarm status of one hardware dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionState {
    #[serde(default)]
    pub exceeded: bool,
    #[serde(default)]
    pub trigger_count: u64,
    #[serde(default)]
    pub last_trigger_time: Option<f64>,
    #[serde(default)]
    pub value: f64,
}

/// Hardware alert record for one site. Missing fields decode as a quiet dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareAlertState {
    #[serde(default)]
    pub cpu_usage: DimensionState,
    #[serde(default)]
    pub ram_usage: DimensionState,
    #[serde(default)]
    pub disk_usage: DimensionState,
    #[serde(default)]
    pub load_avg_10m: DimensionState,
}

impl HardwareAlertState {
    /// Ping has its own record; asking for it here yields a default quiet state.
    pub fn dimension(&self, dimension: Dimension) -> DimensionState {
        match dimension {
            Dimension::CpuUsage => self.cpu_usage,
            Dimension::RamUsage => self.ram_usage,
            Dimension::DiskUsage => self.disk_usage,
            Dimension::LoadAvg10m => self.load_avg_10m,
            Dimension::PingStatus => DimensionState::default(),
        }
    }

    pub(crate) fn dimension_mut(&mut self, dimension: Dimension) -> Option<&mut DimensionState> {
        match dimension {
            Dimension::CpuUsage => Some(&mut self.cpu_usage),
            Dimension::RamUsage => Some(&mut self.ram_usage),
            Dimension::DiskUsage => Some(&mut self.disk_usage),
            Dimension::LoadAvg10m => Some(&mut self.load_avg_10m),
            Dimension::PingStatus => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PingAlertState {
    #[serde(default)]
    pub alarm_triggered: bool,
    #[serde(default)]
    pub trigger_count: u64,
    #[serde(default)]
    pub last_time_triggered: Option<f64>,
}
