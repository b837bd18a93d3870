use std::path::{Path, PathBuf};

use sysinfo::{CpuExt, DiskExt, System, SystemExt};
use thiserror::Error;

use super::sample::HardwareSample;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct MonitorError {
    message: String,
}

impl MonitorError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn mock_metrics_exhausted() -> Self {
        Self::new("mock metrics exhausted")
    }
}

pub trait MetricsProvider {
    async fn collect_metrics(&mut self, timestamp: f64) -> Result<HardwareSample, MonitorError>;
}

pub enum ActiveMetricsProvider {
    Real(Box<RealMetricsProvider>),
    Simulated(SimulatedMetricsProvider),
}

impl ActiveMetricsProvider {
    pub fn new(simulation_enabled: bool, disk_mount_point: &str) -> Self {
        if simulation_enabled {
            Self::Simulated(SimulatedMetricsProvider::new())
        } else {
            Self::Real(Box::new(RealMetricsProvider::new(disk_mount_point)))
        }
    }
}

impl MetricsProvider for ActiveMetricsProvider {
    async fn collect_metrics(&mut self, timestamp: f64) -> Result<HardwareSample, MonitorError> {
        match self {
            ActiveMetricsProvider::Real(provider) => provider.collect_metrics(timestamp).await,
            ActiveMetricsProvider::Simulated(provider) => {
                provider.collect_metrics(timestamp).await
            }
        }
    }
}

pub struct RealMetricsProvider {
    system: System,
    disk_mount_point: PathBuf,
}

impl RealMetricsProvider {
    pub fn new(disk_mount_point: &str) -> Self {
        Self {
            system: System::new_all(),
            disk_mount_point: PathBuf::from(disk_mount_point),
        }
    }
}

impl MetricsProvider for RealMetricsProvider {
    async fn collect_metrics(&mut self, timestamp: f64) -> Result<HardwareSample, MonitorError> {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.system.refresh_disks_list();
        self.system.refresh_disks();

        let cpu_usage = f64::from(self.system.global_cpu_info().cpu_usage());

        let total_memory = self.system.total_memory() as f64;
        if total_memory <= 0.0 {
            return Err(MonitorError::new("total memory reported as zero"));
        }
        let used_memory = self.system.used_memory() as f64;
        let free_memory = self.system.free_memory() as f64;

        let disk = self
            .system
            .disks()
            .iter()
            .find(|disk| disk.mount_point() == self.disk_mount_point.as_path())
            .or_else(|| {
                self.system
                    .disks()
                    .iter()
                    .find(|disk| disk.mount_point() == Path::new("/"))
            })
            .or_else(|| self.system.disks().first())
            .ok_or_else(|| MonitorError::new("no disks reported by the operating system"))?;
        let disk_free = disk.available_space() as f64;
        let disk_used = disk.total_space().saturating_sub(disk.available_space()) as f64;

        let load = self.system.load_average();

        Ok(HardwareSample {
            timestamp,
            cpu_usage,
            ram_usage_free: free_memory / BYTES_PER_GIB,
            ram_usage_used: used_memory / BYTES_PER_GIB,
            ram_usage_percentage: (used_memory / total_memory) * 100.0,
            load_avg_last_5_mins: load.one,
            load_avg_last_10_mins: load.five,
            load_avg_last_15_mins: load.fifteen,
            disk_usage_free: round_2(disk_free / BYTES_PER_GIB),
            disk_usage_used: round_2(disk_used / BYTES_PER_GIB),
        })
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct SimulatedMetricsProvider {
    tick: u64,
}

impl SimulatedMetricsProvider {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl MetricsProvider for SimulatedMetricsProvider {
    async fn collect_metrics(&mut self, timestamp: f64) -> Result<HardwareSample, MonitorError> {
        self.tick = self.tick.saturating_add(1);
        let phase = self.tick as f64 / 8.0;

        let mut cpu = 45.0 + (phase.sin() * 20.0);
        let mut ram = 55.0 + ((phase * 0.7).sin() * 12.0);
        let mut disk_used = 60.0 + ((phase * 0.2).sin() * 5.0);

        // Sustained bursts so the corroboration window has something to confirm.
        if self.tick % 30 >= 25 {
            cpu = 95.0;
        }

        if self.tick % 47 >= 42 {
            ram = 93.0;
        }

        if self.tick % 83 >= 78 {
            disk_used = 91.0;
        }

        let load = 1.0 + (phase * 0.5).sin().abs();

        Ok(HardwareSample {
            timestamp,
            cpu_usage: cpu.clamp(0.0, 100.0),
            ram_usage_free: 16.0 * (1.0 - ram / 100.0),
            ram_usage_used: 16.0 * ram / 100.0,
            ram_usage_percentage: ram.clamp(0.0, 100.0),
            load_avg_last_5_mins: load * 1.1,
            load_avg_last_10_mins: load,
            load_avg_last_15_mins: load * 0.9,
            disk_usage_free: 100.0 - disk_used.clamp(0.0, 100.0),
            disk_usage_used: disk_used.clamp(0.0, 100.0),
        })
    }
}

#[cfg(test)]
pub(crate) struct MockMetricsProvider {
    sequence: Vec<HardwareSample>,
}

#[cfg(test)]
impl MockMetricsProvider {
    pub(crate) fn new(sequence: Vec<HardwareSample>) -> Self {
        Self { sequence }
    }
}

#[cfg(test)]
impl MetricsProvider for MockMetricsProvider {
    async fn collect_metrics(&mut self, timestamp: f64) -> Result<HardwareSample, MonitorError> {
        if self.sequence.is_empty() {
            return Err(MonitorError::mock_metrics_exhausted());
        }

        let mut sample = self.sequence.remove(0);
        sample.timestamp = timestamp;
        Ok(sample)
    }
}

#[cfg(test)]
pub(crate) fn hardware_sample(cpu: f64, ram: f64, disk_used: f64, disk_free: f64) -> HardwareSample {
    HardwareSample {
        timestamp: 0.0,
        cpu_usage: cpu,
        ram_usage_free: 0.0,
        ram_usage_used: 0.0,
        ram_usage_percentage: ram,
        load_avg_last_5_mins: 0.5,
        load_avg_last_10_mins: 0.5,
        load_avg_last_15_mins: 0.5,
        disk_usage_free: disk_free,
        disk_usage_used: disk_used,
    }
}
