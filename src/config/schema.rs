use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site_name: String,
    pub ping: Ping,
    #[serde(default)]
    pub hardware: Hardware,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub alarm: Alarm,
    #[serde(default)]
    pub business_hours: BusinessHours,
    #[serde(default)]
    pub mail: Mail,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub report: Report,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub simulation: Simulation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ping {
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ping_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hardware {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_hardware_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_disk_mount_point")]
    pub disk_mount_point: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_threshold_percent")]
    pub cpu: f64,
    #[serde(default = "default_threshold_percent")]
    pub ram: f64,
    #[serde(default = "default_threshold_percent")]
    pub disk: f64,
    #[serde(default)]
    pub load_avg_10m: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alarm {
    #[serde(default = "default_max_triggers")]
    pub max_triggers: u32,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default)]
    pub hysteresis: f64,
    #[serde(default)]
    pub notify_on_clear: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessHours {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_week_start")]
    pub week_start: WeekDay,
    #[serde(default = "default_week_end")]
    pub week_end: WeekDay,
    #[serde(default = "default_day_start")]
    pub day_start: String,
    #[serde(default = "default_day_end")]
    pub day_end: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mail {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub mailing_list: Vec<String>,
    #[serde(default)]
    pub adhoc_mailing_list: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    #[serde(default = "default_exports_dir")]
    pub exports_dir: String,
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    #[serde(default = "default_max_export_folder_mb")]
    pub max_export_folder_mb: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_report_hour")]
    pub hour: u8,
    #[serde(default = "default_report_minute")]
    pub minute: u8,
    #[serde(default)]
    pub exclude_ping: bool,
    #[serde(default)]
    pub exclude_hardware: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Simulation {
    #[serde(default)]
    pub enabled: bool,
}
