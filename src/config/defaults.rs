use super::schema::{
    Alarm, BusinessHours, Hardware, Logging, Mail, Report, Storage, Thresholds, WeekDay,
};

pub(super) fn default_enabled() -> bool {
    true
}

pub(super) fn default_ping_interval_secs() -> u64 {
    60
}

pub(super) fn default_max_retry_attempts() -> u32 {
    4
}

pub(super) fn default_retry_backoff_secs() -> u64 {
    5
}

pub(super) fn default_request_timeout_secs() -> u64 {
    10
}

pub(super) fn default_hardware_interval_secs() -> u64 {
    60
}

pub(super) fn default_disk_mount_point() -> String {
    "/".to_string()
}

pub(super) fn default_threshold_percent() -> f64 {
    80.0
}

pub(super) fn default_max_triggers() -> u32 {
    3
}

pub(super) fn default_window_size() -> usize {
    10
}

pub(super) fn default_week_start() -> WeekDay {
    WeekDay::Monday
}

pub(super) fn default_week_end() -> WeekDay {
    WeekDay::Friday
}

pub(super) fn default_day_start() -> String {
    "08:00".to_string()
}

pub(super) fn default_day_end() -> String {
    "17:00".to_string()
}

pub(super) fn default_smtp_server() -> String {
    "smtp.office365.com".to_string()
}

pub(super) fn default_smtp_port() -> u16 {
    587
}

pub(super) fn default_results_dir() -> String {
    "results".to_string()
}

pub(super) fn default_exports_dir() -> String {
    "exports/images".to_string()
}

pub(super) fn default_state_dir() -> String {
    "state".to_string()
}

pub(super) fn default_max_export_folder_mb() -> u64 {
    1000
}

pub(super) fn default_report_hour() -> u8 {
    17
}

pub(super) fn default_report_minute() -> u8 {
    30
}

pub(super) fn default_log_dir() -> String {
    "logs".to_string()
}

pub(super) fn default_log_max_file_size_bytes() -> u64 {
    10 * 1024 * 1024
}

pub(super) fn default_log_max_files() -> usize {
    5
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_hardware_interval_secs(),
            disk_mount_point: default_disk_mount_point(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: default_threshold_percent(),
            ram: default_threshold_percent(),
            disk: default_threshold_percent(),
            load_avg_10m: None,
        }
    }
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            max_triggers: default_max_triggers(),
            window_size: default_window_size(),
            hysteresis: 0.0,
            notify_on_clear: false,
        }
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            week_start: default_week_start(),
            week_end: default_week_end(),
            day_start: default_day_start(),
            day_end: default_day_end(),
        }
    }
}

impl Default for Mail {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            sender: String::new(),
            password: String::new(),
            mailing_list: Vec::new(),
            adhoc_mailing_list: Vec::new(),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            exports_dir: default_exports_dir(),
            state_dir: default_state_dir(),
            max_export_folder_mb: default_max_export_folder_mb(),
        }
    }
}

impl Default for Report {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            hour: default_report_hour(),
            minute: default_report_minute(),
            exclude_ping: false,
            exclude_hardware: false,
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            max_file_size_bytes: default_log_max_file_size_bytes(),
            max_files: default_log_max_files(),
        }
    }
}
