use chrono::NaiveTime;
use thiserror::Error;

use super::schema::{BusinessHours, Config};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_name must not be empty".to_string(),
            ));
        }
        if self.site_name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "site_name must not contain path separators".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.ping.url).map_err(|error| {
            ConfigError::Validation(format!("ping.url is not a valid URL: {}", error))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "ping.url must use http or https".to_string(),
            ));
        }
        if self.ping.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "ping.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.ping.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "ping.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.hardware.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "hardware.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.hardware.disk_mount_point.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hardware.disk_mount_point must not be empty".to_string(),
            ));
        }

        validate_percentage("thresholds.cpu", self.thresholds.cpu)?;
        validate_percentage("thresholds.ram", self.thresholds.ram)?;
        validate_percentage("thresholds.disk", self.thresholds.disk)?;
        if let Some(load) = self.thresholds.load_avg_10m
            && (load.is_nan() || load.is_sign_negative())
        {
            return Err(ConfigError::Validation(
                "thresholds.load_avg_10m must be non-negative".to_string(),
            ));
        }

        if self.alarm.max_triggers == 0 {
            return Err(ConfigError::Validation(
                "alarm.max_triggers must be greater than 0".to_string(),
            ));
        }
        if self.alarm.window_size == 0 {
            return Err(ConfigError::Validation(
                "alarm.window_size must be greater than 0".to_string(),
            ));
        }
        if self.alarm.hysteresis.is_nan() || self.alarm.hysteresis.is_sign_negative() {
            return Err(ConfigError::Validation(
                "alarm.hysteresis must be non-negative".to_string(),
            ));
        }

        self.business_hours.validate()?;

        if self.mail.enabled {
            if self.mail.smtp_server.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "mail.smtp_server must not be empty when mail.enabled is true".to_string(),
                ));
            }
            if self.mail.sender.trim().is_empty() || self.mail.password.is_empty() {
                return Err(ConfigError::Validation(
                    "mail.sender and mail.password are required when mail.enabled is true"
                        .to_string(),
                ));
            }
        }

        for (name, value) in [
            ("storage.results_dir", &self.storage.results_dir),
            ("storage.exports_dir", &self.storage.exports_dir),
            ("storage.state_dir", &self.storage.state_dir),
            ("logging.dir", &self.logging.dir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{} must not be empty", name)));
            }
        }
        if self.storage.max_export_folder_mb == 0 {
            return Err(ConfigError::Validation(
                "storage.max_export_folder_mb must be greater than 0".to_string(),
            ));
        }

        if self.report.hour > 23 {
            return Err(ConfigError::Validation(
                "report.hour must be between 0 and 23".to_string(),
            ));
        }
        if self.report.minute > 59 {
            return Err(ConfigError::Validation(
                "report.minute must be between 0 and 59".to_string(),
            ));
        }

        if self.logging.max_file_size_bytes == 0 {
            return Err(ConfigError::Validation(
                "logging.max_file_size_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl BusinessHours {
    pub fn start_time(&self) -> Result<NaiveTime, ConfigError> {
        parse_clock("business_hours.day_start", &self.day_start)
    }

    pub fn end_time(&self) -> Result<NaiveTime, ConfigError> {
        parse_clock("business_hours.day_end", &self.day_end)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let start = self.start_time()?;
        let end = self.end_time()?;
        if start > end {
            return Err(ConfigError::Validation(
                "business_hours.day_start must not be later than business_hours.day_end"
                    .to_string(),
            ));
        }

        // Week ranges are compared by ordinal, so FRIDAY..MONDAY cannot be expressed.
        if (self.week_start as u8) > (self.week_end as u8) {
            return Err(ConfigError::Validation(
                "business_hours.week_start must not come after week_end (wrapping weeks are unsupported)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_clock(field: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        ConfigError::Validation(format!("{} must be a HH:MM time, got {:?}", field, value))
    })
}

fn validate_percentage(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}
