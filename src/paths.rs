use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};

use crate::config::Config;
use crate::monitor::Dimension;

#[derive(Debug, Clone)]
pub struct SitePaths {
    pub(crate) ping_results_dir: PathBuf,
    pub(crate) hardware_results_dir: PathBuf,
    pub(crate) exports_dir: PathBuf,
    pub(crate) state_dir: PathBuf,
}

pub fn paths_from_config(config: &Config) -> SitePaths {
    let results = PathBuf::from(&config.storage.results_dir).join(&config.site_name);
    SitePaths {
        ping_results_dir: results.join("ping_metrics"),
        hardware_results_dir: results.join("hardware_metrics"),
        exports_dir: PathBuf::from(&config.storage.exports_dir).join(&config.site_name),
        state_dir: PathBuf::from(&config.storage.state_dir).join(&config.site_name),
    }
}

pub fn ensure_site_dirs(paths: &SitePaths) -> Result<(), std::io::Error> {
    fs::create_dir_all(&paths.ping_results_dir)?;
    fs::create_dir_all(&paths.hardware_results_dir)?;
    fs::create_dir_all(&paths.exports_dir)?;
    fs::create_dir_all(&paths.state_dir)?;
    Ok(())
}

impl SitePaths {
    pub fn ping_results_file(&self, day: NaiveDate) -> PathBuf {
        self.ping_results_dir
            .join(format!("ping_results_{}.json", day.format("%Y_%m_%d")))
    }

    pub fn hardware_results_file(&self, day: NaiveDate) -> PathBuf {
        self.hardware_results_dir
            .join(format!("hardware_metrics_{}.json", day.format("%Y_%m_%d")))
    }

    pub fn ping_state_file(&self) -> PathBuf {
        self.state_dir.join("ping_alert_state.json")
    }

    pub fn hardware_state_file(&self) -> PathBuf {
        self.state_dir.join("hardware_alert_state.json")
    }

    pub fn exports_dir(&self) -> &PathBuf {
        &self.exports_dir
    }

    /// Chart files sort chronologically by name within their folder.
    pub fn chart_file(&self, dimension: Dimension, now: DateTime<Local>) -> PathBuf {
        let folder = match dimension {
            Dimension::PingStatus => self.exports_dir.join("ping_metrics"),
            hardware => self.exports_dir.join("hardware_metrics").join(hardware.key()),
        };
        folder.join(format!(
            "{}_{}_graph.png",
            now.format("%Y_%m_%d_%H_%M_%S"),
            dimension.key()
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, TimeZone};

    use super::SitePaths;
    use crate::monitor::Dimension;

    fn paths() -> SitePaths {
        SitePaths {
            ping_results_dir: "results/acme/ping_metrics".into(),
            hardware_results_dir: "results/acme/hardware_metrics".into(),
            exports_dir: "exports/images/acme".into(),
            state_dir: "state/acme".into(),
        }
    }

    #[test]
    fn daily_files_carry_the_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).expect("valid date");
        let paths = paths();
        assert!(
            paths
                .ping_results_file(day)
                .ends_with("ping_metrics/ping_results_2024_03_07.json")
        );
        assert!(
            paths
                .hardware_results_file(day)
                .ends_with("hardware_metrics/hardware_metrics_2024_03_07.json")
        );
    }

    #[test]
    fn hardware_charts_are_grouped_by_dimension() {
        let now = Local
            .with_ymd_and_hms(2024, 3, 7, 9, 15, 0)
            .single()
            .expect("unambiguous local time");
        let path = paths().chart_file(Dimension::CpuUsage, now);
        assert!(path.ends_with("hardware_metrics/cpu_usage/2024_03_07_09_15_00_cpu_usage_graph.png"));

        let ping = paths().chart_file(Dimension::PingStatus, now);
        assert!(ping.ends_with("ping_metrics/2024_03_07_09_15_00_ping_status_graph.png"));
    }
}
