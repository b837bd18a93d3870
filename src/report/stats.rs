use crate::monitor::{Dimension, HardwareSample, PingSample};

/// Averages over the samples that went into one report. `None` means no samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportStats {
    pub ping_samples: usize,
    pub ping_success_percent: Option<f64>,
    pub hardware_samples: usize,
    pub cpu_avg: Option<f64>,
    pub ram_avg: Option<f64>,
    pub disk_avg: Option<f64>,
    pub load_10m_avg: Option<f64>,
}

pub fn compute_stats(ping: &[PingSample], hardware: &[HardwareSample]) -> ReportStats {
    let successes = ping.iter().filter(|sample| !sample.is_failure()).count();
    let ping_success_percent =
        (!ping.is_empty()).then(|| round_2(successes as f64 / ping.len() as f64 * 100.0));

    let average = |dimension: Dimension| {
        let values = hardware
            .iter()
            .filter_map(|sample| sample.value(dimension))
            .collect::<Vec<_>>();
        (!values.is_empty()).then(|| round_2(values.iter().sum::<f64>() / values.len() as f64))
    };

    ReportStats {
        ping_samples: ping.len(),
        ping_success_percent,
        hardware_samples: hardware.len(),
        cpu_avg: average(Dimension::CpuUsage),
        ram_avg: average(Dimension::RamUsage),
        disk_avg: average(Dimension::DiskUsage),
        load_10m_avg: average(Dimension::LoadAvg10m),
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::compute_stats;
    use crate::monitor::{PingSample, PingStatus, hardware_sample};

    fn ping(status: PingStatus) -> PingSample {
        PingSample {
            timestamp: 0.0,
            status,
            attempts: 1,
            status_code: None,
            error: None,
        }
    }

    #[test]
    fn averages_each_domain() {
        let pings = [
            ping(PingStatus::Success),
            ping(PingStatus::Success),
            ping(PingStatus::Failure),
        ];
        let hardware = [
            hardware_sample(10.0, 40.0, 50.0, 50.0),
            hardware_sample(30.0, 60.0, 25.0, 75.0),
        ];

        let stats = compute_stats(&pings, &hardware);
        assert_eq!(stats.ping_samples, 3);
        assert_eq!(stats.ping_success_percent, Some(66.67));
        assert_eq!(stats.cpu_avg, Some(20.0));
        assert_eq!(stats.ram_avg, Some(50.0));
        assert_eq!(stats.disk_avg, Some(37.5));
        assert_eq!(stats.load_10m_avg, Some(0.5));
    }

    #[test]
    fn empty_inputs_have_no_averages() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats.ping_success_percent, None);
        assert_eq!(stats.cpu_avg, None);
        assert_eq!(stats.hardware_samples, 0);
    }
}
