mod business_hours;
mod dimension;
mod evaluator;
mod probe;
mod provider;
mod recorder;
mod sample;
mod service;
mod state;

pub use business_hours::BusinessWindow;
pub use dimension::{Dimension, MetricSample};
pub use probe::HttpProber;
pub use provider::ActiveMetricsProvider;
pub use recorder::{latest_file, read_all, tail};
pub use sample::{HardwareSample, PingSample};
pub use service::{CycleOutcome, run_hardware_cycle, run_ping_cycle};
pub use state::{HardwareAlertState, PingAlertState, seed as seed_state};

#[cfg(test)]
pub(crate) use provider::hardware_sample;
#[cfg(test)]
pub(crate) use recorder::record;
#[cfg(test)]
pub(crate) use sample::PingStatus;
