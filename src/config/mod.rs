mod defaults;
mod io;
mod schema;
mod validate;

pub use io::load_config;
#[cfg(test)]
pub(crate) use io::parse_config;
#[allow(unused_imports)]
pub use schema::{
    Alarm, BusinessHours, Config, Hardware, Logging, Mail, Ping, Report, Simulation, Storage,
    Thresholds, WeekDay,
};
pub use validate::ConfigError;
