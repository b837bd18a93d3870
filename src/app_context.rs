use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::monitor::BusinessWindow;
use crate::paths::{SitePaths, paths_from_config};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub paths: SitePaths,
    pub business_window: BusinessWindow,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let business_window = BusinessWindow::from_config(&config.business_hours)?;
        let paths = paths_from_config(&config);
        Ok(Self {
            config: Arc::new(config),
            paths,
            business_window,
        })
    }
}

#[cfg(test)]
impl AppContext {
    /// Context rooted in `root` with mail switched off. `alarm` is the body of the `[alarm]` table.
    pub(crate) fn for_tests(root: &std::path::Path, alarm: &str) -> Self {
        let root = root.display();
        let raw = format!(
            r#"
site_name = "acme"

[ping]
url = "https://acme.example.com/health"
max_retry_attempts = 1
retry_backoff_secs = 0

[alarm]
{alarm}

[mail]
enabled = false
mailing_list = ["ops@acme.example.com"]
adhoc_mailing_list = ["oncall@acme.example.com"]

[storage]
results_dir = '{root}/results'
exports_dir = '{root}/exports/images'
state_dir = '{root}/state'

[logging]
dir = '{root}/logs'
"#
        );
        let config = crate::config::parse_config(&raw, "test.toml").expect("test config");
        let context = Self::new(config).expect("test context");
        crate::paths::ensure_site_dirs(&context.paths).expect("site dirs");
        context
    }
}
