//! Service configuration (`ctg.toml`).
//!
//! ```toml
//! [filter_service]
//! base_url = "http://filter-server:5027"
//! timeout_seconds = 30
//!
//! [workers]
//! threads = "auto"
//!
//! [logging]
//! level = "info"
//! ```

use ctg_core::{CtgError, CtgResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub filter_service: FilterServiceConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External filter-evaluation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FilterServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5027".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// `"auto"` or a thread count
    #[serde(default = "default_threads")]
    pub threads: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

fn default_threads() -> String {
    "auto".to_string()
}

impl WorkerConfig {
    /// Resolved thread count; 0 means one per CPU.
    pub fn thread_count(&self) -> CtgResult<usize> {
        let value = self.threads.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Ok(0);
        }
        value.parse().map_err(|_| {
            CtgError::Configuration(format!(
                "workers.threads must be 'auto' or a number, got '{value}'"
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load a config file; a missing file yields the defaults.
pub fn load_service_config(path: &Path) -> CtgResult<ServiceConfig> {
    if !path.exists() {
        return Ok(ServiceConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&contents)
        .map_err(|err| CtgError::Configuration(format!("{}: {err}", path.display())))?;
    config.workers.thread_count()?;
    Ok(config)
}
