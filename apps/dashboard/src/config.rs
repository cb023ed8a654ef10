use std::{fs, path::Path, time::Duration};

use client_core::CoreConfig;
use serde::Deserialize;
use tracing::warn;

pub const CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_url: String,
    pub request_timeout_secs: u64,
    pub event_buffer: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000".into(),
            request_timeout_secs: 10,
            event_buffer: 64,
        }
    }
}

impl Settings {
    /// Zero values are raised to 1.
    pub fn core_config(&self) -> CoreConfig {
        if self.request_timeout_secs == 0 {
            warn!("request_timeout_secs must be at least 1; using 1");
        }
        if self.event_buffer == 0 {
            warn!("event_buffer must be at least 1; using 1");
        }
        CoreConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            event_buffer: self.event_buffer.max(1),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    service_url: Option<String>,
    request_timeout_secs: Option<u64>,
    event_buffer: Option<usize>,
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_from(path, |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.service_url {
                    settings.service_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.event_buffer {
                    settings.event_buffer = v;
                }
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable config file"),
        }
    }

    if let Some(v) = env("LEAGUE_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = env("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => warn!(
                value = %v,
                "APP__REQUEST_TIMEOUT_SECS is not a number; keeping {}",
                settings.request_timeout_secs
            ),
        }
    }
    if let Some(v) = env("APP__EVENT_BUFFER") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.event_buffer = parsed,
            Err(_) => warn!(
                value = %v,
                "APP__EVENT_BUFFER is not a number; keeping {}",
                settings.event_buffer
            ),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
