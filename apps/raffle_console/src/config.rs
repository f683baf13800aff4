use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use raffle_core::{Timings, DEFAULT_STORAGE_KEY};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage_path: PathBuf,
    pub storage_key: String,
    pub draw_delay_ms: u64,
    pub confetti_ms: u64,
    pub announcement_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        let timings = Timings::default();
        Self {
            storage_path: PathBuf::from("./data/raffle.json"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            draw_delay_ms: duration_ms(timings.draw_delay),
            confetti_ms: duration_ms(timings.confetti),
            announcement_ms: duration_ms(timings.announcement),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn timings(&self) -> Timings {
        Timings {
            draw_delay: Duration::from_millis(self.draw_delay_ms),
            confetti: Duration::from_millis(self.confetti_ms),
            announcement: Duration::from_millis(self.announcement_ms),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    storage_path: Option<String>,
    storage_key: Option<String>,
    draw_delay_ms: Option<u64>,
    confetti_ms: Option<u64>,
    announcement_ms: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the TOML file at `config_path` if it exists, then
/// environment variables.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => tracing::warn!(
                path = %config_path.display(),
                "ignoring unreadable config file: {err}"
            ),
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.storage_path {
        settings.storage_path = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.storage_key {
        settings.storage_key = v;
    }
    if let Some(v) = file_cfg.draw_delay_ms {
        settings.draw_delay_ms = v;
    }
    if let Some(v) = file_cfg.confetti_ms {
        settings.confetti_ms = v;
    }
    if let Some(v) = file_cfg.announcement_ms {
        settings.announcement_ms = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

/// `RAFFLE_*` names first, `APP__*` names win when both are set.
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |plain: &str, app: &str| {
        lookup(app)
            .or_else(|| lookup(plain))
            .filter(|value| !value.trim().is_empty())
    };

    if let Some(v) = read("RAFFLE_STORAGE_PATH", "APP__STORAGE_PATH") {
        settings.storage_path = PathBuf::from(v);
    }
    if let Some(v) = read("RAFFLE_STORAGE_KEY", "APP__STORAGE_KEY") {
        settings.storage_key = v;
    }
    if let Some(v) = read("RAFFLE_DRAW_DELAY_MS", "APP__DRAW_DELAY_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.draw_delay_ms = parsed;
        }
    }
    if let Some(v) = read("RAFFLE_CONFETTI_MS", "APP__CONFETTI_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.confetti_ms = parsed;
        }
    }
    if let Some(v) = read("RAFFLE_ANNOUNCEMENT_MS", "APP__ANNOUNCEMENT_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.announcement_ms = parsed;
        }
    }
    if let Some(v) = read("RAFFLE_LOG", "APP__LOG") {
        settings.log_filter = v;
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
