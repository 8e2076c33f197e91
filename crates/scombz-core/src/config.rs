use chrono::{FixedOffset, Offset, Utc};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TICK_SECS: u64 = 30; // relative-deadline refresh cadence
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 500; // login auto-submit delay
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * 60; // LMS deadlines are JST
pub const DEFAULT_DEADLINE_FORMAT: &str = "yyyy/MM/dd HH:mm";
pub const DEFAULT_ROWS_PER_PAGE: usize = 5;

/// Top-level config (scombz.toml + SCOMBZ_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScombzConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub login: LoginConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Task list behaviour that is not part of the persisted user settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Offset applied to deadlines that carry no zone, and used when
    /// rendering absolute deadlines. Minutes east of UTC.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    /// How often "now" is recomputed while watching the list.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            tick_secs: DEFAULT_TICK_SECS,
        }
    }
}

impl TasksConfig {
    /// The configured offset, falling back to JST when out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| {
            tracing::warn!(
                minutes = self.utc_offset_minutes,
                "utc offset out of range, using +09:00"
            );
            jst()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Delay before the saved credentials are submitted.
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
        }
    }
}

fn default_tick_secs() -> u64 {
    DEFAULT_TICK_SECS
}
fn default_submit_delay_ms() -> u64 {
    DEFAULT_SUBMIT_DELAY_MS
}
fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}
fn default_store_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.scombz/scombz.db", home)
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or(Utc.fix())
}

impl ScombzConfig {
    /// Load config from a TOML file with SCOMBZ_* env var overrides.
    ///
    /// Uses the explicit path when given, otherwise `~/.scombz/scombz.toml`.
    /// A missing file is fine; every section has defaults.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ScombzConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("SCOMBZ_").split("__"))
            .extract()
            .map_err(|e| crate::error::ScombzError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.scombz/scombz.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        let config = ScombzConfig::load(path.to_str()).expect("load");
        assert_eq!(config.tasks.tick_secs, DEFAULT_TICK_SECS);
        assert_eq!(config.login.submit_delay_ms, DEFAULT_SUBMIT_DELAY_MS);
        assert_eq!(config.tasks.utc_offset_minutes, 540);
    }

    #[test]
    fn toml_sections_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scombz.toml");
        std::fs::write(
            &path,
            "[store]\npath = \"/tmp/x.db\"\n\n[tasks]\ntick_secs = 5\nutc_offset_minutes = 0\n",
        )
        .expect("write");
        let config = ScombzConfig::load(path.to_str()).expect("load");
        assert_eq!(config.store.path, "/tmp/x.db");
        assert_eq!(config.tasks.tick_secs, 5);
        assert_eq!(config.tasks.offset().local_minus_utc(), 0);
        assert_eq!(config.login.submit_delay_ms, DEFAULT_SUBMIT_DELAY_MS);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_jst() {
        let cfg = TasksConfig {
            utc_offset_minutes: 100_000,
            tick_secs: 30,
        };
        assert_eq!(cfg.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn mistyped_value_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scombz.toml");
        std::fs::write(&path, "[tasks]\ntick_secs = \"often\"\n").expect("write");
        let err = ScombzConfig::load(path.to_str()).unwrap_err();
        assert!(matches!(err, crate::error::ScombzError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
