//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `panelhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Where user settings are stored.
    pub settings: SettingsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Schedule timer settings.
    pub schedule: ScheduleConfig,
    /// Ambilight effect settings.
    pub ambilight: AmbilightConfig,
    /// Simulated panels.
    pub virtual_devices: VirtualDevicesConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// JSON settings file.
    pub path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between two evaluation rounds.
    pub interval_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AmbilightConfig {
    /// Milliseconds between two pushed colours.
    pub refresh_millis: u64,
    /// Degrees the demo colour sampler advances per sample.
    pub hue_step: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VirtualDevicesConfig {
    /// Effects every simulated panel knows.
    pub effects: Vec<String>,
}

impl Config {
    /// Load configuration from `panelhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("panelhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PANELHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PANELHUB_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("PANELHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("PANELHUB_SETTINGS") {
            self.settings.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PANELHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "schedule interval must be non-zero".to_string(),
            ));
        }
        if self.ambilight.refresh_millis == 0 {
            return Err(ConfigError::Validation(
                "ambilight refresh must be non-zero".to_string(),
            ));
        }
        if self.virtual_devices.effects.is_empty() {
            return Err(ConfigError::Validation(
                "virtual devices need at least one effect".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_secs)
    }

    #[must_use]
    pub fn ambilight_refresh(&self) -> Duration {
        Duration::from_millis(self.ambilight.refresh_millis)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("panelhub-settings.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "panelhubd=info,panelhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl Default for AmbilightConfig {
    fn default() -> Self {
        Self {
            refresh_millis: 200,
            hue_step: 3,
        }
    }
}

impl Default for VirtualDevicesConfig {
    fn default() -> Self {
        Self {
            effects: panelhub_adapter_virtual::DEFAULT_EFFECTS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.settings.path, PathBuf::from("panelhub-settings.json"));
        assert_eq!(config.schedule_interval(), Duration::from_secs(60));
        assert_eq!(config.ambilight_refresh(), Duration::from_millis(200));
        assert!(config.virtual_devices.effects.contains(&"Rainbow".to_string()));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [settings]
            path = '/var/lib/panelhub/settings.json'

            [logging]
            filter = 'debug'

            [schedule]
            interval_secs = 30

            [ambilight]
            refresh_millis = 100
            hue_step = 10

            [virtual_devices]
            effects = ['Aurora', 'Sunrise']
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.settings.path,
            PathBuf::from("/var/lib/panelhub/settings.json")
        );
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.schedule.interval_secs, 30);
        assert_eq!(config.ambilight.refresh_millis, 100);
        assert_eq!(config.ambilight.hue_step, 10);
        assert_eq!(config.virtual_devices.effects, vec!["Aurora", "Sunrise"]);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_schedule_interval() {
        let mut config = Config::default();
        config.schedule.interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_ambilight_refresh() {
        let mut config = Config::default();
        config.ambilight.refresh_millis = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_effect_list() {
        let mut config = Config::default();
        config.virtual_devices.effects.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [schedule]
            interval_secs = 5
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.schedule.interval_secs, 5);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.ambilight.refresh_millis, 200);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
