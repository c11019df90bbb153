//! Configuration management for EduManage.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Error, Result, Role};
use crate::workflow::FailurePolicy;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "EDUMANAGE_CONFIG";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// UI/TUI settings
    pub ui: UiConfig,

    /// Workflow panel settings
    pub workflow: WorkflowConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Skip the login form and open this role's dashboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_role: Option<Role>,

    /// Simulated sign-in latency in milliseconds
    pub login_delay_ms: u64,
}

/// UI/TUI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Start with the sidebar collapsed
    pub sidebar_collapsed: bool,

    /// Show the quick actions / recent alerts panel
    pub show_quick_actions: bool,

    /// Override the role palette with a named terminal theme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
}

/// Workflow panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Initial research query
    pub query: String,

    /// Simulated per-step latency in milliseconds
    pub step_delay_ms: u64,

    /// What to do when a step fails
    pub failure_policy: FailurePolicy,

    /// Where session reports are written (defaults to the data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (overridden by --verbose)
    pub level: String,

    /// Log file used while the TUI owns the terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `$EDUMANAGE_CONFIG`
    /// 2. `.edumanage.toml` in current directory
    /// 3. `~/.config/edumanage/config.toml`
    /// 4. Falls back to defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Self::load_from_file(Path::new(&path));
            }
        }

        let local_config = PathBuf::from(".edumanage.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::global_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> Result<PathBuf> {
        let dir = Self::config_dir().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine config directory",
            ))
        })?;
        std::fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
        })?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Path of the global config file.
    pub fn global_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("edumanage"))
    }

    /// Get the data directory path (exports, logs).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("edumanage"))
    }

    /// Directory workflow reports are exported to.
    pub fn export_dir(&self) -> PathBuf {
        self.workflow
            .export_dir
            .clone()
            .or_else(Self::data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl GeneralConfig {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

impl WorkflowConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { default_role: None, login_delay_ms: 1500 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { sidebar_collapsed: false, show_quick_actions: true, theme: None, tick_rate_ms: 100 }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            query: crate::workflow::DEFAULT_QUERY.to_string(),
            step_delay_ms: 2000,
            failure_policy: FailurePolicy::Halt,
            export_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), file: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.general.default_role.is_none());
        assert_eq!(config.general.login_delay_ms, 1500);
        assert_eq!(config.workflow.step_delay(), Duration::from_secs(2));
        assert_eq!(config.workflow.failure_policy, FailurePolicy::Halt);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[workflow]"));
        assert!(toml_str.contains("failure_policy = \"halt\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            default_role = "Parent"
            login_delay_ms = 0

            [ui]
            sidebar_collapsed = true

            [workflow]
            step_delay_ms = 10
            failure_policy = "continue"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_role, Some(Role::Parent));
        assert!(config.ui.sidebar_collapsed);
        assert!(config.ui.show_quick_actions);
        assert_eq!(config.workflow.step_delay_ms, 10);
        assert_eq!(config.workflow.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_tick_rate_floor() {
        let ui = UiConfig { tick_rate_ms: 0, ..UiConfig::default() };
        assert_eq!(ui.tick_rate(), Duration::from_millis(10));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_from_env_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[general]\ndefault_role = \"Admin\"\n").unwrap();

        std::env::set_var(CONFIG_ENV, &path);
        let loaded = Config::load();
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(loaded.unwrap().general.default_role, Some(Role::Admin));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[general\n").unwrap();

        std::env::set_var(CONFIG_ENV, &path);
        let loaded = Config::load();
        std::env::remove_var(CONFIG_ENV);

        assert!(matches!(loaded, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_export_dir_override() {
        let mut config = Config::default();
        config.workflow.export_dir = Some(PathBuf::from("/tmp/reports"));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/reports"));
    }
}
