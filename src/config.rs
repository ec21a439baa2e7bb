//! Application configuration
//!
//! Loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (`~/.config/fluxboard/config.toml`)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Effective application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the admin backend API
    pub api_url: String,

    /// Seconds of inactivity before forced logout
    pub idle_limit_secs: u64,

    /// Seconds before the idle limit at which the warning fires
    pub warn_lead_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// One-shot report job configuration
    pub report: ReportConfig,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level filter when RUST_LOG is unset
    pub level: String,

    /// Also write JSON logs to rotating files
    pub file_enabled: bool,

    /// Directory for log files
    pub file_dir: PathBuf,

    /// Log file name prefix
    pub file_prefix: String,

    /// Rotation policy for file logs
    pub file_rotation: LogRotation,
}

/// File log rotation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hourly" => Some(LogRotation::Hourly),
            "daily" => Some(LogRotation::Daily),
            "never" => Some(LogRotation::Never),
            _ => None,
        }
    }
}

/// Configuration for the workspace report job.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Base URL of the workspace database service
    pub workspace_url: String,

    /// Output path for the generated HTML report
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000/v1".to_string(),
            idle_limit_secs: 300,
            warn_lead_secs: 120,
            logging: LoggingConfig {
                level: "info".to_string(),
                file_enabled: false,
                file_dir: Self::app_dir().join("logs"),
                file_prefix: "fluxboard".to_string(),
                file_rotation: LogRotation::Daily,
            },
            report: ReportConfig {
                workspace_url: "https://api.notion.com".to_string(),
                output: PathBuf::from("report.html"),
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File format
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk shape: everything optional so a partial file works.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    idle_limit_secs: Option<u64>,
    warn_lead_secs: Option<u64>,
    #[serde(default)]
    logging: FileLogging,
    #[serde(default)]
    report: FileReport,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogging {
    level: Option<String>,
    file_enabled: Option<bool>,
    file_dir: Option<PathBuf>,
    file_prefix: Option<String>,
    file_rotation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileReport {
    workspace_url: Option<String>,
    output: Option<PathBuf>,
}

impl Config {
    /// Directory holding the config file, session token, and default log dir.
    pub fn app_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fluxboard")
    }

    /// Path of the config file.
    pub fn config_path() -> PathBuf {
        Self::app_dir().join("config.toml")
    }

    /// Load configuration: defaults, then the config file, then env vars.
    pub fn load() -> Self {
        let mut config = Config::default();

        match std::fs::read_to_string(Self::config_path()) {
            Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
                Ok(file) => config.apply_file(file),
                Err(e) => {
                    eprintln!("Warning: ignoring malformed config file: {}", e);
                }
            },
            Err(_) => {} // No file: defaults stand
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.api_url {
            self.api_url = v;
        }
        if let Some(v) = file.idle_limit_secs {
            self.idle_limit_secs = v;
        }
        if let Some(v) = file.warn_lead_secs {
            self.warn_lead_secs = v;
        }
        if let Some(v) = file.logging.level {
            self.logging.level = v;
        }
        if let Some(v) = file.logging.file_enabled {
            self.logging.file_enabled = v;
        }
        if let Some(v) = file.logging.file_dir {
            self.logging.file_dir = v;
        }
        if let Some(v) = file.logging.file_prefix {
            self.logging.file_prefix = v;
        }
        if let Some(v) = file.logging.file_rotation.and_then(|s| LogRotation::parse(&s)) {
            self.logging.file_rotation = v;
        }
        if let Some(v) = file.report.workspace_url {
            self.report.workspace_url = v;
        }
        if let Some(v) = file.report.output {
            self.report.output = v;
        }
    }

    /// Apply environment overrides. Takes a lookup closure so tests can
    /// substitute a fixture map for the process environment.
    fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("FLUXBOARD_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = get("FLUXBOARD_IDLE_LIMIT_SECS").and_then(|s| s.parse().ok()) {
            self.idle_limit_secs = v;
        }
        if let Some(v) = get("FLUXBOARD_WARN_LEAD_SECS").and_then(|s| s.parse().ok()) {
            self.warn_lead_secs = v;
        }
        if let Some(v) = get("FLUXBOARD_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = get("FLUXBOARD_WORKSPACE_URL") {
            self.report.workspace_url = v;
        }
        if let Some(v) = get("FLUXBOARD_REPORT_OUTPUT") {
            self.report.output = PathBuf::from(v);
        }
    }

    pub fn idle_limit(&self) -> Duration {
        Duration::from_secs(self.idle_limit_secs)
    }

    pub fn warn_lead(&self) -> Duration {
        Duration::from_secs(self.warn_lead_secs)
    }

    /// Write a commented template on first run so the options are
    /// discoverable. Existing files are left alone.
    pub fn ensure_config_exists() {
        let path = Self::config_path();
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let _ = std::fs::write(&path, Config::default().to_toml());
    }

    /// Render the effective configuration as a TOML document.
    pub fn to_toml(&self) -> String {
        let rotation = match self.logging.file_rotation {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        };
        format!(
            r#"# Fluxboard configuration
# Environment variables (FLUXBOARD_*) override values in this file.

# Base URL of the admin backend API
api_url = "{api_url}"

# Inactivity thresholds (seconds). The warning fires warn_lead_secs
# before the forced logout at idle_limit_secs.
idle_limit_secs = {idle_limit}
warn_lead_secs = {warn_lead}

[logging]
level = "{level}"
file_enabled = {file_enabled}
file_dir = "{file_dir}"
file_prefix = "{file_prefix}"
file_rotation = "{rotation}"

[report]
# Workspace database service queried by `fluxboard report`
workspace_url = "{workspace_url}"
output = "{output}"
"#,
            api_url = self.api_url,
            idle_limit = self.idle_limit_secs,
            warn_lead = self.warn_lead_secs,
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display(),
            file_prefix = self.logging.file_prefix,
            rotation = rotation,
            workspace_url = self.report.workspace_url,
            output = self.report.output.display(),
        )
    }
}
