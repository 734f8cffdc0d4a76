//! Application configuration.
//!
//! Read from `<config dir>/rc-design/config.toml` (or `--config <file>`).
//! Every field has a default so the application works without a file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use calc_core::menu::PageConfig;

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub clauses: ClausesConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClausesConfig {
    /// Code of practice as PDF, extracted text or JSON index
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Most hits shown for one query
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ClausesConfig {
    fn default() -> Self {
        Self {
            source: None,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    50
}

/// Title block details printed on PDF reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub engineer: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            engineer: String::new(),
            job_id: String::new(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,
    /// Log file used while the terminal UI is running
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rc-design")
        .join("config.toml")
}

/// Load `path`, or the default location when `None`.
///
/// A missing file at the default location yields the defaults; a missing
/// file named explicitly is an error.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path(), false),
    };
    if !explicit && !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    Ok(toml::from_str(contents)?)
}

pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let contents = to_toml(config)?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

pub fn to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::menu::{LayoutMode, DEFAULT_PAGE_TITLE};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page.page_title, DEFAULT_PAGE_TITLE);
        assert_eq!(config.clauses.limit, 50);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.page.layout, LayoutMode::Wide);
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
[page]
layout = "centered"

[clauses]
source = "data/cop2013.json"

[report]
engineer = "A. Engineer"
"#,
        )
        .unwrap();
        assert_eq!(config.page.layout, LayoutMode::Centered);
        assert_eq!(config.page.page_title, DEFAULT_PAGE_TITLE);
        assert_eq!(config.clauses.source, Some(PathBuf::from("data/cop2013.json")));
        assert_eq!(config.clauses.limit, 50);
        assert_eq!(config.report.engineer, "A. Engineer");
        assert_eq!(config.report.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        assert!(parse_config("[page]\nlayout = \"sideways\"\n").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = AppConfig::default();
        config.report.job_id = "24-017".to_string();
        config.logging.file = Some(PathBuf::from("/tmp/rc-design.log"));
        let text = to_toml(&config).unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(load_config(Some(Path::new("/nonexistent/rc-design.toml"))).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("rc_design_config_{}.toml", std::process::id()));
        let mut config = AppConfig::default();
        config.page.page_title = "Tower B".to_string();
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), config);
        let _ = std::fs::remove_file(path);
    }
}
