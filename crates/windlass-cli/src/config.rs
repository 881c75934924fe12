//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Config file (`--config` path, or the platform config dir)
//! 3. Built-in defaults (always present)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default answers for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
    /// GitHub publishing settings.
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub template: String,
    pub author_name: String,
    pub author_email: String,
    pub python_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding copier template sources.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Organization repositories are created under by default.
    pub org: Option<String>,
    /// Create repositories as private by default.
    pub private: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            template: "python-modern".into(),
            author_name: "Developer".into(),
            author_email: "dev@example.com".into(),
            python_version: "3.12".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config_file`, or the default location.
    ///
    /// A missing file is not an error: defaults apply.  A file that exists
    /// but fails to parse *is* an error, since silently ignoring a typo'd
    /// config would be worse.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let path = match config_file {
            Some(p) => p.clone(),
            None => Self::config_path(),
        };

        if !path.is_file() {
            // Only the default location may be absent; an explicit --config
            // that doesn't exist is a user mistake.
            if config_file.is_some() {
                return Err(CliError::ConfigError {
                    message: format!("config file not found: {}", path.display()),
                    source: None,
                });
            }
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|e| CliError::ConfigError {
            message: format!("could not read {}", path.display()),
            source: Some(Box::new(e)),
        })?;

        toml::from_str(&raw).map_err(|e| CliError::ConfigError {
            message: format!("could not parse {}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.windlass.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "windlass", "windlass")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".windlass.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_is_the_base() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.template, "python-modern");
        assert_eq!(cfg.defaults.python_version, "3.12");
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn load_parses_a_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\nauthor_name = \"Jo Bloggs\"\n\n[github]\norg = \"acme\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.author_name, "Jo Bloggs");
        // Unset sections and keys keep their defaults.
        assert_eq!(cfg.defaults.template, "python-modern");
        assert_eq!(cfg.github.org.as_deref(), Some("acme"));
        assert!(!cfg.github.private);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = AppConfig::load(Some(&PathBuf::from("/nonexistent/windlass.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "defaults = not toml [").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn config_path_is_nonempty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
