//! File-based config discovery for CLI use
//!
//! Finds a kiln configuration file and layers it between the built-in
//! defaults and `KILN_` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized, Toml};
use serde_json::Value;

use crate::config::ReporterConfig;
use crate::error::{ConfigError, Result};

/// Prefix of environment variables that override file settings.
///
/// Nested keys use a double underscore: `KILN_SETTINGS__LOG_LEVEL=debug`.
pub const ENV_PREFIX: &str = "KILN_";

/// File-based configuration discovery
///
/// Priority: environment variables > config file > defaults.
///
/// # Example
///
/// ```no_run
/// use kiln_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// println!("{:?}", config.watchdog_interval());
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: kiln.toml
    /// 2. package.json (kiln field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join("kiln.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("kiln").is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load the effective configuration.
    ///
    /// A missing config file is not an error: defaults and environment
    /// variables still apply.
    pub fn load(&self) -> Result<ReporterConfig> {
        let file = self.find();
        match &file {
            Some(path) => tracing::debug!("loading kiln config from {}", path.display()),
            None => tracing::debug!("no kiln config found in {}", self.root.display()),
        }
        extract(self.figment(file.as_deref())?)
    }

    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist.
    pub fn load_file(&self, path: &Path) -> Result<ReporterConfig> {
        if !path.exists() {
            return Err(ConfigError::NotFound);
        }
        extract(self.figment(Some(path))?)
    }

    fn figment(&self, file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(ReporterConfig::default()));

        if let Some(path) = file {
            figment = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
                figment.merge(Json::string(&read_package_json_field(path)?))
            } else {
                figment.merge(Toml::file(path))
            };
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}

fn extract(figment: Figment) -> Result<ReporterConfig> {
    let config: ReporterConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

fn read_package_json_field(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: Some(format!("Invalid JSON: {}", e)),
    })?;

    match parsed.get("kiln") {
        Some(value) if value.is_object() => Ok(value.to_string()),
        Some(_) => Err(ConfigError::InvalidValue {
            field: "kiln".to_string(),
            hint: Some("The 'kiln' field must be an object".to_string()),
        }),
        None => Err(ConfigError::InvalidValue {
            field: "kiln".to_string(),
            hint: Some("Add a 'kiln' field to your package.json".to_string()),
        }),
    }
}

/// Discover and load config from the current directory (convenience function)
pub fn discover() -> Result<ReporterConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(root).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn find_prefers_toml_over_package_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kiln.toml"), "progress = false\n").unwrap();
        fs::write(dir.path().join("package.json"), r#"{"kiln": {}}"#).unwrap();

        let found = ConfigDiscovery::new(dir.path()).find().unwrap();
        assert_eq!(found, dir.path().join("kiln.toml"));
    }

    #[test]
    fn find_skips_package_json_with_null_field() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"kiln": null}"#).unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn load_file_reports_missing_path() {
        let dir = TempDir::new().unwrap();
        let err = ConfigDiscovery::new(dir.path())
            .load_file(&dir.path().join("missing.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound));
    }

    #[test]
    fn package_json_field_must_be_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"kiln": 3}"#).unwrap();

        let err = read_package_json_field(&path).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }
}
