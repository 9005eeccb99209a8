//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading service
//! configuration from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollPolicy, PolicyFile, ServiceConfig};

/// Loads and provides access to service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/edutack/
/// ├── service.yaml   # Server, storage, email and branding settings
/// ├── policy.yaml    # Payroll policy constants (optional)
/// └── seed.yaml      # Staff and attendance seed data (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use edutack_payroll::config::ConfigLoader;
///
/// let config = ConfigLoader::load("./config/edutack").unwrap();
/// println!("Binding to {}", config.service().server.bind_address);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
    service: ServiceConfig,
    policy: PayrollPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// `service.yaml` is required. `policy.yaml` is optional; when it is
    /// absent the default payroll policy applies.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref().to_path_buf();

        let service = Self::load_yaml::<ServiceConfig>(&dir.join("service.yaml"))?;

        let policy_path = dir.join("policy.yaml");
        let policy = if policy_path.exists() {
            Self::load_yaml::<PolicyFile>(&policy_path)?.policy
        } else {
            PayrollPolicy::default()
        };

        Ok(Self {
            dir,
            service,
            policy,
        })
    }

    /// Loads and parses a YAML file.
    pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// Returns the seed file path, resolved against the config directory.
    pub fn seed_path(&self) -> Option<PathBuf> {
        self.service.seed_file.as_ref().map(|p| self.dir.join(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/edutack"
    }

    #[test]
    fn test_load_bundled_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.service().storage.payslip_dir, "payslips");
        assert_eq!(loader.policy().perfect_attendance_bonus, Decimal::new(1500, 0));
        assert_eq!(loader.policy().currency_prefix, "Rs.");
    }

    #[test]
    fn test_seed_path_is_relative_to_config_dir() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let seed = loader.seed_path().unwrap();
        assert!(seed.starts_with(config_path()));
        assert!(seed.ends_with("seed.yaml"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("service.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_policy_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("service.yaml"), "server:\n  bind_address: \"0.0.0.0:8080\"\n").unwrap();

        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.service().server.bind_address, "0.0.0.0:8080");
        assert_eq!(loader.policy(), &PayrollPolicy::default());
        assert!(loader.seed_path().is_none());
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("service.yaml"), "server: [unclosed").unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("service.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
