//! Configuration module
//!
//! Handles loading and managing configuration.

pub mod env;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::k8s::ClientSettings;
use crate::utils::LogLevel;
use env::EnvConfig;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default namespace for workloads
    pub namespace: String,

    /// Try in-cluster service-account credentials first
    pub in_cluster: bool,

    /// Explicit kubeconfig path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// How long the CLI waits for each result, in seconds
    pub timeout_secs: u64,

    /// Log level name
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            in_cluster: true,
            kubeconfig: None,
            timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = if is_yaml(path) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Write this configuration to a new file, refusing to replace one
    /// unless `force` is set
    pub fn init(&self, path: impl AsRef<Path>, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            bail!("{} already exists, pass --force to overwrite", path.display());
        }
        self.save(path)
            .with_context(|| format!("Failed to initialize {}", path.display()))
    }

    /// Layer environment overrides on top of this configuration
    pub fn apply_env(mut self, env: &EnvConfig) -> Self {
        if let Some(namespace) = &env.namespace {
            self.namespace = namespace.clone();
        }
        if let Some(in_cluster) = env.in_cluster {
            self.in_cluster = in_cluster;
        }
        if let Some(kubeconfig) = &env.kubeconfig {
            self.kubeconfig = Some(PathBuf::from(kubeconfig));
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured log level, `Info` if the name is not recognized
    pub fn log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or_default()
    }

    /// Credential chain settings for the client provider
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            in_cluster: self.in_cluster,
            kubeconfig: self.kubeconfig.clone(),
            home_dir: dirs::home_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::ConfigSource;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.namespace, "default");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level(), LogLevel::Info);
        assert!(config.in_cluster);
    }

    #[test]
    fn test_yaml_round_trip_and_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scaler.yaml");
        std::fs::write(&path, "namespace: agents\ntimeout_secs: 5\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.namespace, "agents");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.in_cluster);

        let saved = dir.path().join("saved.json");
        config.save(&saved).unwrap();
        assert_eq!(AppConfig::load(&saved).unwrap(), config);
    }

    #[test]
    fn test_init_writes_effective_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scaler.yaml");
        let env = EnvConfig {
            namespace: Some("agents".to_string()),
            timeout: Some(10),
            ..Default::default()
        };
        let config = AppConfig::default().apply_env(&env);

        config.init(&path, false).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("namespace: agents"));
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(AppConfig::default().init(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        AppConfig::default().init(&path, true).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_apply_env() {
        let env = EnvConfig {
            namespace: Some("agents".to_string()),
            in_cluster: Some(false),
            kubeconfig: Some("/etc/kube/config".to_string()),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let config = AppConfig::default().apply_env(&env);

        assert_eq!(config.namespace, "agents");
        assert!(!config.in_cluster);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_level(), LogLevel::Debug);

        let chain = config.client_settings().chain();
        assert_eq!(
            chain.first(),
            Some(&ConfigSource::Kubeconfig(PathBuf::from("/etc/kube/config")))
        );
        assert!(!chain.contains(&ConfigSource::InCluster));
    }
}
