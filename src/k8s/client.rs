//! Kubernetes client provider
//!
//! Builds one `kube::Client` on first use from an ordered credential chain
//! and hands out clones of it afterwards.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::fmt;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{Result, ScalerError};

/// One stage of the credential chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Service-account credentials mounted into the pod
    InCluster,
    /// A kubeconfig file on disk
    Kubeconfig(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::InCluster => write!(f, "in-cluster"),
            ConfigSource::Kubeconfig(path) => write!(f, "{}", path.display()),
        }
    }
}

impl ConfigSource {
    async fn load(&self) -> std::result::Result<Config, String> {
        match self {
            ConfigSource::InCluster => Config::incluster().map_err(|e| e.to_string()),
            ConfigSource::Kubeconfig(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| e.to_string())?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|e| e.to_string())
            }
        }
    }
}

/// Where to look for cluster credentials
#[derive(Clone, Debug, Default)]
pub struct ClientSettings {
    /// Try service-account credentials first
    pub in_cluster: bool,
    /// Explicit kubeconfig path, usually from `KUBECONFIG`
    pub kubeconfig: Option<PathBuf>,
    /// Home directory holding `.kube/config`
    pub home_dir: Option<PathBuf>,
}

impl ClientSettings {
    /// Settings from the process environment
    pub fn from_env() -> Self {
        Self {
            in_cluster: true,
            kubeconfig: std::env::var_os("KUBECONFIG")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            home_dir: dirs::home_dir(),
        }
    }

    pub fn with_in_cluster(mut self, in_cluster: bool) -> Self {
        self.in_cluster = in_cluster;
        self
    }

    pub fn with_kubeconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.kubeconfig = Some(path.into());
        self
    }

    pub fn with_home_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(path.into());
        self
    }

    /// Ordered stages; each one is tried only if the previous failed
    pub fn chain(&self) -> Vec<ConfigSource> {
        let mut chain = Vec::with_capacity(3);
        if self.in_cluster {
            chain.push(ConfigSource::InCluster);
        }
        if let Some(path) = &self.kubeconfig {
            chain.push(ConfigSource::Kubeconfig(path.clone()));
        }
        if let Some(home) = &self.home_dir {
            chain.push(ConfigSource::Kubeconfig(home.join(".kube").join("config")));
        }
        chain
    }
}

/// Lazily initialized, shared Kubernetes client
///
/// A successful initialization is cached for the lifetime of the provider.
/// A failed one is not: the next `acquire` walks the whole chain again.
pub struct ClientProvider {
    settings: ClientSettings,
    client: OnceCell<Client>,
}

impl ClientProvider {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    /// Whether a client has been cached
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Get the shared client, building it on first success
    pub async fn acquire(&self) -> Result<Client> {
        self.client
            .get_or_try_init(|| async {
                let config = self.load_config().await?;
                Client::try_from(config).map_err(ScalerError::Api)
            })
            .await
            .cloned()
    }

    async fn load_config(&self) -> Result<Config> {
        let mut attempts = Vec::new();

        for source in self.settings.chain() {
            match source.load().await {
                Ok(config) => {
                    info!("Using Kubernetes config from {}", source);
                    return Ok(config);
                }
                Err(e) => {
                    debug!("Kubernetes config from {} unavailable: {}", source, e);
                    attempts.push(format!("{source}: {e}"));
                }
            }
        }

        if attempts.is_empty() {
            attempts.push("no credential sources configured".to_string());
        }
        Err(ScalerError::Config { attempts })
    }
}

impl Default for ClientProvider {
    fn default() -> Self {
        Self::new(ClientSettings::from_env())
    }
}
