//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "WORKLOAD_SCALER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Namespace from WORKLOAD_SCALER_NAMESPACE
    pub namespace: Option<String>,
    /// Timeout from WORKLOAD_SCALER_TIMEOUT
    pub timeout: Option<u64>,
    /// In-cluster credentials from WORKLOAD_SCALER_IN_CLUSTER
    pub in_cluster: Option<bool>,
    /// Log level from WORKLOAD_SCALER_LOG_LEVEL
    pub log_level: Option<String>,
    /// Config file from WORKLOAD_SCALER_CONFIG
    pub config_file: Option<String>,
    /// Kubeconfig from KUBECONFIG
    pub kubeconfig: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            namespace: get_env("NAMESPACE"),
            timeout: get_env_parse("TIMEOUT"),
            in_cluster: get_env_bool("IN_CLUSTER"),
            log_level: get_env("LOG_LEVEL"),
            config_file: get_env("CONFIG"),
            kubeconfig: env::var("KUBECONFIG").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Check if any prefixed environment variables are set
    pub fn has_any(&self) -> bool {
        self.namespace.is_some()
            || self.timeout.is_some()
            || self.in_cluster.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
    }

    /// `NAME=value` lines for every prefixed variable that is set
    pub fn overrides(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                lines.push(format!("{ENV_PREFIX}_{name}={value}"));
            }
        };

        push("NAMESPACE", self.namespace.clone());
        push("TIMEOUT", self.timeout.map(|t| t.to_string()));
        push("IN_CLUSTER", self.in_cluster.map(|b| b.to_string()));
        push("LOG_LEVEL", self.log_level.clone());
        push("CONFIG", self.config_file.clone());
        lines
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all WORKLOAD_SCALER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_NAMESPACE    Default namespace");
    println!("  {ENV_PREFIX}_TIMEOUT      Seconds to wait for each cluster result");
    println!("  {ENV_PREFIX}_IN_CLUSTER   Try service-account credentials first (true/false)");
    println!("  {ENV_PREFIX}_LOG_LEVEL    Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  KUBECONFIG                  Path to kubeconfig file");
}
