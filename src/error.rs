//! Error types for workload operations

use thiserror::Error;

/// Errors produced while resolving, guarding, scaling or listing workloads
#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("Error initializing Kubernetes config: {}", .attempts.join("; "))]
    Config { attempts: Vec<String> },

    #[error("Resource kind {0} is not implemented")]
    UnsupportedKind(String),

    #[error("Could not find {kind}/{name} in namespace {namespace}")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("{kind}/{name} cannot have a HorizontalPodAutoscaler attached")]
    Conflict { kind: String, name: String },

    #[error("{kind}/{name} has no pod selector")]
    MissingSelector { kind: String, name: String },

    #[error("Invalid label selector: {0}")]
    InvalidSelector(String),

    #[error("Environment variable {0} has no literal value")]
    EnvValue(String),

    #[error(transparent)]
    Api(#[from] kube::Error),

    #[error("Failed to encode scale request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ScalerError {
    /// Whether this error means an autoscaler already owns the resource
    pub fn is_conflict(&self) -> bool {
        matches!(self, ScalerError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScalerError>;
