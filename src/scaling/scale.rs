//! Idempotent scaling through the scale subresource
//!
//! The read-check-write is not transactional. The fetched `Scale` carries
//! its `resourceVersion`, so a write racing another writer is rejected by
//! the API server and surfaced as an `Api` error; it is not retried.

use k8s_openapi::api::autoscaling::v1::Scale;
use std::fmt;
use tracing::{debug, info};

use super::WorkloadScaler;
use crate::error::Result;
use crate::k8s::{Workload, WorkloadKind};

/// What a scale call did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// Already at the requested count; nothing was written
    Unchanged { replicas: i32 },
    /// The scale subresource was updated
    Scaled { from: i32, to: i32 },
}

impl ScaleOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ScaleOutcome::Scaled { .. })
    }

    pub fn replicas(&self) -> i32 {
        match self {
            ScaleOutcome::Unchanged { replicas } => *replicas,
            ScaleOutcome::Scaled { to, .. } => *to,
        }
    }
}

impl fmt::Display for ScaleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleOutcome::Unchanged { replicas } => write!(f, "unchanged at {replicas} replicas"),
            ScaleOutcome::Scaled { from, to } => write!(f, "scaled from {from} to {to} replicas"),
        }
    }
}

/// Desired replicas recorded in a scale subresource
fn spec_replicas(scale: &Scale) -> i32 {
    scale
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or_default()
}

impl WorkloadScaler {
    /// Set the desired replica count of `workload`
    ///
    /// No write is issued when the count already matches.
    pub async fn scale(&self, workload: &Workload, replicas: i32) -> Result<ScaleOutcome> {
        self.scale_resource(workload.kind, &workload.namespace, &workload.name, replicas)
            .await
    }

    /// Scale by kind string, without resolving the workload first
    pub async fn scale_named(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        replicas: i32,
    ) -> Result<ScaleOutcome> {
        let kind: WorkloadKind = kind.parse()?;
        self.scale_resource(kind, namespace, name, replicas).await
    }

    async fn scale_resource(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
        replicas: i32,
    ) -> Result<ScaleOutcome> {
        let mut scale = self.cluster.get_scale(kind, namespace, name).await?;
        let current = spec_replicas(&scale);

        if current == replicas {
            debug!("{}/{} in {} already at {} replicas", kind, name, namespace, replicas);
            return Ok(ScaleOutcome::Unchanged { replicas });
        }

        scale.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
        self.cluster
            .replace_scale(kind, namespace, name, &scale)
            .await?;

        info!(
            "Scaled {}/{} in {} from {} to {} replicas",
            kind, name, namespace, current, replicas
        );
        Ok(ScaleOutcome::Scaled {
            from: current,
            to: replicas,
        })
    }
}
