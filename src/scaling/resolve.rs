//! Workload resolution

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{deliver, WorkloadScaler};
use crate::error::{Result, ScalerError};
use crate::k8s::{Workload, WorkloadKind};

impl WorkloadScaler {
    /// Resolve `kind`/`name` in `namespace` into a `Workload`
    ///
    /// Unsupported kinds fail before the cluster is contacted.
    pub async fn resolve(&self, kind: &str, namespace: &str, name: &str) -> Result<Workload> {
        let kind: WorkloadKind = kind.parse()?;
        debug!("Resolving {}/{} in {}", kind, name, namespace);

        self.cluster
            .get_workload(kind, namespace, name)
            .await?
            .ok_or_else(|| ScalerError::NotFound {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    /// Resolve in a spawned task, sending the single result on `tx`
    pub fn resolve_workload(
        &self,
        tx: oneshot::Sender<Result<Workload>>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> JoinHandle<()> {
        let this = self.clone();
        let (kind, namespace, name) = (kind.into(), namespace.into(), name.into());

        tokio::spawn(async move {
            let result = this.resolve(&kind, &namespace, &name).await;
            deliver(tx, result, "resolve");
        })
    }
}
