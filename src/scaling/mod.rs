//! Workload operations
//!
//! `WorkloadScaler` is the surface a coordinator drives. Every channel
//! based operation spawns one task and sends exactly one result on the
//! `oneshot::Sender` it was handed.

mod guard;
mod pods;
mod resolve;
mod scale;

pub use scale::ScaleOutcome;

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::Result;
use crate::k8s::{ClientProvider, ClusterApi, KubeCluster};

/// Resolve, guard, scale and list pods of scalable workloads
#[derive(Clone)]
pub struct WorkloadScaler {
    cluster: Arc<dyn ClusterApi>,
}

impl WorkloadScaler {
    pub fn new(cluster: Arc<dyn ClusterApi>) -> Self {
        Self { cluster }
    }

    /// Scaler talking to a live cluster through `provider`
    pub fn with_provider(provider: Arc<ClientProvider>) -> Self {
        Self::new(Arc::new(KubeCluster::new(provider)))
    }
}

/// Send the single result of an operation, tolerating a departed receiver
fn deliver<T>(tx: oneshot::Sender<Result<T>>, result: Result<T>, operation: &str) {
    if tx.send(result).is_err() {
        debug!("Dropping {} result: receiver closed", operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScalerError;
    use crate::k8s::resource::tests::stateful_set;
    use crate::k8s::{ClientSettings, Workload};

    /// Scaler whose provider has no credential sources at all
    fn without_credentials() -> WorkloadScaler {
        WorkloadScaler::with_provider(Arc::new(ClientProvider::new(ClientSettings::default())))
    }

    fn assert_config_error<T>(result: Result<T>, operation: &str) {
        match result {
            Err(ScalerError::Config { .. }) => {}
            Err(other) => panic!("{operation}: unexpected error: {other}"),
            Ok(_) => panic!("{operation}: succeeded without a client"),
        }
    }

    #[tokio::test]
    async fn test_client_failure_reaches_every_operation() {
        let scaler = without_credentials();
        let workload = Workload::from_resource(&stateful_set("ns", "agents", 1)).unwrap();

        let (resolve_tx, resolve_rx) = oneshot::channel();
        let (guard_tx, guard_rx) = oneshot::channel();
        let (pods_tx, pods_rx) = oneshot::channel();
        scaler.resolve_workload(resolve_tx, "StatefulSet", "ns", "agents");
        scaler.check_no_autoscaler(guard_tx, "StatefulSet", "ns", "agents");
        scaler.list_pods(pods_tx, workload.clone());

        assert_config_error(resolve_rx.await.expect("resolve result"), "resolve");
        assert_config_error(guard_rx.await.expect("guard result"), "check");
        assert_config_error(pods_rx.await.expect("pods result"), "pods");
        assert_config_error(
            scaler.scale_named("StatefulSet", "ns", "agents", 2).await,
            "scale_named",
        );
        assert_config_error(scaler.scale(&workload, 2).await, "scale");
    }

    #[tokio::test]
    async fn test_unsupported_kind_skips_client() {
        let scaler = without_credentials();

        let (tx, rx) = oneshot::channel();
        scaler.resolve_workload(tx, "Deployment", "ns", "agents");
        let err = rx.await.expect("resolve result").unwrap_err();
        assert!(matches!(err, ScalerError::UnsupportedKind(_)));

        let err = scaler
            .scale_named("Deployment", "ns", "agents", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, ScalerError::UnsupportedKind(_)));
    }

    #[test]
    fn test_deliver_sends_once() {
        let (tx, rx) = oneshot::channel::<Result<u32>>();
        deliver(tx, Ok(7), "test");
        assert_eq!(tokio_test::block_on(rx).unwrap().unwrap(), 7);
    }

    #[test]
    fn test_deliver_without_receiver() {
        let (tx, rx) = oneshot::channel::<Result<u32>>();
        drop(rx);
        deliver(tx, Ok(7), "test");
    }
}
