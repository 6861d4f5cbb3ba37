//! Conflicting autoscaler detection

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{deliver, WorkloadScaler};
use crate::error::{Result, ScalerError};
use crate::k8s::find_conflicting_autoscaler;

impl WorkloadScaler {
    /// Fail with `Conflict` if a HorizontalPodAutoscaler already targets
    /// `kind`/`name` in `namespace`
    pub async fn check(&self, kind: &str, namespace: &str, name: &str) -> Result<()> {
        let autoscalers = self.cluster.list_autoscalers(namespace).await?;
        debug!(
            "Scanning {} HorizontalPodAutoscalers in {} for {}/{}",
            autoscalers.len(),
            namespace,
            kind,
            name
        );

        match find_conflicting_autoscaler(&autoscalers, kind, name) {
            Some(hpa) => {
                warn!(
                    "HorizontalPodAutoscaler {} already targets {}/{}",
                    hpa.metadata.name.as_deref().unwrap_or("<unnamed>"),
                    kind,
                    name
                );
                Err(ScalerError::Conflict {
                    kind: kind.to_lowercase(),
                    name: name.to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Run `check` in a spawned task, sending the single result on `tx`
    pub fn check_no_autoscaler(
        &self,
        tx: oneshot::Sender<Result<()>>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> JoinHandle<()> {
        let this = self.clone();
        let (kind, namespace, name) = (kind.into(), namespace.into(), name.into());

        tokio::spawn(async move {
            let result = this.check(&kind, &namespace, &name).await;
            deliver(tx, result, "autoscaler check");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::autoscaler::tests::hpa;
    use crate::k8s::cluster::fake::{Call, FakeCluster};
    use std::sync::Arc;

    fn scaler(cluster: FakeCluster) -> (Arc<FakeCluster>, WorkloadScaler) {
        let cluster = Arc::new(cluster);
        (cluster.clone(), WorkloadScaler::new(cluster))
    }

    #[tokio::test]
    async fn test_no_autoscalers() {
        let (cluster, scaler) = scaler(FakeCluster::new());
        scaler.check("StatefulSet", "ns", "agents").await.unwrap();
        assert_eq!(cluster.calls(), vec![Call::ListAutoscalers("ns".to_string())]);
    }

    #[tokio::test]
    async fn test_unrelated_autoscalers() {
        let (_, scaler) = scaler(
            FakeCluster::new()
                .with_autoscaler("ns", hpa("StatefulSet", "foo"))
                .with_autoscaler("ns", hpa("Deployment", "agents"))
                .with_autoscaler("other", hpa("StatefulSet", "agents")),
        );
        scaler.check("StatefulSet", "ns", "agents").await.unwrap();
    }

    #[tokio::test]
    async fn test_conflict_references_target() {
        let (_, scaler) = scaler(
            FakeCluster::new()
                .with_autoscaler("ns", hpa("StatefulSet", "foo"))
                .with_autoscaler("ns", hpa("StatefulSet", "bar"))
                .with_autoscaler("ns", hpa("statefulset", "target")),
        );

        let (tx, rx) = oneshot::channel();
        scaler
            .check_no_autoscaler(tx, "StatefulSet", "ns", "target")
            .await
            .unwrap();

        let err = rx.await.expect("exactly one message").unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "statefulset/target cannot have a HorizontalPodAutoscaler attached"
        );
    }

    #[tokio::test]
    async fn test_no_conflict_sends_ok() {
        let (cluster, scaler) = scaler(
            FakeCluster::new()
                .with_autoscaler("ns", hpa("StatefulSet", "foo"))
                .with_autoscaler("ns", hpa("StatefulSet", "bar")),
        );

        let (tx, rx) = oneshot::channel();
        scaler
            .check_no_autoscaler(tx, "StatefulSet", "ns", "target")
            .await
            .unwrap();

        assert!(rx.await.expect("exactly one message").is_ok());
        assert_eq!(cluster.calls(), vec![Call::ListAutoscalers("ns".to_string())]);
    }

    #[tokio::test]
    async fn test_name_match_is_exact() {
        let (_, scaler) =
            scaler(FakeCluster::new().with_autoscaler("ns", hpa("StatefulSet", "Target")));
        scaler.check("StatefulSet", "ns", "target").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_error_is_forwarded() {
        let (_, scaler) = scaler(FakeCluster::new().failing());

        let (tx, rx) = oneshot::channel();
        scaler
            .check_no_autoscaler(tx, "StatefulSet", "ns", "agents")
            .await
            .unwrap();

        let err = rx.await.expect("exactly one message").unwrap_err();
        assert!(matches!(err, ScalerError::Api(_)));
    }
}
