//! Pod membership of a workload

use k8s_openapi::api::core::v1::Pod;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::{deliver, WorkloadScaler};
use crate::error::Result;
use crate::k8s::{format_label_selector, Workload};

impl WorkloadScaler {
    /// Pods currently matching the workload's selector
    pub async fn pods(&self, workload: &Workload) -> Result<Vec<Pod>> {
        let selector = format_label_selector(&workload.pod_selector)?;
        self.cluster.list_pods(&workload.namespace, &selector).await
    }

    /// List pods in a spawned task, sending the single result on `tx`
    pub fn list_pods(
        &self,
        tx: oneshot::Sender<Result<Vec<Pod>>>,
        workload: Workload,
    ) -> JoinHandle<()> {
        let this = self.clone();

        tokio::spawn(async move {
            let result = this.pods(&workload).await;
            deliver(tx, result, "pod list");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScalerError;
    use crate::k8s::cluster::fake::{Call, FakeCluster};
    use crate::k8s::pod::tests::pod;
    use crate::k8s::resource::tests::stateful_set;
    use std::sync::Arc;

    fn agents() -> Workload {
        Workload::from_resource(&stateful_set("ns", "agents", 2)).unwrap()
    }

    #[tokio::test]
    async fn test_list_pods_by_selector() {
        let cluster = Arc::new(
            FakeCluster::new()
                .with_pod("ns", pod("agents-0", "Running"))
                .with_pod("ns", pod("agents-1", "Pending")),
        );
        let scaler = WorkloadScaler::new(cluster.clone());

        let (tx, rx) = oneshot::channel();
        scaler.list_pods(tx, agents()).await.unwrap();

        let pods = rx.await.expect("exactly one message").unwrap();
        let names: Vec<_> = pods
            .iter()
            .filter_map(|p| p.metadata.name.as_deref())
            .collect();
        assert_eq!(names, vec!["agents-0", "agents-1"]);
        assert_eq!(
            cluster.calls(),
            vec![Call::ListPods("ns".to_string(), "app=agents".to_string())]
        );
    }

    #[tokio::test]
    async fn test_list_error_sends_error() {
        let scaler = WorkloadScaler::new(Arc::new(FakeCluster::new().failing()));

        let (tx, rx) = oneshot::channel();
        scaler.list_pods(tx, agents()).await.unwrap();

        let err = rx.await.expect("exactly one message").unwrap_err();
        assert!(matches!(err, ScalerError::Api(_)));
    }

    #[tokio::test]
    async fn test_invalid_selector_skips_list() {
        let cluster = Arc::new(FakeCluster::new());
        let scaler = WorkloadScaler::new(cluster.clone());
        let mut workload = agents();
        workload.pod_selector.match_expressions = Some(vec![
            k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelectorRequirement {
                key: "app".to_string(),
                operator: "Matches".to_string(),
                values: None,
            },
        ]);

        let err = scaler.pods(&workload).await.unwrap_err();
        assert!(matches!(err, ScalerError::InvalidSelector(_)));
        assert!(cluster.calls().is_empty());
    }
}
