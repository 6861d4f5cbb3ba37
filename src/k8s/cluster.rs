//! Cluster access
//!
//! `ClusterApi` is the single seam between workload operations and the
//! Kubernetes API. `KubeCluster` implements it with `kube`, acquiring the
//! shared client from a `ClientProvider` on every call.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::autoscaling::v1::{HorizontalPodAutoscaler, Scale};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams, PostParams};
use std::sync::Arc;
use tracing::debug;

use super::client::ClientProvider;
use super::resource::{ScalableResource, Workload, WorkloadKind};
use crate::error::Result;

/// Operations the workload components need from the cluster
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Fetch a workload
    ///
    /// A 404 from the API server is `Ok(None)`, which callers report as
    /// `ScalerError::NotFound`. Every other API error is returned verbatim.
    async fn get_workload(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Workload>>;

    /// Fetch the scale subresource
    async fn get_scale(&self, kind: WorkloadKind, namespace: &str, name: &str) -> Result<Scale>;

    /// Write the scale subresource back
    async fn replace_scale(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
        scale: &Scale,
    ) -> Result<Scale>;

    /// List autoscaling/v1 HorizontalPodAutoscalers in a namespace
    async fn list_autoscalers(&self, namespace: &str) -> Result<Vec<HorizontalPodAutoscaler>>;

    /// List pods matching a formatted label selector
    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>>;
}

/// `ClusterApi` backed by a live Kubernetes API server
#[derive(Clone)]
pub struct KubeCluster {
    provider: Arc<ClientProvider>,
}

impl KubeCluster {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }

    async fn api<K: ScalableResource>(&self, namespace: &str) -> Result<Api<K>> {
        let client = self.provider.acquire().await?;
        Ok(Api::namespaced(client, namespace))
    }

    async fn fetch<K: ScalableResource>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Workload>> {
        let api = self.api::<K>(namespace).await?;
        debug!("Fetching {}/{} in {}", K::KIND, name, namespace);

        match found(api.get(name).await)? {
            Some(resource) => Workload::from_resource(&resource).map(Some),
            None => Ok(None),
        }
    }

    async fn fetch_scale<K: ScalableResource>(&self, namespace: &str, name: &str) -> Result<Scale> {
        let api = self.api::<K>(namespace).await?;
        debug!("Fetching scale of {}/{} in {}", K::KIND, name, namespace);
        Ok(api.get_scale(name).await?)
    }

    async fn write_scale<K: ScalableResource>(
        &self,
        namespace: &str,
        name: &str,
        scale: &Scale,
    ) -> Result<Scale> {
        let api = self.api::<K>(namespace).await?;
        let body = serde_json::to_vec(scale)?;
        debug!("Replacing scale of {}/{} in {}", K::KIND, name, namespace);
        Ok(api.replace_scale(name, &PostParams::default(), body).await?)
    }
}

/// Turn a 404 into `None`, keeping every other error
fn found<T>(result: std::result::Result<T, kube::Error>) -> Result<Option<T>> {
    match result {
        Ok(object) => Ok(Some(object)),
        Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn get_workload(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Workload>> {
        match kind {
            WorkloadKind::StatefulSet => self.fetch::<StatefulSet>(namespace, name).await,
        }
    }

    async fn get_scale(&self, kind: WorkloadKind, namespace: &str, name: &str) -> Result<Scale> {
        match kind {
            WorkloadKind::StatefulSet => self.fetch_scale::<StatefulSet>(namespace, name).await,
        }
    }

    async fn replace_scale(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
        scale: &Scale,
    ) -> Result<Scale> {
        match kind {
            WorkloadKind::StatefulSet => {
                self.write_scale::<StatefulSet>(namespace, name, scale)
                    .await
            }
        }
    }

    async fn list_autoscalers(&self, namespace: &str) -> Result<Vec<HorizontalPodAutoscaler>> {
        let client = self.provider.acquire().await?;
        let api: Api<HorizontalPodAutoscaler> = Api::namespaced(client, namespace);
        debug!("Listing HorizontalPodAutoscalers in {}", namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>> {
        let client = self.provider.acquire().await?;
        let api: Api<Pod> = Api::namespaced(client, namespace);
        debug!("Listing pods in {} matching {:?}", namespace, label_selector);
        let params = ListParams::default().labels(label_selector);
        Ok(api.list(&params).await?.items)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScalerError;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("request failed with {reason}"),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_found_keeps_object() {
        assert_eq!(found::<u32>(Ok(3)).unwrap(), Some(3));
    }

    #[test]
    fn test_found_maps_404_to_none() {
        assert_eq!(found::<u32>(Err(api_error(404, "NotFound"))).unwrap(), None);
    }

    #[test]
    fn test_found_passes_other_errors_through() {
        for (code, reason) in [(403, "Forbidden"), (500, "InternalError")] {
            match found::<u32>(Err(api_error(code, reason))) {
                Err(ScalerError::Api(kube::Error::Api(resp))) => {
                    assert_eq!(resp.code, code);
                    assert_eq!(resp.reason, reason);
                }
                other => panic!("{code}: unexpected result: {other:?}"),
            }
        }
    }
}
