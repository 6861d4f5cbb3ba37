//! Scalable resource kinds
//!
//! `WorkloadKind` is the closed set of kinds this crate can drive, and
//! `ScalableResource` is what each kind's API type has to provide. Adding a
//! kind means a new variant, a trait impl and a match arm in `KubeCluster`.

use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{Container, EnvVar, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::core::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScalerError};

/// Kinds of workload that can be resolved and scaled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    StatefulSet,
}

impl WorkloadKind {
    pub fn all() -> Vec<Self> {
        vec![WorkloadKind::StatefulSet]
    }

    /// Kind as it appears in `kind:` fields
    pub fn name(&self) -> &'static str {
        match self {
            WorkloadKind::StatefulSet => "StatefulSet",
        }
    }

    /// Case-insensitive comparison against a kind string from the cluster
    pub fn matches(&self, kind: &str) -> bool {
        self.name().eq_ignore_ascii_case(kind)
    }
}

impl FromStr for WorkloadKind {
    type Err = ScalerError;

    fn from_str(s: &str) -> Result<Self> {
        WorkloadKind::all()
            .into_iter()
            .find(|kind| kind.matches(s))
            .ok_or_else(|| ScalerError::UnsupportedKind(s.to_string()))
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().to_lowercase())
    }
}

/// API type of a kind that has a scale subresource and selects pods
pub trait ScalableResource:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + DeserializeOwned
    + Serialize
    + fmt::Debug
    + Send
    + Sync
    + 'static
{
    const KIND: WorkloadKind;

    fn pod_selector(&self) -> Option<&LabelSelector>;

    fn desired_replicas(&self) -> Option<i32>;

    fn ready_replicas(&self) -> Option<i32>;

    fn pod_template(&self) -> Option<&PodTemplateSpec>;
}

impl ScalableResource for StatefulSet {
    const KIND: WorkloadKind = WorkloadKind::StatefulSet;

    fn pod_selector(&self) -> Option<&LabelSelector> {
        self.spec.as_ref().map(|s| &s.selector)
    }

    fn desired_replicas(&self) -> Option<i32> {
        self.spec.as_ref().and_then(|s| s.replicas)
    }

    fn ready_replicas(&self) -> Option<i32> {
        self.status.as_ref().and_then(|s| s.ready_replicas)
    }

    fn pod_template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }
}

/// Normalized view of a scalable resource
#[derive(Clone, Debug, PartialEq)]
pub struct Workload {
    pub kind: WorkloadKind,
    pub namespace: String,
    pub name: String,
    pub pod_selector: LabelSelector,
    pub desired_replicas: Option<i32>,
    pub ready_replicas: Option<i32>,
    pub containers: Vec<Container>,
}

impl Workload {
    /// Project a fetched object into a workload
    pub fn from_resource<K: ScalableResource>(resource: &K) -> Result<Self> {
        let name = resource.name_any();
        let pod_selector = resource
            .pod_selector()
            .cloned()
            .ok_or_else(|| ScalerError::MissingSelector {
                kind: K::KIND.to_string(),
                name: name.clone(),
            })?;

        let containers = resource
            .pod_template()
            .and_then(|t| t.spec.as_ref())
            .map(|s| s.containers.clone())
            .unwrap_or_default();

        Ok(Self {
            kind: K::KIND,
            namespace: resource.namespace().unwrap_or_default(),
            name,
            pod_selector,
            desired_replicas: resource.desired_replicas(),
            ready_replicas: resource.ready_replicas(),
            containers,
        })
    }

    /// First env var with this name across the pod template's containers
    pub fn container_env(&self, name: &str) -> Option<&EnvVar> {
        self.containers
            .iter()
            .filter_map(|c| c.env.as_ref())
            .flatten()
            .find(|e| e.name == name)
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.kind, self.name, self.namespace)
    }
}
