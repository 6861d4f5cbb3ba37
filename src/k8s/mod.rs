//! Kubernetes access module
//!
//! Client construction, the cluster seam and the scalable resource model.

pub mod autoscaler;
pub mod client;
pub mod cluster;
pub mod pod;
pub mod resource;
pub mod selector;

pub use autoscaler::find_conflicting_autoscaler;
pub use client::{ClientProvider, ClientSettings, ConfigSource};
pub use cluster::{ClusterApi, KubeCluster};
pub use pod::env_value;
pub use resource::{ScalableResource, Workload, WorkloadKind};
pub use selector::format_label_selector;
