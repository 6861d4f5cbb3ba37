//! Workload Scaler - scalable Kubernetes workload abstraction
//!
//! A uniform interface over scalable resource kinds for autoscalers:
//! resolve a workload and its pods, detect a conflicting
//! HorizontalPodAutoscaler, and scale idempotently through the scale
//! subresource.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::sync::oneshot;
//! use workload_scaler::{ClientProvider, WorkloadScaler};
//!
//! # async fn run() -> workload_scaler::Result<()> {
//! let scaler = WorkloadScaler::with_provider(Arc::new(ClientProvider::default()));
//!
//! let (workload_tx, workload_rx) = oneshot::channel();
//! let (guard_tx, guard_rx) = oneshot::channel();
//! scaler.resolve_workload(workload_tx, "StatefulSet", "agents", "azp-agent");
//! scaler.check_no_autoscaler(guard_tx, "StatefulSet", "agents", "azp-agent");
//!
//! let workload = workload_rx.await.expect("resolver task")?;
//! guard_rx.await.expect("guard task")?;
//! scaler.scale(&workload, 5).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod k8s;
pub mod scaling;
pub mod utils;

pub use error::{Result, ScalerError};
pub use k8s::{ClientProvider, ClientSettings, ClusterApi, KubeCluster, Workload, WorkloadKind};
pub use scaling::{ScaleOutcome, WorkloadScaler};
