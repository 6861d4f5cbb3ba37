//! Pod helpers
//!
//! Environment lookups and phase summaries for a workload's member pods.

use k8s_openapi::api::core::v1::{EnvVar, Pod};
use std::collections::BTreeMap;

use crate::error::{Result, ScalerError};

/// Literal value of an environment variable
///
/// Values sourced from secrets or config maps are not resolved and are
/// reported as errors, as are empty values.
pub fn env_value(env: &EnvVar) -> Result<String> {
    match env.value.as_deref() {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ScalerError::EnvValue(env.name.clone())),
    }
}

/// Pod phase, `Unknown` when the status is missing
pub fn pod_phase(pod: &Pod) -> &str {
    pod.status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .unwrap_or("Unknown")
}

/// Count pods per phase
pub fn phase_counts(pods: &[Pod]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for pod in pods {
        *counts.entry(pod_phase(pod).to_string()).or_insert(0) += 1;
    }
    counts
}
