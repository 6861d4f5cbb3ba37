//! HorizontalPodAutoscaler target matching

use k8s_openapi::api::autoscaling::v1::HorizontalPodAutoscaler;

/// Whether `hpa` targets the resource `kind`/`name`
///
/// The kind is compared case-insensitively, the name exactly.
pub fn targets(hpa: &HorizontalPodAutoscaler, kind: &str, name: &str) -> bool {
    hpa.spec
        .as_ref()
        .map(|spec| {
            let target = &spec.scale_target_ref;
            target.kind.eq_ignore_ascii_case(kind) && target.name == name
        })
        .unwrap_or(false)
}

/// First autoscaler targeting `kind`/`name`; stops at the first match
pub fn find_conflicting_autoscaler<'a, I>(
    autoscalers: I,
    kind: &str,
    name: &str,
) -> Option<&'a HorizontalPodAutoscaler>
where
    I: IntoIterator<Item = &'a HorizontalPodAutoscaler>,
{
    autoscalers
        .into_iter()
        .find(|hpa| targets(hpa, kind, name))
}
