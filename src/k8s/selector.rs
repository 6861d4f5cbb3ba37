//! Label selector formatting
//!
//! Turns a structured `LabelSelector` into the string form accepted by
//! `ListParams::labels`.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};

use crate::error::{Result, ScalerError};

/// Format a selector as `key=value,key in (a,b),!key`
///
/// Requirements are sorted by key. An empty selector formats to an empty
/// string, which matches everything.
pub fn format_label_selector(selector: &LabelSelector) -> Result<String> {
    let mut requirements: Vec<(String, String)> = Vec::new();

    if let Some(labels) = &selector.match_labels {
        for (key, value) in labels {
            requirements.push((key.clone(), format!("{key}={value}")));
        }
    }

    if let Some(expressions) = &selector.match_expressions {
        for expr in expressions {
            requirements.push((expr.key.clone(), format_requirement(expr)?));
        }
    }

    requirements.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(requirements
        .into_iter()
        .map(|(_, r)| r)
        .collect::<Vec<_>>()
        .join(","))
}

fn format_requirement(expr: &LabelSelectorRequirement) -> Result<String> {
    let key = &expr.key;
    let values = || {
        let mut values = expr.values.clone().unwrap_or_default();
        values.sort();
        values.join(",")
    };

    match expr.operator.as_str() {
        "In" => Ok(format!("{key} in ({})", values())),
        "NotIn" => Ok(format!("{key} notin ({})", values())),
        "Exists" => Ok(key.clone()),
        "DoesNotExist" => Ok(format!("!{key}")),
        op => Err(ScalerError::InvalidSelector(format!(
            "unknown operator {op:?} for key {key}"
        ))),
    }
}
