//! Diff-based reconciliation of a desired check against its remote state.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use super::params::{ChannelSelector, CheckParams};
use crate::api::{Check, CheckApi, CheckPayload};
use crate::error::HlcksError;

/// One changed field, old and new value side by side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub old: Value,
    pub new: Value,
}

/// What reconciliation concluded about a check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Changes {
    Unchanged,
    Created,
    Deleted,
    Paused,
    Resumed,
    Updated(BTreeMap<String, FieldDiff>),
}

impl Changes {
    /// True when no write is needed to converge.
    pub fn is_empty(&self) -> bool {
        matches!(self, Changes::Unchanged)
    }
}

/// Outcome of reconciliation: the concluded changes, and the payload to
/// submit if a write is needed
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub changes: Changes,
    pub payload: CheckPayload,
}

/// Compare desired parameters against the current remote check.
///
/// Only parameters the caller explicitly set participate in the diff;
/// everything else keeps its current remote value. When the check does not
/// exist yet the outcome is [`Changes::Created`] with a payload carrying
/// only the explicitly set fields.
pub async fn reconcile(
    api: &dyn CheckApi,
    name: &str,
    params: &CheckParams,
    current: Option<&Check>,
) -> Result<Reconciliation, HlcksError> {
    let mut desired = parse_params(api, params).await?;
    desired.name = Some(name.to_string());

    match current {
        None => Ok(Reconciliation {
            changes: Changes::Created,
            payload: desired,
        }),
        Some(check) => {
            let remote = CheckPayload::from(check);
            let diffs = diff_payload(&desired, &remote);
            let changes = if diffs.is_empty() {
                Changes::Unchanged
            } else {
                Changes::Updated(diffs)
            };
            Ok(Reconciliation {
                changes,
                payload: desired.with_defaults(&remote),
            })
        }
    }
}

/// Validate and flatten caller parameters into an API payload.
///
/// List-valued parameters collapse to the API's string encodings: tags are
/// space-joined, keywords and channels comma-joined. A schedule supersedes
/// `timeout`, and `tz` is meaningless without a schedule; both conflicts
/// resolve by dropping the weaker parameter with a warning rather than
/// failing the whole operation.
async fn parse_params(
    api: &dyn CheckApi,
    params: &CheckParams,
) -> Result<CheckPayload, HlcksError> {
    if let Some(methods) = &params.methods {
        if !methods.is_empty() && methods != "POST" {
            return Err(HlcksError::Invocation(format!(
                "invalid methods value {methods:?}, expected \"\" or \"POST\""
            )));
        }
    }

    let mut timeout = params.timeout;
    if params.schedule.is_some() && timeout.is_some() {
        warn!("ignoring timeout because a schedule is set");
        timeout = None;
    }

    let mut tz = params.tz.clone();
    if tz.is_some() && params.schedule.is_none() {
        warn!("ignoring tz because no schedule is set");
        tz = None;
    }

    let channels = match &params.channels {
        Some(selectors) => Some(resolve_channels(api, selectors).await?),
        None => None,
    };

    Ok(CheckPayload {
        name: None,
        tags: params.tags.as_ref().map(|tags| tags.join(" ")),
        desc: params.desc.clone(),
        timeout,
        grace: params.grace,
        schedule: params.schedule.clone(),
        tz,
        manual_resume: params.manual_resume,
        methods: params.methods.clone(),
        channels,
        start_kw: params.start_kw.as_ref().map(|kw| kw.join(",")),
        success_kw: params.success_kw.as_ref().map(|kw| kw.join(",")),
        failure_kw: params.failure_kw.as_ref().map(|kw| kw.join(",")),
        filter_subject: params.filter_subject,
        filter_body: params.filter_body,
        unique: Vec::new(),
    })
}

/// Resolve channel selectors to a comma-joined list of channel UUIDs.
/// Literal ids (and `"*"`) pass through; sub-queries are matched against
/// the live integration list, fetched once.
async fn resolve_channels(
    api: &dyn CheckApi,
    selectors: &[ChannelSelector],
) -> Result<String, HlcksError> {
    let mut available = None;
    let mut resolved = Vec::new();

    for selector in selectors {
        match selector {
            ChannelSelector::Id(id) => resolved.push(id.clone()),
            ChannelSelector::Query { kind, name } => {
                if available.is_none() {
                    available = Some(api.list_channels().await?);
                }
                let channels = available.as_deref().unwrap_or_default();
                let mut matched = false;
                for channel in channels {
                    let kind_ok = kind.as_deref().map_or(true, |k| k == channel.kind);
                    let name_ok = name.as_deref().map_or(true, |n| n == channel.name);
                    if kind_ok && name_ok {
                        resolved.push(channel.id.to_string());
                        matched = true;
                    }
                }
                if !matched {
                    return Err(HlcksError::Invocation(format!(
                        "no notification channel matches kind={kind:?} name={name:?}"
                    )));
                }
            }
        }
    }

    Ok(resolved.join(","))
}

/// Diff the explicitly set fields of `desired` against the remote values.
/// The name never participates; it is the lookup key, not a parameter.
pub(crate) fn diff_payload(
    desired: &CheckPayload,
    remote: &CheckPayload,
) -> BTreeMap<String, FieldDiff> {
    let mut diffs = BTreeMap::new();
    diff_field(&mut diffs, "tags", &remote.tags, &desired.tags);
    diff_field(&mut diffs, "desc", &remote.desc, &desired.desc);
    diff_field(&mut diffs, "timeout", &remote.timeout, &desired.timeout);
    diff_field(&mut diffs, "grace", &remote.grace, &desired.grace);
    diff_field(&mut diffs, "schedule", &remote.schedule, &desired.schedule);
    diff_field(&mut diffs, "tz", &remote.tz, &desired.tz);
    diff_field(
        &mut diffs,
        "manual_resume",
        &remote.manual_resume,
        &desired.manual_resume,
    );
    diff_field(&mut diffs, "methods", &remote.methods, &desired.methods);
    diff_field(&mut diffs, "channels", &remote.channels, &desired.channels);
    diff_field(&mut diffs, "start_kw", &remote.start_kw, &desired.start_kw);
    diff_field(
        &mut diffs,
        "success_kw",
        &remote.success_kw,
        &desired.success_kw,
    );
    diff_field(
        &mut diffs,
        "failure_kw",
        &remote.failure_kw,
        &desired.failure_kw,
    );
    diff_field(
        &mut diffs,
        "filter_subject",
        &remote.filter_subject,
        &desired.filter_subject,
    );
    diff_field(
        &mut diffs,
        "filter_body",
        &remote.filter_body,
        &desired.filter_body,
    );
    diffs
}

fn diff_field<T: PartialEq + Serialize>(
    diffs: &mut BTreeMap<String, FieldDiff>,
    field: &str,
    old: &Option<T>,
    new: &Option<T>,
) {
    if let Some(new_value) = new {
        if old.as_ref() != Some(new_value) {
            diffs.insert(
                field.to_string(),
                FieldDiff {
                    old: json!(old),
                    new: json!(new_value),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_only_covers_explicitly_set_fields() {
        let remote = CheckPayload {
            tags: Some("prod".to_string()),
            timeout: Some(60),
            grace: Some(900),
            ..Default::default()
        };
        let desired = CheckPayload {
            timeout: Some(3600),
            ..Default::default()
        };

        let diffs = diff_payload(&desired, &remote);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs["timeout"].old, json!(60));
        assert_eq!(diffs["timeout"].new, json!(3600));
    }

    #[test]
    fn matching_fields_produce_no_diff() {
        let remote = CheckPayload {
            tags: Some("prod www".to_string()),
            ..Default::default()
        };
        let desired = CheckPayload {
            tags: Some("prod www".to_string()),
            ..Default::default()
        };
        assert!(diff_payload(&desired, &remote).is_empty());
    }

    #[test]
    fn unset_remote_value_diffs_as_null() {
        let remote = CheckPayload::default();
        let desired = CheckPayload {
            schedule: Some("* * * * *".to_string()),
            ..Default::default()
        };
        let diffs = diff_payload(&desired, &remote);
        assert_eq!(diffs["schedule"].old, Value::Null);
    }
}
