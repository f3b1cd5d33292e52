//! Declarative state wrappers over the reconciler.
//!
//! These never return `Err`: every failure is folded into the outcome so a
//! caller applying many desired states can report each one uniformly.

use serde::Serialize;
use tracing::info;

use super::params::CheckParams;
use super::reconcile::{reconcile, Changes};
use crate::api::{CheckApi, CheckStatus};
use crate::error::HlcksError;

/// Result of applying one desired state
#[derive(Debug, Clone, Serialize)]
pub struct StateOutcome {
    pub name: String,
    pub succeeded: bool,
    pub description: String,
    pub changes: Changes,
}

impl StateOutcome {
    fn unchanged(name: &str) -> Self {
        StateOutcome {
            name: name.to_string(),
            succeeded: true,
            description: "the check is already in the correct state".to_string(),
            changes: Changes::Unchanged,
        }
    }

    fn applied(name: &str, description: &str, changes: Changes) -> Self {
        StateOutcome {
            name: name.to_string(),
            succeeded: true,
            description: description.to_string(),
            changes,
        }
    }

    fn failed(name: &str, error: HlcksError) -> Self {
        StateOutcome {
            name: name.to_string(),
            succeeded: false,
            description: error.to_string(),
            changes: Changes::Unchanged,
        }
    }
}

/// Ensure a check exists and matches the given parameters.
pub async fn ensure_present(
    api: &dyn CheckApi,
    name: &str,
    params: &CheckParams,
    dry_run: bool,
) -> StateOutcome {
    match present(api, name, params, dry_run).await {
        Ok(outcome) => outcome,
        Err(error) => StateOutcome::failed(name, error),
    }
}

async fn present(
    api: &dyn CheckApi,
    name: &str,
    params: &CheckParams,
    dry_run: bool,
) -> Result<StateOutcome, HlcksError> {
    let current = api.find_check(name).await?;
    let reconciliation = reconcile(api, name, params, current.as_ref()).await?;

    if reconciliation.changes.is_empty() {
        return Ok(StateOutcome::unchanged(name));
    }

    let verb = match current {
        None => "created",
        Some(_) => "updated",
    };
    if dry_run {
        return Ok(StateOutcome::applied(
            name,
            &format!("the check would have been {verb}"),
            reconciliation.changes,
        ));
    }

    match &current {
        None => {
            api.write_check(&reconciliation.payload).await?;
        }
        Some(check) => {
            api.update_check(check.uuid, &reconciliation.payload).await?;
        }
    }
    info!(check = name, "check {verb}");

    Ok(StateOutcome::applied(
        name,
        &format!("the check has been {verb}"),
        reconciliation.changes,
    ))
}

/// Ensure a check does not exist.
pub async fn ensure_absent(api: &dyn CheckApi, name: &str, dry_run: bool) -> StateOutcome {
    match absent(api, name, dry_run).await {
        Ok(outcome) => outcome,
        Err(error) => StateOutcome::failed(name, error),
    }
}

async fn absent(
    api: &dyn CheckApi,
    name: &str,
    dry_run: bool,
) -> Result<StateOutcome, HlcksError> {
    let current = match api.find_check(name).await? {
        Some(check) => check,
        None => return Ok(StateOutcome::unchanged(name)),
    };

    if dry_run {
        return Ok(StateOutcome::applied(
            name,
            "the check would have been deleted",
            Changes::Deleted,
        ));
    }

    api.delete_check(current.uuid).await?;
    info!(check = name, "check deleted");
    Ok(StateOutcome::applied(
        name,
        "the check has been deleted",
        Changes::Deleted,
    ))
}

/// Ensure an existing check is paused, or actively monitored.
pub async fn ensure_pause_state(
    api: &dyn CheckApi,
    name: &str,
    paused: bool,
    dry_run: bool,
) -> StateOutcome {
    match pause_state(api, name, paused, dry_run).await {
        Ok(outcome) => outcome,
        Err(error) => StateOutcome::failed(name, error),
    }
}

async fn pause_state(
    api: &dyn CheckApi,
    name: &str,
    paused: bool,
    dry_run: bool,
) -> Result<StateOutcome, HlcksError> {
    let current = api
        .find_check(name)
        .await?
        .ok_or_else(|| HlcksError::MissingCheck(name.to_string()))?;

    let already_paused = current.status == CheckStatus::Paused;
    if paused == already_paused {
        return Ok(StateOutcome::unchanged(name));
    }

    let (verb, changes) = if paused {
        ("paused", Changes::Paused)
    } else {
        ("resumed", Changes::Resumed)
    };
    if dry_run {
        return Ok(StateOutcome::applied(
            name,
            &format!("the check would have been {verb}"),
            changes,
        ));
    }

    if paused {
        api.pause_check(current.uuid).await?;
    } else {
        api.resume_check(current.uuid).await?;
    }
    info!(check = name, "check {verb}");
    Ok(StateOutcome::applied(
        name,
        &format!("the check has been {verb}"),
        changes,
    ))
}
