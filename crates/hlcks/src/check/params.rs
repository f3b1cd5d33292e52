//! Desired-state check parameters.
//!
//! This is the explicit, typed replacement for free-form keyword-argument
//! pass-through: every parameter a caller may set is a named optional field,
//! and unrecognized fields are rejected when a parameter map crosses a
//! serialization boundary.

use serde::{Deserialize, Serialize};

/// Selector for assigned notification channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelSelector {
    /// A channel UUID, or `"*"` to assign all existing integrations.
    Id(String),

    /// A sub-query resolved against the live channel list.
    Query {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

/// Caller-supplied parameters for a check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckParams {
    /// Tags to associate with the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Expected period in seconds. Ignored when a schedule is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Grace period in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace: Option<u64>,

    /// Cron expression; takes precedence over `timeout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    /// Timezone for the schedule. Only meaningful together with `schedule`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,

    /// Whether a paused check stays paused when pinged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_resume: Option<bool>,

    /// Allowed ping methods: `""` (any) or `"POST"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<String>,

    /// Assigned notification channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<ChannelSelector>>,

    /// Keywords classifying inbound email as "start" signals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_kw: Option<Vec<String>>,

    /// Keywords classifying inbound email as "success" signals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_kw: Option<Vec<String>>,

    /// Keywords classifying inbound email as "failure" signals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kw: Option<Vec<String>>,

    /// Match keywords in email subject lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_subject: Option<bool>,

    /// Match keywords in email bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_body: Option<bool>,
}

impl CheckParams {
    /// Overlay policy-side overrides: any field the policy sets wins over
    /// the caller's value.
    pub fn apply_overrides(mut self, overrides: &CheckParams) -> Self {
        if overrides.tags.is_some() {
            self.tags = overrides.tags.clone();
        }
        if overrides.desc.is_some() {
            self.desc = overrides.desc.clone();
        }
        if overrides.timeout.is_some() {
            self.timeout = overrides.timeout;
        }
        if overrides.grace.is_some() {
            self.grace = overrides.grace;
        }
        if overrides.schedule.is_some() {
            self.schedule = overrides.schedule.clone();
        }
        if overrides.tz.is_some() {
            self.tz = overrides.tz.clone();
        }
        if overrides.manual_resume.is_some() {
            self.manual_resume = overrides.manual_resume;
        }
        if overrides.methods.is_some() {
            self.methods = overrides.methods.clone();
        }
        if overrides.channels.is_some() {
            self.channels = overrides.channels.clone();
        }
        if overrides.start_kw.is_some() {
            self.start_kw = overrides.start_kw.clone();
        }
        if overrides.success_kw.is_some() {
            self.success_kw = overrides.success_kw.clone();
        }
        if overrides.failure_kw.is_some() {
            self.failure_kw = overrides.failure_kw.clone();
        }
        if overrides.filter_subject.is_some() {
            self.filter_subject = overrides.filter_subject;
        }
        if overrides.filter_body.is_some() {
            self.filter_body = overrides.filter_body;
        }
        self
    }
}
