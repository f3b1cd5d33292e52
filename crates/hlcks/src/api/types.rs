//! Monitoring-API resource types.
//!
//! Wire records are deserialized as the API sends them; the structured
//! [`Check`] value carries a typed UUID extracted once at that boundary, so
//! the rest of the crate never parses URLs apart.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::ApiError;

/// Lifecycle status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    #[default]
    New,
    Up,
    Grace,
    Down,
    Paused,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::New => write!(f, "new"),
            CheckStatus::Up => write!(f, "up"),
            CheckStatus::Grace => write!(f, "grace"),
            CheckStatus::Down => write!(f, "down"),
            CheckStatus::Paused => write!(f, "paused"),
        }
    }
}

/// A check as the monitoring API returns it on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRecord {
    pub name: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub grace: u64,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub tz: Option<String>,
    #[serde(default)]
    pub manual_resume: bool,
    #[serde(default)]
    pub methods: String,
    #[serde(default)]
    pub channels: String,
    #[serde(default)]
    pub start_kw: String,
    #[serde(default)]
    pub success_kw: String,
    #[serde(default)]
    pub failure_kw: String,
    #[serde(default)]
    pub filter_subject: bool,
    #[serde(default)]
    pub filter_body: bool,
    #[serde(default)]
    pub status: CheckStatus,
    pub ping_url: Url,
}

/// A check, identified by its UUID, with its derived ping URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub uuid: Uuid,
    pub name: String,
    pub ping_url: Url,
    pub status: CheckStatus,
    pub tags: String,
    pub desc: String,
    pub grace: u64,
    pub timeout: Option<u64>,
    pub schedule: Option<String>,
    pub tz: Option<String>,
    pub manual_resume: bool,
    pub methods: String,
    pub channels: String,
    pub start_kw: String,
    pub success_kw: String,
    pub failure_kw: String,
    pub filter_subject: bool,
    pub filter_body: bool,
}

impl TryFrom<CheckRecord> for Check {
    type Error = ApiError;

    fn try_from(record: CheckRecord) -> Result<Self, Self::Error> {
        let uuid = uuid_from_ping_url(&record.ping_url)?;
        Ok(Check {
            uuid,
            name: record.name,
            ping_url: record.ping_url,
            status: record.status,
            tags: record.tags,
            desc: record.desc,
            grace: record.grace,
            timeout: record.timeout,
            schedule: record.schedule,
            tz: record.tz,
            manual_resume: record.manual_resume,
            methods: record.methods,
            channels: record.channels,
            start_kw: record.start_kw,
            success_kw: record.success_kw,
            failure_kw: record.failure_kw,
            filter_subject: record.filter_subject,
            filter_body: record.filter_body,
        })
    }
}

/// Extract the check UUID from a `.../ping/<uuid>` URL.
fn uuid_from_ping_url(url: &Url) -> Result<Uuid, ApiError> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back().map(str::to_owned))
        .and_then(|last| Uuid::parse_str(&last).ok())
        .ok_or_else(|| ApiError::Decode(format!("ping URL without a UUID: {url}")))
}

/// Payload for check create/update operations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_resume: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_kw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_kw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_subject: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_body: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unique: Vec<String>,
}

impl CheckPayload {
    /// Fill unset fields from the current remote values, so an update does
    /// not clobber parameters the caller left alone.
    pub fn with_defaults(mut self, defaults: &CheckPayload) -> Self {
        self.name = self.name.or_else(|| defaults.name.clone());
        self.tags = self.tags.or_else(|| defaults.tags.clone());
        self.desc = self.desc.or_else(|| defaults.desc.clone());
        self.timeout = self.timeout.or(defaults.timeout);
        self.grace = self.grace.or(defaults.grace);
        self.schedule = self.schedule.or_else(|| defaults.schedule.clone());
        self.tz = self.tz.or_else(|| defaults.tz.clone());
        self.manual_resume = self.manual_resume.or(defaults.manual_resume);
        self.methods = self.methods.or_else(|| defaults.methods.clone());
        self.channels = self.channels.or_else(|| defaults.channels.clone());
        self.start_kw = self.start_kw.or_else(|| defaults.start_kw.clone());
        self.success_kw = self.success_kw.or_else(|| defaults.success_kw.clone());
        self.failure_kw = self.failure_kw.or_else(|| defaults.failure_kw.clone());
        self.filter_subject = self.filter_subject.or(defaults.filter_subject);
        self.filter_body = self.filter_body.or(defaults.filter_body);
        self
    }
}

impl From<&Check> for CheckPayload {
    fn from(check: &Check) -> Self {
        CheckPayload {
            name: Some(check.name.clone()),
            tags: Some(check.tags.clone()),
            desc: Some(check.desc.clone()),
            timeout: check.timeout,
            grace: Some(check.grace),
            schedule: check.schedule.clone(),
            tz: check.tz.clone(),
            manual_resume: Some(check.manual_resume),
            methods: Some(check.methods.clone()),
            channels: Some(check.channels.clone()),
            start_kw: Some(check.start_kw.clone()),
            success_kw: Some(check.success_kw.clone()),
            failure_kw: Some(check.failure_kw.clone()),
            filter_subject: Some(check.filter_subject),
            filter_body: Some(check.filter_body),
            unique: Vec::new(),
        }
    }
}

/// A notification integration, read-only from this crate's perspective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
}

/// A recorded ping of a check
#[derive(Debug, Clone, Deserialize)]
pub struct Ping {
    pub n: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub date: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub ua: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// An up/down status flip of a check
#[derive(Debug, Clone, Deserialize)]
pub struct Flip {
    pub timestamp: String,
    pub up: u8,
}

/// Query parameters for listing flips
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipQuery {
    pub seconds: Option<u64>,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub limit: Option<usize>,
}
