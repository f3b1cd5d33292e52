//! In-memory doubles for the monitoring API and the remote transport.

// Not every suite uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use hlcks::api::{Channel, Check, CheckApi, CheckPayload, CheckStatus};
use hlcks::error::ApiError;
use hlcks::issue::IssueCoordinator;
use hlcks::protocol::{IssueRequest, IssueResponse};
use hlcks::transport::{RemoteTransport, TransportError};

/// In-memory monitoring API keyed by check name.
#[derive(Default)]
pub struct FakeApi {
    checks: Mutex<HashMap<String, Check>>,
    channels: Mutex<Vec<Channel>>,
    fail_status: Mutex<Option<u16>>,
    pub writes: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, check: Check) {
        self.checks
            .lock()
            .unwrap()
            .insert(check.name.clone(), check);
    }

    pub fn add_channel(&self, channel: Channel) {
        self.channels.lock().unwrap().push(channel);
    }

    /// Make every subsequent call fail with the given HTTP status.
    pub fn fail_with(&self, status: u16) {
        *self.fail_status.lock().unwrap() = Some(status);
    }

    pub fn recover(&self) {
        *self.fail_status.lock().unwrap() = None;
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn get_by_name(&self, name: &str) -> Option<Check> {
        self.checks.lock().unwrap().get(name).cloned()
    }

    fn gate(&self) -> Result<(), ApiError> {
        match *self.fail_status.lock().unwrap() {
            Some(status) => Err(ApiError::from_status(status, "injected failure".to_string())),
            None => Ok(()),
        }
    }
}

/// Build a check with a fresh UUID and a matching ping URL.
pub fn make_check(name: &str) -> Check {
    let uuid = Uuid::new_v4();
    Check {
        uuid,
        name: name.to_string(),
        ping_url: format!("https://hc.example.org/ping/{uuid}").parse().unwrap(),
        status: CheckStatus::New,
        tags: String::new(),
        desc: String::new(),
        grace: 3600,
        timeout: Some(86400),
        schedule: None,
        tz: None,
        manual_resume: false,
        methods: String::new(),
        channels: String::new(),
        start_kw: String::new(),
        success_kw: String::new(),
        failure_kw: String::new(),
        filter_subject: false,
        filter_body: false,
    }
}

fn apply_payload(check: &mut Check, payload: &CheckPayload) {
    if let Some(tags) = &payload.tags {
        check.tags = tags.clone();
    }
    if let Some(desc) = &payload.desc {
        check.desc = desc.clone();
    }
    if payload.timeout.is_some() {
        check.timeout = payload.timeout;
    }
    if let Some(grace) = payload.grace {
        check.grace = grace;
    }
    if payload.schedule.is_some() {
        check.schedule = payload.schedule.clone();
        check.timeout = None;
    }
    if payload.tz.is_some() {
        check.tz = payload.tz.clone();
    }
    if let Some(manual_resume) = payload.manual_resume {
        check.manual_resume = manual_resume;
    }
    if let Some(methods) = &payload.methods {
        check.methods = methods.clone();
    }
    if let Some(channels) = &payload.channels {
        check.channels = channels.clone();
    }
    if let Some(start_kw) = &payload.start_kw {
        check.start_kw = start_kw.clone();
    }
    if let Some(success_kw) = &payload.success_kw {
        check.success_kw = success_kw.clone();
    }
    if let Some(failure_kw) = &payload.failure_kw {
        check.failure_kw = failure_kw.clone();
    }
    if let Some(filter_subject) = payload.filter_subject {
        check.filter_subject = filter_subject;
    }
    if let Some(filter_body) = payload.filter_body {
        check.filter_body = filter_body;
    }
}

#[async_trait]
impl CheckApi for FakeApi {
    async fn list_checks(&self, tags: &[String]) -> Result<Vec<Check>, ApiError> {
        self.gate()?;
        let checks = self.checks.lock().unwrap();
        Ok(checks
            .values()
            .filter(|check| {
                tags.iter()
                    .all(|tag| check.tags.split_whitespace().any(|t| t == tag))
            })
            .cloned()
            .collect())
    }

    async fn get_check(&self, uuid: Uuid) -> Result<Check, ApiError> {
        self.gate()?;
        let checks = self.checks.lock().unwrap();
        checks
            .values()
            .find(|check| check.uuid == uuid)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(uuid.to_string()))
    }

    async fn find_check(&self, name: &str) -> Result<Option<Check>, ApiError> {
        self.gate()?;
        Ok(self.checks.lock().unwrap().get(name).cloned())
    }

    async fn write_check(&self, payload: &CheckPayload) -> Result<Check, ApiError> {
        self.gate()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let name = payload
            .name
            .clone()
            .ok_or_else(|| ApiError::Invocation("payload without a name".to_string()))?;

        let mut checks = self.checks.lock().unwrap();
        let mut check = checks
            .get(&name)
            .cloned()
            .unwrap_or_else(|| make_check(&name));
        apply_payload(&mut check, payload);
        checks.insert(name, check.clone());
        Ok(check)
    }

    async fn update_check(&self, uuid: Uuid, payload: &CheckPayload) -> Result<Check, ApiError> {
        self.gate()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut checks = self.checks.lock().unwrap();
        let check = checks
            .values_mut()
            .find(|check| check.uuid == uuid)
            .ok_or_else(|| ApiError::NotFound(uuid.to_string()))?;
        apply_payload(check, payload);
        Ok(check.clone())
    }

    async fn delete_check(&self, uuid: Uuid) -> Result<(), ApiError> {
        self.gate()?;
        let mut checks = self.checks.lock().unwrap();
        let name = checks
            .values()
            .find(|check| check.uuid == uuid)
            .map(|check| check.name.clone())
            .ok_or_else(|| ApiError::NotFound(uuid.to_string()))?;
        checks.remove(&name);
        Ok(())
    }

    async fn pause_check(&self, uuid: Uuid) -> Result<Check, ApiError> {
        self.gate()?;
        let mut checks = self.checks.lock().unwrap();
        let check = checks
            .values_mut()
            .find(|check| check.uuid == uuid)
            .ok_or_else(|| ApiError::NotFound(uuid.to_string()))?;
        check.status = CheckStatus::Paused;
        Ok(check.clone())
    }

    async fn resume_check(&self, uuid: Uuid) -> Result<Check, ApiError> {
        self.gate()?;
        let mut checks = self.checks.lock().unwrap();
        let check = checks
            .values_mut()
            .find(|check| check.uuid == uuid)
            .ok_or_else(|| ApiError::NotFound(uuid.to_string()))?;
        check.status = CheckStatus::New;
        Ok(check.clone())
    }

    async fn list_channels(&self) -> Result<Vec<Channel>, ApiError> {
        self.gate()?;
        Ok(self.channels.lock().unwrap().clone())
    }
}

/// Transport that loops every call back into a "remote" coordinator, the
/// way a real issuer would serve it. The issuer sees `requester` as the
/// sender identity regardless of the addressed target.
pub struct LoopbackTransport {
    remote: Arc<IssueCoordinator>,
    requester: String,
    pub calls: AtomicUsize,
}

impl LoopbackTransport {
    pub fn new(remote: Arc<IssueCoordinator>, requester: impl Into<String>) -> Self {
        Self {
            remote,
            requester: requester.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RemoteTransport for LoopbackTransport {
    async fn call(
        &self,
        _target: &str,
        request: IssueRequest,
    ) -> Result<IssueResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.remote.issue_ping_url_remote(&self.requester, request).await)
    }
}

/// Transport whose peer answers with an envelope carrying neither data
/// nor errors.
pub struct EmptyEnvelopeTransport;

#[async_trait]
impl RemoteTransport for EmptyEnvelopeTransport {
    async fn call(
        &self,
        _target: &str,
        _request: IssueRequest,
    ) -> Result<IssueResponse, TransportError> {
        Ok(IssueResponse {
            data: None,
            errors: Vec::new(),
        })
    }
}

/// Transport on which every call fails below the envelope level.
pub struct DeadTransport;

#[async_trait]
impl RemoteTransport for DeadTransport {
    async fn call(
        &self,
        target: &str,
        _request: IssueRequest,
    ) -> Result<IssueResponse, TransportError> {
        Err(TransportError::NoResponse(target.to_string()))
    }
}
