//! The issuance coordinator.
//!
//! One entry point serves both sides of a delegation: a caller asking for a
//! ping URL (possibly via a remote issuer), and an issuer serving a peer's
//! request against its own monitoring API. Credentials never leave the
//! issuer; the requester only ever sees the resulting URL.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::CheckApi;
use crate::cache::{ReturnsCache, RETURNS_BANK};
use crate::check::{reconcile, CheckParams};
use crate::error::HlcksError;
use crate::policy::{GlobMatcher, PolicyStore, RequesterMatcher};
use crate::protocol::{IssueRequest, IssueResponse};
use crate::transport::{RemoteTransport, TransportError};

/// Coordinates check reconciliation and ping URL issuance
pub struct IssueCoordinator {
    identity: String,
    api: Arc<dyn CheckApi>,
    policies: PolicyStore,
    matcher: Arc<dyn RequesterMatcher>,
    cache: Arc<dyn ReturnsCache>,
    transport: RwLock<Option<Arc<dyn RemoteTransport>>>,
}

impl IssueCoordinator {
    pub fn new(
        identity: impl Into<String>,
        api: Arc<dyn CheckApi>,
        policies: PolicyStore,
        cache: Arc<dyn ReturnsCache>,
    ) -> Self {
        Self {
            identity: identity.into(),
            api,
            policies,
            matcher: Arc::new(GlobMatcher),
            cache,
            transport: RwLock::new(None),
        }
    }

    /// Replace the default glob matcher.
    pub fn with_matcher(mut self, matcher: Arc<dyn RequesterMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Attach the transport used for delegated issuance. Until this is
    /// called, delegation fails and only local issuance works.
    pub async fn set_transport(&self, transport: Arc<dyn RemoteTransport>) {
        *self.transport.write().await = Some(transport);
    }

    /// Issue a ping URL for a check, creating or updating it first.
    ///
    /// With `issuer` naming another node, the request is delegated over the
    /// transport and `policy` is mandatory. With `issuer` absent or equal
    /// to this node's identity, the check is managed against the local
    /// monitoring API. On recoverable failure the last successfully issued
    /// URL is served from the cache instead.
    pub async fn issue_ping_url(
        &self,
        name: &str,
        params: &CheckParams,
        issuer: Option<&str>,
        policy: Option<&str>,
    ) -> Result<String, HlcksError> {
        self.issue_for(name, params, issuer, policy, None).await
    }

    /// Serve a peer's issuance request. Always answers with an envelope;
    /// errors travel inside it.
    pub async fn issue_ping_url_remote(
        &self,
        requester: &str,
        request: IssueRequest,
    ) -> IssueResponse {
        let result = self
            .issue_for(
                &request.name,
                &request.params,
                Some(&self.identity),
                Some(&request.policy),
                Some(requester),
            )
            .await;

        match result {
            Ok(url) => IssueResponse::success(url),
            Err(error) => {
                warn!(%requester, "issuance for peer failed: {error}");
                IssueResponse::failure(error.to_string())
            }
        }
    }

    async fn issue_for(
        &self,
        name: &str,
        params: &CheckParams,
        issuer: Option<&str>,
        policy: Option<&str>,
        requester: Option<&str>,
    ) -> Result<String, HlcksError> {
        let delegated = issuer.is_some_and(|issuer| issuer != self.identity);

        // When this node is the issuer, the check is namespaced by who
        // asked for it; two requesters with the same check name must not
        // collide.
        let check_name = if issuer.is_some() && !delegated {
            let requester = requester.unwrap_or(&self.identity);
            format!("{requester}_{name}")
        } else {
            name.to_string()
        };

        let attempt = if delegated {
            self.delegate(issuer.unwrap_or_default(), name, params, policy)
                .await
        } else {
            self.issue_local(&check_name, params, policy, requester).await
        };

        match attempt {
            Ok(url) => {
                self.cache.store(RETURNS_BANK, &check_name, &url).await?;
                Ok(url)
            }
            Err(error) if error.recoverable_via_cache() => {
                match self.cache.fetch(RETURNS_BANK, &check_name).await {
                    Ok(Some(url)) => {
                        warn!(
                            check = %check_name,
                            "issuance failed, serving last known URL: {error}"
                        );
                        Ok(url)
                    }
                    Ok(None) => Err(error),
                    Err(cache_error) => {
                        warn!(check = %check_name, "cache fallback failed: {cache_error}");
                        Err(error)
                    }
                }
            }
            Err(error) => Err(error),
        }
    }

    /// Ask a remote issuer for the URL.
    async fn delegate(
        &self,
        issuer: &str,
        name: &str,
        params: &CheckParams,
        policy: Option<&str>,
    ) -> Result<String, HlcksError> {
        let policy = policy.ok_or_else(|| {
            HlcksError::Invocation("a policy is required when delegating issuance".to_string())
        })?;

        let transport = self
            .transport
            .read()
            .await
            .clone()
            .ok_or(TransportError::ChannelClosed)?;

        let request = IssueRequest {
            name: name.to_string(),
            policy: policy.to_string(),
            params: params.clone(),
        };

        info!(%issuer, check = name, %policy, "delegating issuance");
        let response = transport.call(issuer, request).await?;

        match (response.data, response.errors) {
            (Some(url), errors) if errors.is_empty() => Ok(url),
            (_, errors) if !errors.is_empty() => Err(HlcksError::Rejected {
                issuer: issuer.to_string(),
                errors,
            }),
            _ => Err(TransportError::MalformedEnvelope {
                peer: issuer.to_string(),
                reason: "response carried neither data nor errors".to_string(),
            }
            .into()),
        }
    }

    /// Reconcile the check against the local monitoring API and return its
    /// ping URL.
    async fn issue_local(
        &self,
        check_name: &str,
        params: &CheckParams,
        policy: Option<&str>,
        requester: Option<&str>,
    ) -> Result<String, HlcksError> {
        let mut effective = params.clone();

        if let Some(policy_name) = policy {
            let policy = self.policies.resolve(policy_name)?;

            if let Some(pattern) = &policy.matcher {
                let requester = requester.unwrap_or(&self.identity);
                let allowed = self
                    .matcher
                    .matches(pattern, requester)
                    .map_err(|error| HlcksError::Policy {
                        policy: policy_name.to_string(),
                        reason: error.to_string(),
                    })?;
                if !allowed {
                    return Err(HlcksError::PermissionDenied {
                        requester: requester.to_string(),
                        policy: policy_name.to_string(),
                    });
                }
            }

            effective = effective.apply_overrides(&policy.params);
        }

        let current = self.api.find_check(check_name).await?;
        let reconciliation =
            reconcile(self.api.as_ref(), check_name, &effective, current.as_ref()).await?;

        if !reconciliation.changes.is_empty() {
            match &current {
                None => {
                    self.api.write_check(&reconciliation.payload).await?;
                    info!(check = check_name, "check created");
                }
                Some(check) => {
                    self.api
                        .update_check(check.uuid, &reconciliation.payload)
                        .await?;
                    info!(check = check_name, "check updated");
                }
            }
        }

        let check = self
            .api
            .find_check(check_name)
            .await?
            .ok_or_else(|| HlcksError::MissingCheck(check_name.to_string()))?;

        Ok(check.ping_url.to_string())
    }
}
