//! HTTP client for the Healthchecks v2 API.
//!
//! Note that check names are assumed to be unique by this crate; the remote
//! API does not enforce that.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::types::{
    Channel, Check, CheckPayload, CheckRecord, Flip, FlipQuery, Ping,
};
use super::CheckApi;
use crate::config::ApiProfile;
use crate::error::ApiError;

/// Client for a Healthchecks-compatible monitoring API
#[derive(Debug)]
pub struct HealthchecksClient {
    base: String,
    token: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChecksPage {
    checks: Vec<CheckRecord>,
}

#[derive(Debug, Deserialize)]
struct ChannelsPage {
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct PingsPage {
    pings: Vec<Ping>,
}

#[derive(Debug, Deserialize)]
struct FlipsPage {
    flips: Vec<Flip>,
}

impl HealthchecksClient {
    pub fn new(profile: &ApiProfile) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if profile.verify == Some(false) {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;

        Ok(Self {
            base: profile.url.trim_end_matches('/').to_string(),
            token: profile.token.clone(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .header("X-Api-Key", &self.token)
            .query(query)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .header("X-Api-Key", &self.token)
            .json(payload)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn post_empty(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .header("X-Api-Key", &self.token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Translate a non-success status into the typed error taxonomy, pulling
    /// the message from the response body where the API provides one.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        let message = if message.is_empty() {
            "(no error message)".to_string()
        } else {
            message
        };
        Err(ApiError::from_status(status.as_u16(), message))
    }

    /// List pings of an existing check, most recent first.
    pub async fn list_pings(
        &self,
        uuid: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<Ping>, ApiError> {
        let page: PingsPage = self.get_json(&format!("checks/{uuid}/pings/"), &[]).await?;
        let mut pings = page.pings;
        if let Some(limit) = limit {
            pings.truncate(limit);
        }
        Ok(pings)
    }

    /// Fetch the raw logged body of one ping.
    pub async fn fetch_ping(&self, uuid: Uuid, number: u64) -> Result<String, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("checks/{uuid}/pings/{number}/body")))
            .header("X-Api-Key", &self.token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Fetch one notification integration by id. The API only exposes the
    /// full list, so this scans it.
    pub async fn fetch_channel(&self, id: Uuid) -> Result<Channel, ApiError> {
        let channels = self.list_channels().await?;
        channels
            .into_iter()
            .find(|channel| channel.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    /// List status flips of an existing check.
    pub async fn list_flips(&self, uuid: Uuid, query: &FlipQuery) -> Result<Vec<Flip>, ApiError> {
        let page: FlipsPage = self
            .get_json(&format!("checks/{uuid}/flips/"), &flip_query_params(query))
            .await?;
        let mut flips = page.flips;
        if let Some(limit) = query.limit {
            flips.truncate(limit);
        }
        Ok(flips)
    }
}

pub(crate) fn flip_query_params(query: &FlipQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(seconds) = query.seconds {
        params.push(("seconds", seconds.to_string()));
    }
    if let Some(start) = query.start {
        params.push(("start", start.to_string()));
    }
    if let Some(end) = query.end {
        params.push(("end", end.to_string()));
    }
    params
}

#[async_trait::async_trait]
impl CheckApi for HealthchecksClient {
    async fn list_checks(&self, tags: &[String]) -> Result<Vec<Check>, ApiError> {
        let query: Vec<(&str, String)> = tags.iter().map(|t| ("tag", t.clone())).collect();
        let page: ChecksPage = self.get_json("checks/", &query).await?;
        page.checks.into_iter().map(Check::try_from).collect()
    }

    async fn get_check(&self, uuid: Uuid) -> Result<Check, ApiError> {
        let record: CheckRecord = self.get_json(&format!("checks/{uuid}"), &[]).await?;
        Check::try_from(record)
    }

    async fn find_check(&self, name: &str) -> Result<Option<Check>, ApiError> {
        let checks = self.list_checks(&[]).await?;
        Ok(checks.into_iter().find(|check| check.name == name))
    }

    async fn write_check(&self, payload: &CheckPayload) -> Result<Check, ApiError> {
        let mut body = payload.clone();
        body.unique = vec!["name".to_string()];
        let record: CheckRecord = self.post_json("checks/", &body).await?;
        Check::try_from(record)
    }

    async fn update_check(&self, uuid: Uuid, payload: &CheckPayload) -> Result<Check, ApiError> {
        let record: CheckRecord = self
            .post_json(&format!("checks/{uuid}"), payload)
            .await?;
        Check::try_from(record)
    }

    async fn delete_check(&self, uuid: Uuid) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("checks/{uuid}")))
            .header("X-Api-Key", &self.token)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn pause_check(&self, uuid: Uuid) -> Result<Check, ApiError> {
        let response = self.post_empty(&format!("checks/{uuid}/pause")).await?;
        let record: CheckRecord = response.json().await?;
        Check::try_from(record)
    }

    async fn resume_check(&self, uuid: Uuid) -> Result<Check, ApiError> {
        let response = self.post_empty(&format!("checks/{uuid}/resume")).await?;
        let record: CheckRecord = response.json().await?;
        Check::try_from(record)
    }

    async fn list_channels(&self) -> Result<Vec<Channel>, ApiError> {
        let page: ChannelsPage = self.get_json("channels/", &[]).await?;
        Ok(page.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_query_params_skips_unset_fields() {
        let query = FlipQuery {
            seconds: Some(3600),
            start: None,
            end: Some(1700000000),
            limit: Some(5),
        };
        let params = flip_query_params(&query);
        assert_eq!(
            params,
            vec![("seconds", "3600".to_string()), ("end", "1700000000".to_string())]
        );
    }

    #[test]
    fn flip_query_params_empty_by_default() {
        assert!(flip_query_params(&FlipQuery::default()).is_empty());
    }
}
