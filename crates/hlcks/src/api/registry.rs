//! Memoizing client factory.
//!
//! Clients are keyed by their connection tuple (endpoint, credential,
//! verify mode), constructed lazily and reused for the life of the process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::client::HealthchecksClient;
use crate::config::ApiProfile;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    url: String,
    token: String,
    verify: Option<bool>,
}

impl From<&ApiProfile> for ClientKey {
    fn from(profile: &ApiProfile) -> Self {
        ClientKey {
            url: profile.url.clone(),
            token: profile.token.clone(),
            verify: profile.verify,
        }
    }
}

/// Registry of monitoring-API clients owned by the process
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<ClientKey, Arc<HealthchecksClient>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the client for a connection profile, creating it on first use.
    pub async fn client_for(
        &self,
        profile: &ApiProfile,
    ) -> Result<Arc<HealthchecksClient>, ApiError> {
        let key = ClientKey::from(profile);
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&key) {
            return Ok(Arc::clone(client));
        }
        let client = Arc::new(HealthchecksClient::new(profile)?);
        clients.insert(key, Arc::clone(&client));
        Ok(client)
    }
}
