//! HTTP client for the shelfscan profile server

use super::{validate_user_id, RemoteProfileStore, RemoteResult};
use crate::config::ScanConfig;
use crate::error::RemoteError;
use crate::types::{Profile, RemoteBook};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Remote profile store reached over HTTP
pub struct HttpProfileStore {
    client: Client,
    base_url: String,
}

impl HttpProfileStore {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ScanConfig) -> RemoteResult<Self> {
        let client = Client::builder().timeout(config.http_timeout()).build()?;
        Ok(Self::new(config.remote_url.clone(), client))
    }

    fn profile_url(&self, user_id: &str) -> RemoteResult<String> {
        validate_user_id(user_id)?;
        Ok(format!("{}/api/v1/profiles/{}", self.base_url, user_id))
    }
}

#[async_trait]
impl RemoteProfileStore for HttpProfileStore {
    async fn get_profile(&self, user_id: &str) -> RemoteResult<Profile> {
        let resp = self.client.get(self.profile_url(user_id)?).send().await?;

        match resp.status() {
            status if status.is_success() => Ok(resp.json().await?),
            StatusCode::NOT_FOUND => Ok(Profile::empty(user_id)),
            status => Err(RemoteError::Rejected(format!(
                "Fetching profile failed: {}",
                status
            ))),
        }
    }

    async fn set_books(&self, user_id: &str, books: Vec<RemoteBook>) -> RemoteResult<()> {
        let url = format!("{}/books", self.profile_url(user_id)?);
        let resp = self.client.put(url).json(&books).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected(format!(
                "Storing books failed ({}): {}",
                status, body
            )));
        }
        Ok(())
    }
}
