//! Google Books API client

use super::{MetadataResult, MetadataService};
use crate::config::ScanConfig;
use crate::error::MetadataError;
use crate::types::Volume;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Response envelope of the volumes endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VolumesResponse {
    total_items: u32,
    items: Vec<VolumeItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeItem {
    #[serde(default)]
    volume_info: Volume,
}

/// Decode a volumes response body into volumes, best match first
pub fn parse_volumes(body: &str) -> MetadataResult<Vec<Volume>> {
    let response: VolumesResponse = serde_json::from_str(body)
        .map_err(|e| MetadataError::InvalidResponse(e.to_string()))?;
    tracing::debug!(
        total = response.total_items,
        returned = response.items.len(),
        "Decoded volumes response"
    );
    Ok(response
        .items
        .into_iter()
        .map(|item| item.volume_info)
        .filter(|volume| !volume.title.trim().is_empty())
        .collect())
}

/// Build the `q` parameter for a title/author search
pub fn title_author_query(title: &str, author: Option<&str>) -> MetadataResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(MetadataError::InvalidQuery("empty title".to_string()));
    }
    let mut query = format!("intitle:{}", title);
    if let Some(author) = author.map(str::trim).filter(|a| !a.is_empty()) {
        query.push_str(&format!("+inauthor:{}", author));
    }
    Ok(query)
}

/// Metadata service backed by the Google Books volumes endpoint
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Create a client from configuration
    pub fn from_config(config: &ScanConfig) -> MetadataResult<Self> {
        let client = Client::builder().timeout(config.http_timeout()).build()?;
        Ok(Self::new(
            config.metadata_url.clone(),
            config.metadata_api_key.clone(),
            client,
        ))
    }

    async fn query(&self, q: &str, max_results: usize) -> MetadataResult<Vec<Volume>> {
        let mut params = vec![
            ("q", q.to_string()),
            ("maxResults", max_results.clamp(1, 40).to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let resp = self.client.get(&self.base_url).query(&params).send().await?;

        if !resp.status().is_success() {
            return Err(MetadataError::Http(format!(
                "Volumes search failed: {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        parse_volumes(&body)
    }
}

#[async_trait]
impl MetadataService for GoogleBooksClient {
    async fn search_by_title_author(
        &self,
        title: &str,
        author: Option<&str>,
        max_results: usize,
    ) -> MetadataResult<Vec<Volume>> {
        let q = title_author_query(title, author)?;
        self.query(&q, max_results).await
    }

    async fn search_by_isbn(&self, isbn: &str) -> MetadataResult<Vec<Volume>> {
        if isbn.is_empty() {
            return Err(MetadataError::InvalidQuery("empty ISBN".to_string()));
        }
        self.query(&format!("isbn:{}", isbn), 1).await
    }
}
