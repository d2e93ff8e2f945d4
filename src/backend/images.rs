//! Best-effort image search for places

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::backend::traits::ImageSearch;
use crate::config::ImagesConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "webformatURL")]
    webformat_url: String,
}

/// Client for a keyed photo search API
pub struct ImageSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
    max_results: usize,
}

impl ImageSearchClient {
    pub fn new(config: &ImagesConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size(),
            max_results: config.result_cap() as usize,
        })
    }

    async fn fetch(&self, term: &str) -> std::result::Result<Vec<String>, String> {
        let per_page = self.page_size.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", term),
                ("image_type", "photo"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Image search returned {}: {}", status, body));
        }

        let result = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(result
            .hits
            .into_iter()
            .map(|hit| hit.webformat_url)
            .take(self.max_results)
            .collect())
    }
}

#[async_trait]
impl ImageSearch for ImageSearchClient {
    async fn search(&self, term: &str) -> Vec<String> {
        debug!(term = %term, "Searching images");

        match self.fetch(term).await {
            Ok(images) => {
                debug!(term = %term, images = images.len(), "Images found");
                images
            }
            Err(e) => {
                warn!(term = %term, error = %e, "Image search failed, continuing without images");
                Vec::new()
            }
        }
    }
}
