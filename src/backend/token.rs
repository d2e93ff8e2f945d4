//! OAuth2 client-credentials exchange for the flight offer API

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::traits::{Credential, TokenProvider};
use crate::config::FlightsConfig;
use crate::error::{AppError, Result};

/// Seconds shaved off a token's lifetime before it is considered stale
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Fetches a fresh bearer token on every call
pub struct OAuthTokenProvider {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl OAuthTokenProvider {
    pub fn new(config: &FlightsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token_url: config.token_url(),
            client_id: config.api_key.clone(),
            client_secret: config.api_secret.clone(),
        })
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenProvider {
    async fn acquire(&self) -> Result<Credential> {
        debug!(url = %self.token_url, "Requesting flight provider token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Token request failed");
                AppError::Auth(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Token endpoint rejected credentials");
            return Err(AppError::Auth(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let token = response.json::<TokenResponse>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse token response");
            AppError::Auth(format!("Failed to parse token response: {}", e))
        })?;

        debug!(expires_in = ?token.expires_in, "Obtained flight provider token");

        Ok(Credential {
            access_token: token.access_token,
            expires_in: token.expires_in,
        })
    }
}

#[derive(Debug, Clone)]
struct CachedCredential {
    credential: Credential,
    stale_at: DateTime<Utc>,
}

/// Reuses a credential until shortly before the provider says it expires
pub struct CachedTokenProvider {
    inner: Arc<dyn TokenProvider>,
    cached: Mutex<Option<CachedCredential>>,
}

impl CachedTokenProvider {
    pub fn new(inner: Arc<dyn TokenProvider>) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }

    fn cached_at(&self, now: DateTime<Utc>) -> Option<Credential> {
        let cached = self.cached.lock();
        cached
            .as_ref()
            .filter(|c| c.stale_at > now)
            .map(|c| c.credential.clone())
    }

    fn store(&self, credential: &Credential, now: DateTime<Utc>) {
        // Tokens without a usable lifetime are never cached
        let lifetime = credential
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| secs - EXPIRY_MARGIN_SECS)
            .filter(|secs| *secs > 0)
            .and_then(TimeDelta::try_seconds);

        let mut cached = self.cached.lock();
        *cached = lifetime.map(|lifetime| CachedCredential {
            credential: credential.clone(),
            stale_at: now + lifetime,
        });
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn acquire(&self) -> Result<Credential> {
        if let Some(credential) = self.cached_at(Utc::now()) {
            debug!("Reusing cached flight provider token");
            return Ok(credential);
        }

        let credential = self.inner.acquire().await?;
        self.store(&credential, Utc::now());
        Ok(credential)
    }
}
