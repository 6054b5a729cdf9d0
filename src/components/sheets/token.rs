use crate::config::GoogleAuth;
use crate::error::{auth_error, SyncResult};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Seconds before expiry at which a cached token is treated as stale
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Token response shared by the OAuth endpoint and the metadata server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Hands out bearer tokens for the Sheets API, refreshing them when needed
#[derive(Clone)]
pub struct TokenManager {
    auth: GoogleAuth,
    client: Client,
    cache: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenManager {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            auth,
            client: Client::new(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token, from cache or by requesting a new one
    pub async fn get_token(&self) -> SyncResult<String> {
        // Check the cache first
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.as_ref() {
                if token.expires_at - EXPIRY_MARGIN_SECS > Utc::now().timestamp() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let fresh = self.fetch_token().await?;
        let access_token = fresh.access_token.clone();
        *self.cache.write().await = Some(fresh);

        Ok(access_token)
    }

    /// Request a new token from the configured source
    async fn fetch_token(&self) -> SyncResult<CachedToken> {
        let request = match &self.auth {
            GoogleAuth::StaticToken(token) => {
                return Ok(CachedToken {
                    access_token: token.clone(),
                    expires_at: i64::MAX,
                })
            }
            GoogleAuth::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
                token_url,
            } => {
                debug!("Refreshing Google access token");
                let params = [
                    ("client_id", client_id.as_str()),
                    ("client_secret", client_secret.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                    ("grant_type", "refresh_token"),
                ];
                self.client.post(token_url).form(&params)
            }
            GoogleAuth::Metadata { url } => {
                debug!("Requesting access token from metadata server");
                self.client.get(url).header("Metadata-Flavor", "Google")
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to request token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to request token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = token
            .access_token
            .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?;

        // Calculate expiry
        let expires_in = token.expires_in.unwrap_or(3600);

        Ok(CachedToken {
            access_token,
            expires_at: Utc::now().timestamp() + expires_in,
        })
    }
}
