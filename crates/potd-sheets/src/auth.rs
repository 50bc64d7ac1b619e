//! Access tokens for the Sheets API
//!
//! A service account signs a JWT assertion and trades it for a bearer token at the
//! OAuth endpoint. Tokens are cached until shortly before they expire.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use potd_common::{ServiceAccountKey, ServiceAccountSigner, SHEETS_READONLY_SCOPE};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{map_transport_error, SheetsError};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Refresh this long before the token actually expires
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Source of bearer tokens for API calls
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, SheetsError>;
}

/// A fixed token, for API keys issued out of band and for tests
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, SheetsError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Exchanges signed assertions for access tokens
pub struct ServiceAccountTokenProvider {
    http: Client,
    signer: ServiceAccountSigner,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: &ServiceAccountKey, timeout: Duration) -> Result<Self, SheetsError> {
        let signer = ServiceAccountSigner::new(key).map_err(|e| SheetsError::Auth(e.to_string()))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;

        Ok(Self {
            http,
            signer,
            cached: Mutex::new(None),
        })
    }

    /// Load the key from a `credentials.json` file
    pub fn from_file(path: &str, timeout: Duration) -> Result<Self, SheetsError> {
        let key = ServiceAccountKey::from_file(path).map_err(|e| SheetsError::Auth(e.to_string()))?;
        Self::new(&key, timeout)
    }

    #[instrument(skip(self))]
    async fn exchange(&self) -> Result<CachedToken, SheetsError> {
        let assertion = self
            .signer
            .sign(SHEETS_READONLY_SCOPE)
            .map_err(|e| SheetsError::Auth(e.to_string()))?;

        let response = self
            .http
            .post(self.signer.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(SheetsError::Auth(SheetsError::status(status, &body).to_string()));
        }

        let token: TokenResponse =
            serde_json::from_slice(&body).map_err(|e| SheetsError::Decode(e.to_string()))?;
        debug!(expires_in = token.expires_in, "Access token issued");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, SheetsError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.token.clone());
        }

        let token = self.exchange().await?;
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }
}
