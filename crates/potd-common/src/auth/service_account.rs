//! Google service-account assertions
//!
//! Builds the RS256-signed JWT that a service account exchanges for an OAuth access
//! token, using the `jsonwebtoken` crate.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default OAuth token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Read-only spreadsheet scope
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Assertion lifetime accepted by Google (maximum one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The subset of a service-account `credentials.json` the bot needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parse a key from the JSON contents of a credentials file
    ///
    /// # Errors
    /// Returns `AppError::Config` if the JSON is not a service-account key
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Invalid service account key: {e}")))
    }

    /// Read and parse a credentials file
    ///
    /// # Errors
    /// Returns `AppError::Config` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read credentials file {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }
}

/// JWT claims for the OAuth 2.0 JWT bearer grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Issuer (service account email)
    pub iss: String,
    /// Space-separated scopes
    pub scope: String,
    /// Audience (token endpoint)
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signs service-account assertions
#[derive(Clone)]
pub struct ServiceAccountSigner {
    client_email: String,
    token_uri: String,
    key_id: Option<String>,
    encoding_key: EncodingKey,
}

impl ServiceAccountSigner {
    /// Create a signer from a service-account key
    ///
    /// # Errors
    /// Returns `AppError::Config` if the private key is not a valid RSA PEM
    pub fn new(key: &ServiceAccountKey) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid service account private key: {e}")))?;

        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            key_id: key.private_key_id.clone(),
            encoding_key,
        })
    }

    /// Token endpoint the assertion is addressed to
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Build the claims for an assertion issued at `now`
    #[must_use]
    pub fn claims(&self, scope: &str, now: DateTime<Utc>) -> AssertionClaims {
        AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        }
    }

    /// Sign an assertion for `scope`
    ///
    /// # Errors
    /// Returns `AppError::Internal` if signing fails
    pub fn sign(&self, scope: &str) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        encode(&header, &self.claims(scope, Utc::now()), &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign assertion: {e}")))
    }
}

impl std::fmt::Debug for ServiceAccountSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountSigner")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
