//! Service account authentication against Google OAuth2
//!
//! Signs a short-lived JWT assertion with the service account's private key
//! and exchanges it for a bearer token. The token is cached for the lifetime
//! of the manager and only refetched once it is about to expire.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{debug, info};
use std::path::Path;
use tokio::sync::Mutex;

use super::models::{AssertionClaims, ServiceAccountKey, TokenInfo, TokenResponse};

/// OAuth scope granting read/write access to spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion (Google caps it at one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Issues and caches access tokens for one service account
#[derive(Debug)]
pub struct AuthManager {
    http: reqwest::Client,
    key: ServiceAccountKey,
    scope: String,
    token: Mutex<Option<TokenInfo>>,
}

impl AuthManager {
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Self {
        Self {
            http,
            key,
            scope: SPREADSHEETS_SCOPE.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Load the service account key from a JSON key file
    pub fn from_key_file(http: reqwest::Client, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read service account key: {}", path.display())
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&content).with_context(|| {
            format!("Invalid service account key file: {}", path.display())
        })?;
        Ok(Self::new(http, key))
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Get a valid access token, fetching a new one if needed
    pub async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if !token.is_expired(Utc::now()) {
                return Ok(token.access_token.clone());
            }
            debug!("Cached access token expired, requesting a new one");
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<TokenInfo> {
        let assertion = self.sign_assertion()?;

        info!("Requesting access token for {}", self.key.client_email);
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Failed to reach the OAuth token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token request failed with HTTP {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        let expires_in = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        Ok(TokenInfo {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        })
    }

    fn sign_assertion(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .context("Service account private key is not a valid RSA PEM key")?;

        jsonwebtoken::encode(&header, &claims, &encoding_key)
            .context("Failed to sign token assertion")
    }
}
