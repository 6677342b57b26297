//! Token Management
//!
//! Keeps the bearer token for the Hello API. A token is requested lazily with the
//! OAuth2 password grant on first use and again once it has expired. The cached
//! token sits behind a mutex that is held for the whole check-and-refresh, so
//! concurrent scrapes never authenticate twice.

use crate::config::HelloConfig;
use crate::error::{ExporterError, Result};
use crate::hello::types::TokenInfo;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// OAuth2 client identity of the Hello apps
const CLIENT_ID: &str = "8d3c1664-05ae-47e4-bcdb-477489590aa4";
const CLIENT_SECRET: &str = "4f771f6f-5c10-4104-bbc6-3333f5b11bf9";

const TOKEN_PATH: &str = "/v1/oauth2/token";

/// Upper bound on how long a token is trusted, whatever `expires_in` says
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Source of the current time for token expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cached bearer token
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub value: String,
    pub expires_at: Instant,
}

impl AuthToken {
    /// Usable iff non-empty and not yet expired
    pub fn is_valid_at(&self, now: Instant) -> bool {
        !self.value.is_empty() && self.expires_at > now
    }
}

/// Owns the credentials and the cached token
pub struct TokenManager {
    config: Arc<HelloConfig>,
    http: Client,
    clock: Arc<dyn Clock>,
    token: Mutex<Option<AuthToken>>,
}

impl TokenManager {
    pub fn new(config: Arc<HelloConfig>, http: Client, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            http,
            clock,
            token: Mutex::new(None),
        }
    }

    fn token_url(&self) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), TOKEN_PATH)
    }

    /// Returns a valid access token, authenticating first if needed
    pub fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(token) = guard.as_ref() {
            if token.is_valid_at(self.clock.now()) {
                return Ok(token.value.clone());
            }
            debug!("Access token expired");
        }

        // Drop any stale token so a failed refresh leaves us unauthenticated
        *guard = None;
        let token = self.request_token()?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Forgets the cached token if it is still the one that was rejected
    ///
    /// A concurrent scrape may already have replaced it with a fresh token,
    /// which is kept.
    pub fn invalidate(&self, rejected: &str) {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if guard.as_ref().is_some_and(|token| token.value == rejected) {
            *guard = None;
        }
    }

    fn request_token(&self) -> Result<AuthToken> {
        info!("Authenticating with Hello API as {}", self.config.username);

        let form = [
            ("grant_type", "password"),
            ("client_id", CLIENT_ID),
            ("client_secret", CLIENT_SECRET),
            ("username", self.config.username.as_str()),
            ("password", self.config.password.expose_secret()),
        ];

        let response = self.http.post(self.token_url()).form(&form).send()?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(ExporterError::WrongCredentials),
            status => return Err(ExporterError::UnexpectedStatus(status)),
        }

        let body = response.text()?;
        let info: TokenInfo = serde_json::from_str(&body)?;

        // expires_in is in seconds, as documented for OAuth2 token responses
        let lifetime = token_lifetime(info.expires_in);
        debug!("Received access token valid for {:?}", lifetime);

        let now = self.clock.now();
        Ok(AuthToken {
            value: info.access_token,
            expires_at: now.checked_add(lifetime).unwrap_or(now),
        })
    }
}

fn token_lifetime(expires_in: i64) -> Duration {
    Duration::from_secs(expires_in.max(0) as u64).min(MAX_TOKEN_LIFETIME)
}
