//! Hello API Client
//!
//! Blocking HTTP client for the Hello (Sense) cloud API.
//!
//! # Architecture
//!
//! - **Transport**: `reqwest` blocking client with a fixed per-request timeout
//! - **Authentication**: OAuth2 password grant, handled by [`TokenManager`]
//! - **Requests**: every call ensures a valid token, then issues a single GET.
//!   There are no retries.
//!
//! # Example
//!
//! ```no_run
//! use hello_exporter::config::HelloConfig;
//! use hello_exporter::hello::HelloClient;
//! use secrecy::SecretString;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = HelloConfig {
//!     username: "sleeper@example.com".to_string(),
//!     password: SecretString::from("hunter2"),
//!     api_url: "https://api.hello.is".to_string(),
//!     timeout_seconds: 5,
//! };
//!
//! let client = HelloClient::new(config)?;
//! let room = client.fetch_room_info()?;
//! println!("{} °C", room.temperature.value);
//! # Ok(())
//! # }
//! ```

use crate::config::HelloConfig;
use crate::error::{ExporterError, Result};
use crate::hello::auth::{Clock, SystemClock, TokenManager};
use crate::hello::types::*;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEVICES_PATH: &str = "/v2/devices";
const ROOM_INFO_PATH: &str = "/v1/room/current";

/// Client for the Hello API
///
/// # Thread Safety
///
/// The client is `Send` and `Sync`. Token refresh is serialized inside
/// [`TokenManager`], so concurrent scrapes share one token.
pub struct HelloClient {
    config: Arc<HelloConfig>,
    http: Client,
    tokens: TokenManager,
}

impl HelloClient {
    pub fn new(config: HelloConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a client that reads token expiry from the given clock
    pub fn with_clock(config: HelloConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let config = Arc::new(config);
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let tokens = TokenManager::new(config.clone(), http.clone(), clock);
        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    /// Devices connected to the account
    pub fn fetch_devices(&self) -> Result<DeviceList> {
        self.get_json(DEVICES_PATH, &[])
    }

    /// Current room readings, temperatures in degrees Celsius
    pub fn fetch_room_info(&self) -> Result<RoomInfo> {
        self.get_json(ROOM_INFO_PATH, &[("temp_unit", "c")])
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Issues an authorized GET and decodes the JSON body
    fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let token = self.tokens.access_token()?;

        debug!("Requesting {}", path);
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(&token)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            if status == StatusCode::UNAUTHORIZED {
                // Token was revoked server side, authenticate again next scrape
                self.tokens.invalidate(&token);
            }
            return Err(ExporterError::UnexpectedStatus(status));
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(ExporterError::Json)
    }
}
