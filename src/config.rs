use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub hello: HelloConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HelloConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: SecretString,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_password() -> SecretString {
    SecretString::from(String::new())
}

fn default_api_url() -> String {
    "https://api.hello.is".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for HelloConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: default_password(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("HELLO_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Rejects configurations the exporter cannot run with
    pub fn validate(&self) -> std::result::Result<(), ExporterError> {
        if self.server.addr.trim().is_empty() {
            return Err(ExporterError::Config("no listen address".to_string()));
        }
        if self.hello.username.trim().is_empty() {
            return Err(ExporterError::Config(
                "username can not be blank".to_string(),
            ));
        }
        if self.hello.password.expose_secret().is_empty() {
            return Err(ExporterError::Config(
                "password can not be blank".to_string(),
            ));
        }
        if self.hello.timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
