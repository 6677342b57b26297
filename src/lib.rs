//! Hello Sense Prometheus Exporter
//!
//! A Prometheus metrics exporter for the Hello (Sense) sleep tracker cloud API.
//!
//! # Overview
//!
//! On every scrape the exporter authenticates against the Hello API (reusing the
//! cached bearer token while it is valid), fetches the devices and the current
//! room readings, and exposes them in Prometheus format.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐       HTTPS          ┌──────────────┐
//! │  Hello API  │ ◄─────────────────►  │   Exporter   │
//! │             │   OAuth2 + JSON      │              │
//! └─────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                      │  │ Client │  │ ◄────────────► │ Prometheus │
//!                                      │  └────────┘  │   /metrics     └────────────┘
//!                                      │  ┌────────┐  │
//!                                      │  │Collect.│  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`hello`] - API client, token management and response types
//! - [`collectors`] - Conversion of API responses into metric families
//! - [`metrics`] - The scrape collector registered with Prometheus
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use hello_exporter::{config::Config, hello::HelloClient, metrics::ScrapeCollector, server};
//! use prometheus::Registry;
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     config.validate()?;
//!
//!     let registry = Arc::new(Registry::new());
//!     ScrapeCollector::register(&registry, Arc::new(HelloClient::new(config.hello)?))?;
//!
//!     tokio::runtime::Runtime::new()?.block_on(server::start(&config.server.addr, registry))
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod hello;
pub mod metrics;
pub mod server;
