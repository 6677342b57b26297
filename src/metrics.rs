//! Prometheus Metrics Definitions
//!
//! This module defines the scrape collector of the Hello exporter.
//!
//! # Scrape Cycle
//!
//! [`ScrapeCollector`] implements [`prometheus::core::Collector`]. Every
//! `collect()` is one scrape:
//! 1. Query the devices and room info sources in that order
//! 2. Emit the metrics of each source that succeeded
//! 3. Count each failing source in `hello_errors_total{type}`
//! 4. Emit `hello_up` (1 only if no source failed) and observe the scrape duration
//!
//! # Metric Types
//!
//! - **Gauge**: per-scrape values (battery charge, room readings, `hello_up`)
//! - **Histogram**: `hello_scrape_duration_seconds`
//! - **IntCounterVec**: `hello_errors_total`, labelled by error class
//!
//! All metrics use the `hello_` namespace prefix.

use crate::collectors::{
    collect_with_handler, CollectionStatus, DeviceMetrics, RoomMetrics, NAMESPACE,
};
use crate::error::{ErrorType, Result};
use crate::hello::HelloClient;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

/// Scrape collector for the Hello API
pub struct ScrapeCollector {
    client: Arc<HelloClient>,
    devices: DeviceMetrics,
    room: RoomMetrics,

    up: Gauge,
    scrape_duration_seconds: Histogram,
    errors_total: IntCounterVec,
}

impl ScrapeCollector {
    pub fn new(client: Arc<HelloClient>) -> Result<Self> {
        let up = Gauge::with_opts(
            Opts::new("up", "Zero if there was an error during scrape process.")
                .namespace(NAMESPACE),
        )?;

        let scrape_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "scrape_duration_seconds",
                "Contains the duration it took to scrape the Hello API.",
            )
            .namespace(NAMESPACE),
        )?;

        let errors_total = IntCounterVec::new(
            Opts::new("errors_total", "Counts the number of errors by type.").namespace(NAMESPACE),
            &["type"],
        )?;

        // Every error class is exported from the first scrape on
        for error_type in ErrorType::ALL {
            errors_total.with_label_values(&[error_type.as_label()]);
        }

        Ok(Self {
            client,
            devices: DeviceMetrics::new()?,
            room: RoomMetrics::new()?,
            up,
            scrape_duration_seconds,
            errors_total,
        })
    }

    /// Creates the collector and registers it on `registry`
    pub fn register(registry: &Registry, client: Arc<HelloClient>) -> Result<()> {
        let collector = Self::new(client)?;
        registry.register(Box::new(collector))?;
        Ok(())
    }

    /// Runs the data sources and returns their metric families
    ///
    /// Returns `false` as the second value if any source failed.
    fn scrape_sources(&self) -> (Vec<MetricFamily>, bool) {
        let mut families = Vec::new();
        let mut up = true;

        let statuses = [
            collect_with_handler(
                "devices",
                || self.client.fetch_devices(),
                |devices| self.devices.families(&devices),
                &mut families,
            ),
            collect_with_handler(
                "room info",
                || self.client.fetch_room_info(),
                |room| self.room.families(&room),
                &mut families,
            ),
        ];

        for status in statuses {
            if let CollectionStatus::Failed(error_type) = status {
                up = false;
                self.errors_total
                    .with_label_values(&[error_type.as_label()])
                    .inc();
            }
        }

        (families, up)
    }
}

impl Collector for ScrapeCollector {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = self.devices.descs();
        descs.extend(self.room.descs());
        descs.extend(self.up.desc());
        descs.extend(self.scrape_duration_seconds.desc());
        descs.extend(self.errors_total.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let start = Instant::now();

        let (mut families, up) = self.scrape_sources();

        self.up.set(if up { 1.0 } else { 0.0 });
        self.scrape_duration_seconds
            .observe(start.elapsed().as_secs_f64());

        families.extend(self.up.collect());
        families.extend(self.scrape_duration_seconds.collect());
        families.extend(self.errors_total.collect());
        families
    }
}

/// Render a registry in Prometheus text format
///
/// Gathering runs a scrape, so this blocks on the Hello API.
pub fn render(registry: &Registry) -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
