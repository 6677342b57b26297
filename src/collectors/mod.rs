//! Metrics Collectors
//!
//! This module contains the per-source converters of the exporter. Each converter
//! turns one Hello API response into Prometheus metric families.
//!
//! # Architecture
//!
//! Converters follow a consistent pattern:
//! - Hold a [`GaugeTemplate`] per metric they produce
//! - Expose their descriptors for `Collector::desc`
//! - Build fresh gauges from the response on every scrape, so values never
//!   outlive the scrape that produced them
//!
//! # Error Handling
//!
//! Source failures are non-fatal. [`collect_with_handler`] logs a warning and
//! reports the error class so the scrape can keep going with the next source.

use crate::error::{ErrorType, ExporterError};
use prometheus::core::{Collector, Desc, Describer};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, GaugeVec, Opts};
use tracing::{debug, warn};

pub mod devices;
pub mod room;

pub use devices::DeviceMetrics;
pub use room::RoomMetrics;

/// Namespace prefixed to every metric name
pub const NAMESPACE: &str = "hello";

/// Status of a single source collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Metrics were collected and appended to the output
    Success,
    /// Collection failed; nothing was appended
    Failed(ErrorType),
}

/// Runs one source of a scrape
///
/// - On success: converts the data, appends the families to `out`, returns `Success`
/// - On error: logs a warning, returns `Failed` with the error class
///
/// # Arguments
///
/// * `name` - Name of the source (for logging)
/// * `query` - API call returning the source data
/// * `process` - Converts the data into metric families
/// * `out` - Families emitted so far in this scrape
pub fn collect_with_handler<T, Q, P>(
    name: &str,
    query: Q,
    process: P,
    out: &mut Vec<MetricFamily>,
) -> CollectionStatus
where
    Q: FnOnce() -> Result<T, ExporterError>,
    P: FnOnce(T) -> Result<Vec<MetricFamily>, ExporterError>,
{
    match query().and_then(process) {
        Ok(families) => {
            out.extend(families);
            debug!("Collected {} metrics", name);
            CollectionStatus::Success
        }
        Err(e) => {
            warn!("Failed to collect {}: {}", name, e);
            CollectionStatus::Failed(e.error_type())
        }
    }
}

/// Descriptor of a gauge whose samples are rebuilt on every scrape
#[derive(Debug, Clone)]
pub struct GaugeTemplate {
    opts: Opts,
    labels: &'static [&'static str],
    desc: Desc,
}

impl GaugeTemplate {
    pub fn new(
        name: &str,
        help: &str,
        labels: &'static [&'static str],
    ) -> prometheus::Result<Self> {
        let opts = Opts::new(name, help)
            .namespace(NAMESPACE)
            .variable_labels(labels.iter().map(|l| l.to_string()).collect());
        let desc = opts.describe()?;
        let opts = Opts::new(name, help).namespace(NAMESPACE);
        Ok(Self { opts, labels, desc })
    }

    pub fn desc(&self) -> &Desc {
        &self.desc
    }

    /// Fresh, empty gauge vector for this metric
    pub fn build(&self) -> prometheus::Result<GaugeVec> {
        GaugeVec::new(self.opts.clone(), self.labels)
    }

    /// Builds the family for an unlabelled gauge holding `value`
    pub fn single(&self, value: f64) -> prometheus::Result<Vec<MetricFamily>> {
        let gauge = Gauge::with_opts(self.opts.clone())?;
        gauge.set(value);
        Ok(gauge.collect())
    }
}
