//! Device Metrics Collector
//!
//! Converts the device list into per-device metrics.
//!
//! # Metrics Produced
//! - `hello_pill_battery_charge_percent` - Battery charge of a sleep pill
//!   - Labels: id, color

use super::GaugeTemplate;
use crate::error::Result;
use crate::hello::types::{Device, DeviceList};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;

pub struct DeviceMetrics {
    pill_battery_charge_percent: GaugeTemplate,
}

impl DeviceMetrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pill_battery_charge_percent: GaugeTemplate::new(
                "pill_battery_charge_percent",
                "Contains the battery charge of the sleeping pill.",
                &["id", "color"],
            )?,
        })
    }

    pub fn descs(&self) -> Vec<&Desc> {
        vec![self.pill_battery_charge_percent.desc()]
    }

    /// Builds the device metric families for one scrape
    ///
    /// Senses currently produce no metrics. An account without pills yields no
    /// families at all, since a family without samples cannot be encoded.
    pub fn families(&self, devices: &DeviceList) -> Result<Vec<MetricFamily>> {
        if devices.pills.is_empty() {
            return Ok(Vec::new());
        }

        let battery = self.pill_battery_charge_percent.build()?;

        for device in devices.devices() {
            if let Device::Pill(pill) = device {
                let info = device.info();
                battery
                    .with_label_values(&[info.id.as_str(), info.color.as_str()])
                    .set(pill.battery_level as f64);
            }
        }

        Ok(battery.collect())
    }
}
