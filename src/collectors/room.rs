//! Room Metrics Collector
//!
//! Converts the current Sense sensor readings into room metrics.
//!
//! # Metrics Produced
//! - `hello_room_temperature_celsius` - Room temperature
//! - `hello_room_humidity_percent` - Relative humidity
//! - `hello_room_noise_decibel` - Noise level
//! - `hello_room_light_lux` - Light level

use super::GaugeTemplate;
use crate::error::Result;
use crate::hello::types::RoomInfo;
use prometheus::core::Desc;
use prometheus::proto::MetricFamily;

pub struct RoomMetrics {
    temperature_celsius: GaugeTemplate,
    humidity_percent: GaugeTemplate,
    noise_decibel: GaugeTemplate,
    light_lux: GaugeTemplate,
}

impl RoomMetrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temperature_celsius: GaugeTemplate::new(
                "room_temperature_celsius",
                "Room temperature in degrees celsius.",
                &[],
            )?,
            humidity_percent: GaugeTemplate::new(
                "room_humidity_percent",
                "Room relative humidity in percent.",
                &[],
            )?,
            noise_decibel: GaugeTemplate::new(
                "room_noise_decibel",
                "Room noise measurement in decibel.",
                &[],
            )?,
            light_lux: GaugeTemplate::new("room_light_lux", "Room light level in lux.", &[])?,
        })
    }

    pub fn descs(&self) -> Vec<&Desc> {
        vec![
            self.temperature_celsius.desc(),
            self.humidity_percent.desc(),
            self.noise_decibel.desc(),
            self.light_lux.desc(),
        ]
    }

    /// Builds the room metric families for one scrape
    pub fn families(&self, room: &RoomInfo) -> Result<Vec<MetricFamily>> {
        let mut families = Vec::with_capacity(4);
        families.extend(self.temperature_celsius.single(room.temperature.value)?);
        families.extend(self.humidity_percent.single(room.humidity.value)?);
        families.extend(self.noise_decibel.single(room.sound.value)?);
        families.extend(self.light_lux.single(room.light.value)?);
        Ok(families)
    }
}
