//! Hello API Type Definitions
//!
//! Rust struct definitions for the Hello API responses used by the exporter.
//!
//! # Design Notes
//!
//! - **Lenient decoding**: every struct uses `#[serde(default)]` so absent fields
//!   decode to empty values instead of failing the whole scrape.
//! - **Devices**: the API returns pills and senses in separate arrays. [`Device`]
//!   is the tagged view over both, with [`Device::info`] exposing the shared
//!   [`DeviceInfo`] record.
//!
//! # API Endpoints Covered
//!
//! - `POST /v1/oauth2/token` → [`TokenInfo`]
//! - `GET /v2/devices` → [`DeviceList`], [`Pill`], [`Sense`], [`WifiInfo`]
//! - `GET /v1/room/current` → [`RoomInfo`], [`SensorReading`]

#![allow(dead_code)] // Allow unused fields in API structs for completeness
use serde::Deserialize;

/// Token endpoint response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenInfo {
    pub token_type: String,
    pub expires_in: i64,
    pub account_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Devices connected to the account
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeviceList {
    pub pills: Vec<Pill>,
    pub senses: Vec<Sense>,
}

/// Fields shared by every device kind
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub id: String,
    pub state: String,
    pub color: String,
    pub firmware_version: String,
    pub last_updated: i64,
}

/// Sleep pill
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pill {
    #[serde(flatten)]
    pub info: DeviceInfo,
    pub battery_level: i64,
    pub battery_type: String,
}

/// Sense base station
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Sense {
    #[serde(flatten)]
    pub info: DeviceInfo,
    #[serde(rename = "hw_version")]
    pub hardware_version: String,
    pub wifi_info: WifiInfo,
}

/// Wifi network a Sense is connected to
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WifiInfo {
    pub ssid: String,
    pub rssi: i64,
    pub condition: String,
    pub last_updated: i64,
}

/// A device of either kind
#[derive(Debug, Clone, Copy)]
pub enum Device<'a> {
    Pill(&'a Pill),
    Sense(&'a Sense),
}

impl<'a> Device<'a> {
    /// Shared device fields
    pub fn info(&self) -> &'a DeviceInfo {
        match *self {
            Device::Pill(pill) => &pill.info,
            Device::Sense(sense) => &sense.info,
        }
    }
}

impl DeviceList {
    /// Iterates all devices, pills first
    pub fn devices(&self) -> impl Iterator<Item = Device<'_>> {
        self.pills
            .iter()
            .map(Device::Pill)
            .chain(self.senses.iter().map(Device::Sense))
    }
}

/// Current readings of the Sense sensors
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoomInfo {
    pub humidity: SensorReading,
    pub light: SensorReading,
    pub particulates: SensorReading,
    pub sound: SensorReading,
    pub temperature: SensorReading,
}

/// A single sensor reading
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SensorReading {
    pub unit: String,
    pub value: f64,
    #[serde(rename = "last_updated_utc")]
    pub last_updated: i64,
    pub condition: String,
    pub ideal_conditions: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn devices_yields_pills_then_senses() {
        let list: DeviceList = serde_json::from_value(json!({
            "pills": [{"id": "p1"}],
            "senses": [{"id": "s1", "hw_version": "SENSE_ONE"}]
        }))
        .unwrap();

        let ids: Vec<&str> = list.devices().map(|d| d.info().id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "s1"]);
        assert!(matches!(list.devices().next(), Some(Device::Pill(_))));
    }
}
