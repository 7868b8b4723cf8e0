// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Variant-tagged device model for the energy-management service.
//!
//! Every device payload carries a `deviceType` tag from a closed set of
//! variants. [`DeviceRecord`] models that set as a tagged union with one
//! case per known variant plus an explicit [`DeviceRecord::Unknown`] case,
//! so a newly introduced device type degrades to an empty mapping instead
//! of a deserialization failure.
//!
//! All variant fields are optional: the service omits fields it has no
//! value for, and field presence drives the attribute fan-out in
//! [`crate::mapper`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A measurement paired with its unit or category.
///
/// Power readings, temperatures and setpoints arrive as a
/// `{ value, kind }` pair, e.g. `{ "value": 120.0, "kind": "WATT" }`.
/// Some fields (floor limits, cool setpoints) carry only the value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    /// The numeric reading.
    #[serde(default)]
    pub value: Option<f64>,
    /// The unit or category of the reading (e.g. `WATT`, `CELSIUS`).
    #[serde(default)]
    pub kind: Option<String>,
}

/// A variant-tagged description of one device's current fields.
///
/// Deserialized from both the snapshot query response and subscription
/// event payloads; the subscription may deliver a subset of the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "deviceType")]
pub enum DeviceRecord {
    /// The location's hub device.
    #[serde(rename_all = "camelCase")]
    Gateway {
        /// Stable device identifier.
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        controller_software_version: Option<String>,
        #[serde(default)]
        last_connection_time: Option<String>,
        #[serde(default)]
        will_be_connected_to_smart_meter: Option<bool>,
        #[serde(default, rename = "zigBeeChannel")]
        zigbee_channel: Option<u32>,
        #[serde(default, rename = "zigBeePairingModeEnhanced")]
        zigbee_pairing_mode_enhanced: Option<bool>,
        #[serde(default, rename = "smartMeterZigBeeChannel")]
        smart_meter_zigbee_channel: Option<u32>,
        #[serde(default)]
        smart_meter_pairing_status: Option<String>,
    },

    /// Whole-home smart meter.
    #[serde(rename_all = "camelCase")]
    BasicSmartMeter {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default, rename = "zigBeeChannel")]
        zigbee_channel: Option<u32>,
        #[serde(default)]
        power: Option<Measurement>,
    },

    /// Central low-voltage thermostat with cooling support.
    #[serde(rename_all = "camelCase")]
    LowVoltageThermostat {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        cool_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        fan_mode: Option<String>,
        #[serde(default)]
        fan_speed: Option<String>,
        #[serde(default)]
        mode: Option<String>,
        #[serde(default)]
        current_state: Option<String>,
        #[serde(default)]
        power: Option<Measurement>,
        #[serde(default)]
        ambient_humidity: Option<f64>,
        #[serde(default, rename = "gDState")]
        gd_state: Option<String>,
        #[serde(default)]
        ambient_temperature: Option<Measurement>,
        #[serde(default)]
        ambient_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        zigbee_version: Option<String>,
        #[serde(default, rename = "maxAmbientCoolSetPoint")]
        max_ambient_cool_setpoint: Option<Measurement>,
        #[serde(default, rename = "minAmbientCoolSetPoint")]
        min_ambient_cool_setpoint: Option<Measurement>,
        #[serde(default)]
        max_ambient_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        min_ambient_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        allowed_modes: Option<Vec<String>>,
        #[serde(default)]
        fan_allowed_modes: Option<Vec<String>>,
    },

    /// On/off switch with power monitoring.
    #[serde(rename_all = "camelCase")]
    BasicSwitch {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        power: Option<Measurement>,
    },

    /// Color-capable light.
    #[serde(rename_all = "camelCase")]
    BasicLight {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        hue: Option<f64>,
        #[serde(default)]
        level: Option<f64>,
        #[serde(default)]
        saturation: Option<f64>,
        #[serde(default)]
        color_temperature: Option<f64>,
        #[serde(default)]
        light_type: Option<String>,
    },

    /// Electric vehicle charger.
    #[serde(rename = "BasicEVCharger", rename_all = "camelCase")]
    BasicEvCharger {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        power: Option<Measurement>,
    },

    /// Load controller for high-draw appliances.
    #[serde(rename_all = "camelCase")]
    BasicChargeController {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default, rename = "gDState")]
        gd_state: Option<String>,
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        zigbee_version: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        power: Option<Measurement>,
    },

    /// Thermostat driving a heated floor.
    #[serde(rename_all = "camelCase")]
    HeatingFloorThermostat {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        ambient_humidity: Option<f64>,
        #[serde(default, rename = "gDState")]
        gd_state: Option<String>,
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        zigbee_version: Option<String>,
        #[serde(default)]
        thermostat_type: Option<String>,
        #[serde(default)]
        floor_mode: Option<String>,
        #[serde(default)]
        power: Option<Measurement>,
        #[serde(default)]
        ambient_temperature: Option<Measurement>,
        #[serde(default)]
        ambient_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        max_ambient_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        min_ambient_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        floor_limit: Option<Measurement>,
    },

    /// Controlled water heater.
    #[serde(rename_all = "camelCase")]
    WaterHeater {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default, rename = "gDState")]
        gd_state: Option<String>,
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        probe_temp: Option<Measurement>,
        #[serde(default)]
        zigbee_version: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        ccr_type: Option<String>,
        #[serde(default)]
        alerts: Option<Vec<String>>,
        #[serde(default)]
        power: Option<Measurement>,
    },

    /// Dimmable switch.
    #[serde(rename_all = "camelCase")]
    BasicDimmer {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        level: Option<f64>,
        #[serde(default)]
        power: Option<Measurement>,
    },

    /// Line-voltage heating thermostat.
    #[serde(rename_all = "camelCase")]
    BasicThermostat {
        id: String,
        #[serde(default)]
        physical_address: Option<String>,
        #[serde(default)]
        connection_status: Option<String>,
        #[serde(default)]
        ambient_humidity: Option<f64>,
        #[serde(default, rename = "gDState")]
        gd_state: Option<String>,
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        zigbee_version: Option<String>,
        #[serde(default)]
        ambient_temperature: Option<Measurement>,
        #[serde(default)]
        ambient_temp_setpoint: Option<Measurement>,
        #[serde(default)]
        power: Option<Measurement>,
    },

    /// A device type this library does not recognize.
    ///
    /// Mapping an unknown record yields no attributes; it is never an
    /// error, so one new device type cannot break ingestion of the rest
    /// of a snapshot or stream.
    #[serde(other)]
    Unknown,
}

impl DeviceRecord {
    /// Returns the stable device identifier, if the variant is known.
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::Gateway { id, .. }
            | Self::BasicSmartMeter { id, .. }
            | Self::LowVoltageThermostat { id, .. }
            | Self::BasicSwitch { id, .. }
            | Self::BasicLight { id, .. }
            | Self::BasicEvCharger { id, .. }
            | Self::BasicChargeController { id, .. }
            | Self::HeatingFloorThermostat { id, .. }
            | Self::WaterHeater { id, .. }
            | Self::BasicDimmer { id, .. }
            | Self::BasicThermostat { id, .. } => Some(id.as_str()),
            Self::Unknown => None,
        }
    }
}

/// The location object returned by the snapshot query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    /// The location identifier the snapshot was fetched for.
    pub id: String,
    /// Service-side timestamp of the last state change.
    #[serde(default)]
    pub last_update: Option<String>,
    /// Monotonic version of the last state change.
    #[serde(default)]
    pub last_update_version: Option<i64>,
    /// All devices at the location, in service order.
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

/// One incremental device-update event from the subscription stream.
///
/// The envelope metadata (`operation_id`, `status`, `transmission_time`)
/// is carried for future filtering and deduplication but is not consumed
/// by the mapping step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEvent {
    /// Variant tag duplicated on the envelope by the service.
    #[serde(default)]
    pub device_type: Option<String>,
    /// The location the update belongs to.
    #[serde(default)]
    pub location_id: Option<String>,
    /// When the service transmitted the event.
    #[serde(default)]
    pub transmission_time: Option<DateTime<Utc>>,
    /// Opaque identifier of the originating operation.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Service-side status of the update.
    #[serde(default)]
    pub status: Option<String>,
    /// The updated device payload.
    pub device: DeviceRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_basic_switch() {
        let json = r#"{
            "deviceType": "BasicSwitch",
            "id": "D1",
            "connectionStatus": "Connected",
            "state": "on",
            "power": { "value": 120.0, "kind": "WATT" }
        }"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        let DeviceRecord::BasicSwitch {
            id, state, power, ..
        } = record
        else {
            panic!("expected BasicSwitch");
        };
        assert_eq!(id, "D1");
        assert_eq!(state.as_deref(), Some("on"));
        let power = power.unwrap();
        assert_eq!(power.value, Some(120.0));
        assert_eq!(power.kind.as_deref(), Some("WATT"));
    }

    #[test]
    fn deserialize_gateway_renamed_fields() {
        let json = r#"{
            "deviceType": "Gateway",
            "id": "GW1",
            "zigBeeChannel": 15,
            "zigBeePairingModeEnhanced": true,
            "smartMeterZigBeeChannel": 25
        }"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        let DeviceRecord::Gateway {
            zigbee_channel,
            zigbee_pairing_mode_enhanced,
            smart_meter_zigbee_channel,
            ..
        } = record
        else {
            panic!("expected Gateway");
        };
        assert_eq!(zigbee_channel, Some(15));
        assert_eq!(zigbee_pairing_mode_enhanced, Some(true));
        assert_eq!(smart_meter_zigbee_channel, Some(25));
    }

    #[test]
    fn deserialize_low_voltage_thermostat_setpoint_renames() {
        let json = r#"{
            "deviceType": "LowVoltageThermostat",
            "id": "T1",
            "maxAmbientCoolSetPoint": { "value": 30.0 },
            "minAmbientCoolSetPoint": { "value": 16.0 },
            "maxAmbientTempSetpoint": { "value": 28.0 },
            "minAmbientTempSetpoint": { "value": 5.0 }
        }"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        let DeviceRecord::LowVoltageThermostat {
            max_ambient_cool_setpoint,
            min_ambient_cool_setpoint,
            max_ambient_temp_setpoint,
            min_ambient_temp_setpoint,
            ..
        } = record
        else {
            panic!("expected LowVoltageThermostat");
        };
        assert_eq!(max_ambient_cool_setpoint.unwrap().value, Some(30.0));
        assert_eq!(min_ambient_cool_setpoint.unwrap().value, Some(16.0));
        assert_eq!(max_ambient_temp_setpoint.unwrap().value, Some(28.0));
        assert_eq!(min_ambient_temp_setpoint.unwrap().value, Some(5.0));
    }

    #[test]
    fn deserialize_ev_charger_tag() {
        let json = r#"{ "deviceType": "BasicEVCharger", "id": "EV1", "status": "Charging" }"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        let DeviceRecord::BasicEvCharger { id, status, .. } = record else {
            panic!("expected BasicEvCharger");
        };
        assert_eq!(id, "EV1");
        assert_eq!(status.as_deref(), Some("Charging"));
    }

    #[test]
    fn unrecognized_device_type_becomes_unknown() {
        let json = r#"{ "deviceType": "FutureDeviceType", "id": "D2" }"#;
        let record: DeviceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, DeviceRecord::Unknown);
        assert!(record.device_id().is_none());
    }

    #[test]
    fn deserialize_event_envelope() {
        let json = r#"{
            "deviceType": "BasicDimmer",
            "locationId": "LOC1",
            "transmissionTime": "2024-05-01T12:00:00Z",
            "operationId": "op-42",
            "status": "Completed",
            "device": {
                "deviceType": "BasicDimmer",
                "id": "D7",
                "level": 60.0
            }
        }"#;
        let event: DeviceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.operation_id.as_deref(), Some("op-42"));
        assert_eq!(event.device.device_id(), Some("D7"));
    }

    #[test]
    fn deserialize_location_snapshot() {
        let json = r#"{
            "id": "LOC1",
            "lastUpdate": "2024-05-01T11:59:00Z",
            "lastUpdateVersion": 41,
            "devices": [
                { "deviceType": "BasicSwitch", "id": "D1", "state": "on" },
                { "deviceType": "SomethingNew", "id": "D9" }
            ]
        }"#;
        let snapshot: LocationSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.devices.len(), 2);
        assert_eq!(snapshot.devices[1], DeviceRecord::Unknown);
        assert_eq!(snapshot.last_update_version, Some(41));
    }
}
