// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure mapping from device records to attribute triples.
//!
//! Both the snapshot query and the subscription stream funnel through
//! this module, so the registry sees one uniform representation: a flat
//! sequence of `(device id, attribute name, value)` triples.
//!
//! Mapping rules:
//!
//! - Scalar fields map 1:1 to a triple named after the field
//!   (snake_case).
//! - Measurement fields fan out to two triples: `<field>` for the value
//!   and `<field>_kind` for the unit, each emitted only when present.
//! - Absent optional fields produce no triple, never a placeholder.
//! - An unrecognized device variant maps to the empty sequence.
//!
//! The functions here are total and side-effect free; they are safely
//! callable concurrently from the query and subscription paths.

use crate::device::{DeviceEvent, DeviceRecord, Measurement};

/// A normalized `(device id, attribute name, value)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Stable identifier of the device the attribute belongs to.
    pub device_id: String,
    /// Attribute name, snake_case.
    pub name: String,
    /// Attribute value.
    pub value: AttributeValue,
}

impl Attribute {
    /// Creates a new attribute triple.
    #[must_use]
    pub fn new(
        device_id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The value of an attribute triple.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric reading.
    Number(f64),
    /// Textual state or category.
    Text(String),
    /// List of textual values (allowed modes, alerts).
    List(Vec<String>),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Maps a snapshot device collection into attribute triples.
#[must_use]
pub fn map_query(records: &[DeviceRecord]) -> Vec<Attribute> {
    records.iter().flat_map(map_record).collect()
}

/// Maps one subscription event's device payload into attribute triples.
#[must_use]
pub fn map_event(event: &DeviceEvent) -> Vec<Attribute> {
    map_record(&event.device)
}

/// Maps a single device record into attribute triples.
///
/// Total over the variant set: every known variant has a rule and
/// [`DeviceRecord::Unknown`] yields the empty sequence.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn map_record(record: &DeviceRecord) -> Vec<Attribute> {
    match record {
        DeviceRecord::Gateway {
            id,
            physical_address,
            connection_status,
            controller_software_version,
            last_connection_time,
            will_be_connected_to_smart_meter,
            zigbee_channel,
            zigbee_pairing_mode_enhanced,
            smart_meter_zigbee_channel,
            smart_meter_pairing_status,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.text("controller_software_version", controller_software_version);
            out.text("last_connection_time", last_connection_time);
            out.flag(
                "will_be_connected_to_smart_meter",
                will_be_connected_to_smart_meter,
            );
            out.number("zigbee_channel", &zigbee_channel.map(f64::from));
            out.flag(
                "zigbee_pairing_mode_enhanced",
                zigbee_pairing_mode_enhanced,
            );
            out.number(
                "smart_meter_zigbee_channel",
                &smart_meter_zigbee_channel.map(f64::from),
            );
            out.text("smart_meter_pairing_status", smart_meter_pairing_status);
            out.into_vec()
        }

        DeviceRecord::BasicSmartMeter {
            id,
            physical_address,
            connection_status,
            zigbee_channel,
            power,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.number("zigbee_channel", &zigbee_channel.map(f64::from));
            out.measurement("power", power);
            out.into_vec()
        }

        DeviceRecord::LowVoltageThermostat {
            id,
            physical_address,
            connection_status,
            cool_temp_setpoint,
            fan_mode,
            fan_speed,
            mode,
            current_state,
            power,
            ambient_humidity,
            gd_state,
            ambient_temperature,
            ambient_temp_setpoint,
            version,
            zigbee_version,
            max_ambient_cool_setpoint,
            min_ambient_cool_setpoint,
            max_ambient_temp_setpoint,
            min_ambient_temp_setpoint,
            allowed_modes,
            fan_allowed_modes,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.measurement("cool_temp_setpoint", cool_temp_setpoint);
            out.text("fan_mode", fan_mode);
            out.text("fan_speed", fan_speed);
            out.text("mode", mode);
            out.text("current_state", current_state);
            out.measurement("power", power);
            out.number("ambient_humidity", ambient_humidity);
            out.text("gd_state", gd_state);
            out.measurement("ambient_temperature", ambient_temperature);
            out.measurement("ambient_temp_setpoint", ambient_temp_setpoint);
            out.text("version", version);
            out.text("zigbee_version", zigbee_version);
            out.measurement("max_ambient_cool_setpoint", max_ambient_cool_setpoint);
            out.measurement("min_ambient_cool_setpoint", min_ambient_cool_setpoint);
            out.measurement("max_ambient_temp_setpoint", max_ambient_temp_setpoint);
            out.measurement("min_ambient_temp_setpoint", min_ambient_temp_setpoint);
            out.list("allowed_modes", allowed_modes);
            out.list("fan_allowed_modes", fan_allowed_modes);
            out.into_vec()
        }

        DeviceRecord::BasicSwitch {
            id,
            physical_address,
            connection_status,
            state,
            power,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.text("state", state);
            out.measurement("power", power);
            out.into_vec()
        }

        DeviceRecord::BasicLight {
            id,
            physical_address,
            connection_status,
            state,
            hue,
            level,
            saturation,
            color_temperature,
            light_type,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.text("state", state);
            out.number("hue", hue);
            out.number("level", level);
            out.number("saturation", saturation);
            out.number("color_temperature", color_temperature);
            out.text("light_type", light_type);
            out.into_vec()
        }

        DeviceRecord::BasicEvCharger {
            id,
            physical_address,
            connection_status,
            status,
            power,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.text("status", status);
            out.measurement("power", power);
            out.into_vec()
        }

        DeviceRecord::BasicChargeController {
            id,
            physical_address,
            connection_status,
            gd_state,
            version,
            zigbee_version,
            state,
            power,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.text("gd_state", gd_state);
            out.text("version", version);
            out.text("zigbee_version", zigbee_version);
            out.text("state", state);
            out.measurement("power", power);
            out.into_vec()
        }

        DeviceRecord::HeatingFloorThermostat {
            id,
            physical_address,
            connection_status,
            ambient_humidity,
            gd_state,
            version,
            zigbee_version,
            thermostat_type,
            floor_mode,
            power,
            ambient_temperature,
            ambient_temp_setpoint,
            max_ambient_temp_setpoint,
            min_ambient_temp_setpoint,
            floor_limit,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.number("ambient_humidity", ambient_humidity);
            out.text("gd_state", gd_state);
            out.text("version", version);
            out.text("zigbee_version", zigbee_version);
            out.text("thermostat_type", thermostat_type);
            out.text("floor_mode", floor_mode);
            out.measurement("power", power);
            out.measurement("ambient_temperature", ambient_temperature);
            out.measurement("ambient_temp_setpoint", ambient_temp_setpoint);
            out.measurement("max_ambient_temp_setpoint", max_ambient_temp_setpoint);
            out.measurement("min_ambient_temp_setpoint", min_ambient_temp_setpoint);
            out.measurement("floor_limit", floor_limit);
            out.into_vec()
        }

        DeviceRecord::WaterHeater {
            id,
            physical_address,
            connection_status,
            gd_state,
            version,
            probe_temp,
            zigbee_version,
            state,
            ccr_type,
            alerts,
            power,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.text("gd_state", gd_state);
            out.text("version", version);
            out.measurement("probe_temp", probe_temp);
            out.text("zigbee_version", zigbee_version);
            out.text("state", state);
            out.text("ccr_type", ccr_type);
            out.list("alerts", alerts);
            out.measurement("power", power);
            out.into_vec()
        }

        DeviceRecord::BasicDimmer {
            id,
            physical_address,
            connection_status,
            state,
            level,
            power,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.text("state", state);
            out.number("level", level);
            out.measurement("power", power);
            out.into_vec()
        }

        DeviceRecord::BasicThermostat {
            id,
            physical_address,
            connection_status,
            ambient_humidity,
            gd_state,
            version,
            zigbee_version,
            ambient_temperature,
            ambient_temp_setpoint,
            power,
        } => {
            let mut out = Triples::new(id);
            out.text("physical_address", physical_address);
            out.text("connection_status", connection_status);
            out.number("ambient_humidity", ambient_humidity);
            out.text("gd_state", gd_state);
            out.text("version", version);
            out.text("zigbee_version", zigbee_version);
            out.measurement("ambient_temperature", ambient_temperature);
            out.measurement("ambient_temp_setpoint", ambient_temp_setpoint);
            out.measurement("power", power);
            out.into_vec()
        }

        DeviceRecord::Unknown => Vec::new(),
    }
}

/// Accumulator for one device's attribute triples.
struct Triples<'a> {
    device_id: &'a str,
    out: Vec<Attribute>,
}

impl<'a> Triples<'a> {
    fn new(device_id: &'a str) -> Self {
        Self {
            device_id,
            out: Vec::new(),
        }
    }

    fn push(&mut self, name: &str, value: AttributeValue) {
        self.out.push(Attribute {
            device_id: self.device_id.to_string(),
            name: name.to_string(),
            value,
        });
    }

    fn text(&mut self, name: &str, value: &Option<String>) {
        if let Some(v) = value {
            self.push(name, AttributeValue::Text(v.clone()));
        }
    }

    fn number(&mut self, name: &str, value: &Option<f64>) {
        if let Some(v) = value {
            self.push(name, AttributeValue::Number(*v));
        }
    }

    fn flag(&mut self, name: &str, value: &Option<bool>) {
        if let Some(v) = value {
            self.push(name, AttributeValue::Bool(*v));
        }
    }

    fn list(&mut self, name: &str, value: &Option<Vec<String>>) {
        if let Some(v) = value {
            self.push(name, AttributeValue::List(v.clone()));
        }
    }

    /// Fans a measurement out into `<name>` and `<name>_kind` triples.
    fn measurement(&mut self, name: &str, value: &Option<Measurement>) {
        if let Some(m) = value {
            if let Some(v) = m.value {
                self.push(name, AttributeValue::Number(v));
            }
            if let Some(kind) = &m.kind {
                self.push(&format!("{name}_kind"), AttributeValue::Text(kind.clone()));
            }
        }
    }

    fn into_vec(self) -> Vec<Attribute> {
        self.out
    }
}
