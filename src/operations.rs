// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GraphQL operation documents.
//!
//! These are configuration data, not logic: the per-variant selection
//! sets request every field the service can report for each device type,
//! and the device model in [`crate::device`] mirrors them. The core never
//! inspects these strings.

/// One-shot structured query for the full device snapshot of a location.
pub const QUERY_GET_LOCATION: &str = r"query getLocation($locationId: String!) {
    getLocation(id: $locationId) {
        id
        lastUpdate
        lastUpdateVersion
        devices {
            deviceType
            id
            physicalAddress
            connectionStatus
            ... on Gateway {
                controllerSoftwareVersion
                lastConnectionTime
                willBeConnectedToSmartMeter
                zigBeeChannel
                zigBeePairingModeEnhanced
                smartMeterZigBeeChannel
                smartMeterPairingStatus
            }
            ... on BasicSmartMeter {
                zigBeeChannel
                power { value kind }
            }
            ... on LowVoltageThermostat {
                coolTempSetpoint { value }
                fanMode
                fanSpeed
                mode
                currentState
                power { value kind }
                ambientHumidity
                gDState
                ambientTemperature { value kind }
                ambientTempSetpoint { value kind }
                version
                zigbeeVersion
                maxAmbientCoolSetPoint { value kind }
                minAmbientCoolSetPoint { value kind }
                maxAmbientTempSetpoint { value kind }
                minAmbientTempSetpoint { value kind }
                allowedModes
                fanAllowedModes
            }
            ... on BasicSwitch {
                state
                power { value kind }
            }
            ... on BasicLight {
                state
                hue
                level
                saturation
                colorTemperature
                lightType
            }
            ... on BasicEVCharger {
                status
                power { value kind }
            }
            ... on BasicChargeController {
                gDState
                version
                zigbeeVersion
                state
                power { value kind }
            }
            ... on HeatingFloorThermostat {
                ambientHumidity
                gDState
                version
                zigbeeVersion
                thermostatType
                floorMode
                power { value kind }
                ambientTemperature { value kind }
                ambientTempSetpoint { value kind }
                maxAmbientTempSetpoint { value kind }
                minAmbientTempSetpoint { value kind }
                floorLimit { value }
            }
            ... on WaterHeater {
                gDState
                version
                probeTemp { value kind }
                zigbeeVersion
                state
                ccrType
                alerts
                power { value kind }
            }
            ... on BasicDimmer {
                state
                level
                power { value kind }
            }
            ... on BasicThermostat {
                ambientHumidity
                gDState
                version
                zigbeeVersion
                ambientTemperature { value kind }
                ambientTempSetpoint { value kind }
                power { value kind }
            }
        }
    }
}";

/// Long-lived subscription delivering incremental device updates for a
/// location.
pub const SUBSCRIPTION_DEVICE_UPDATED: &str =
    r"subscription onAnyDeviceUpdated($locationId: String!) {
    onAnyDeviceUpdated(locationId: $locationId) {
        deviceType
        locationId
        transmissionTime
        operationId
        status
        device {
            deviceType
            id
            physicalAddress
            connectionStatus
            ... on Gateway {
                controllerSoftwareVersion
                lastConnectionTime
                willBeConnectedToSmartMeter
                zigBeeChannel
                zigBeePairingModeEnhanced
                smartMeterZigBeeChannel
                smartMeterPairingStatus
            }
            ... on BasicSmartMeter {
                zigBeeChannel
                power { value kind }
            }
            ... on LowVoltageThermostat {
                coolTempSetpoint { value }
                fanMode
                fanSpeed
                mode
                currentState
                power { value kind }
                ambientHumidity
                gDState
                ambientTemperature { value kind }
                ambientTempSetpoint { value kind }
                version
                zigbeeVersion
                maxAmbientCoolSetPoint { value kind }
                minAmbientCoolSetPoint { value kind }
                maxAmbientTempSetpoint { value kind }
                minAmbientTempSetpoint { value kind }
                allowedModes
                fanAllowedModes
            }
            ... on BasicSwitch {
                state
                power { value kind }
            }
            ... on BasicLight {
                state
                hue
                level
                saturation
                colorTemperature
                lightType
            }
            ... on BasicEVCharger {
                status
                power { value kind }
            }
            ... on BasicChargeController {
                gDState
                version
                zigbeeVersion
                state
                power { value kind }
            }
            ... on HeatingFloorThermostat {
                ambientHumidity
                gDState
                version
                zigbeeVersion
                thermostatType
                floorMode
                power { value kind }
                ambientTemperature { value kind }
                ambientTempSetpoint { value kind }
                maxAmbientTempSetpoint { value kind }
                minAmbientTempSetpoint { value kind }
                floorLimit { value }
            }
            ... on WaterHeater {
                gDState
                version
                probeTemp { value kind }
                zigbeeVersion
                state
                ccrType
                alerts
                power { value kind }
            }
            ... on BasicDimmer {
                state
                level
                power { value kind }
            }
            ... on BasicThermostat {
                ambientHumidity
                gDState
                version
                zigbeeVersion
                ambientTemperature { value kind }
                ambientTempSetpoint { value kind }
                power { value kind }
            }
        }
    }
}";
