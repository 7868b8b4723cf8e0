// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the snapshot query path using wiremock.

use wattsync::transport::GraphQlHttpClient;
use wattsync::{
    Attribute, AuthError, DeviceRecord, Error, ProtocolError, QueryExecutor, map_query,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor_for(server: &MockServer) -> QueryExecutor {
    QueryExecutor::new(GraphQlHttpClient::new(server.uri()).unwrap())
}

fn location_body(devices: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "getLocation": {
                "id": "LOC1",
                "lastUpdate": "2024-05-01T11:59:00Z",
                "lastUpdateVersion": 41,
                "devices": devices
            }
        }
    })
}

#[tokio::test]
async fn fetch_returns_device_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(serde_json::json!({
            "variables": { "locationId": "LOC1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_body(
            serde_json::json!([
                {
                    "deviceType": "BasicSwitch",
                    "id": "D1",
                    "state": "on",
                    "power": { "value": 120.0, "kind": "WATT" }
                },
                {
                    "deviceType": "BasicLight",
                    "id": "D2",
                    "state": "off",
                    "level": 40.0
                }
            ]),
        )))
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let devices = executor.fetch("LOC1", "tok").await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].device_id(), Some("D1"));
    assert_eq!(devices[1].device_id(), Some("D2"));
}

#[tokio::test]
async fn fetch_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(location_body(serde_json::json!([]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let devices = executor.fetch("LOC1", "secret-token").await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn fetch_maps_to_expected_triples() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_body(
            serde_json::json!([{
                "deviceType": "BasicSwitch",
                "id": "D1",
                "state": "on",
                "power": { "value": 120.0, "kind": "WATT" }
            }]),
        )))
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let devices = executor.fetch("LOC1", "tok").await.unwrap();

    assert_eq!(
        map_query(&devices),
        vec![
            Attribute::new("D1", "state", "on"),
            Attribute::new("D1", "power", 120.0),
            Attribute::new("D1", "power_kind", "WATT"),
        ]
    );
}

#[tokio::test]
async fn fetch_tolerates_unrecognized_device_types() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_body(
            serde_json::json!([
                { "deviceType": "FutureDeviceType", "id": "D9", "someField": 1 },
                { "deviceType": "BasicSwitch", "id": "D1", "state": "on" }
            ]),
        )))
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let devices = executor.fetch("LOC1", "tok").await.unwrap();

    assert_eq!(devices[0], DeviceRecord::Unknown);
    // The unrecognized record degrades to zero triples, the rest map.
    assert_eq!(
        map_query(&devices),
        vec![Attribute::new("D1", "state", "on")]
    );
}

#[tokio::test]
async fn fetch_snapshot_includes_location_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(location_body(serde_json::json!([]))),
        )
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let snapshot = executor.fetch_snapshot("LOC1", "tok").await.unwrap();

    assert_eq!(snapshot.id, "LOC1");
    assert_eq!(snapshot.last_update_version, Some(41));
}

#[tokio::test]
async fn fetch_rejected_token_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let err = executor.fetch("LOC1", "expired").await.unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::TokenRejected)));
}

#[tokio::test]
async fn fetch_server_failure_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let err = executor.fetch("LOC1", "tok").await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn fetch_graphql_errors_are_protocol_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [{ "message": "location not found" }]
        })))
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let err = executor.fetch("LOC-MISSING", "tok").await.unwrap_err();

    let Error::Protocol(ProtocolError::Errors(message)) = err else {
        panic!("expected protocol error, got {err:?}");
    };
    assert!(message.contains("location not found"));
}

#[tokio::test]
async fn fetch_missing_location_is_protocol_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {}
        })))
        .mount(&mock_server)
        .await;

    let executor = executor_for(&mock_server);
    let err = executor.fetch("LOC1", "tok").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::MissingField(field)) if field == "getLocation"
    ));
}
