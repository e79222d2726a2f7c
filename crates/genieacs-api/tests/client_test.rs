#![allow(clippy::unwrap_used)]
// Integration tests for `GenieClient` using wiremock.
//
// The client is blocking, so every call runs on tokio's blocking pool
// while the mock server keeps serving on the runtime.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use genieacs_api::{
    ConnectionConfig, Credentials, DEFAULT_TIMEOUT, Error, GenieClient, ParameterValue,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Run `f` against a client pointed at `server`, off the async runtime.
async fn with_client<T, F>(server: &MockServer, f: F) -> T
where
    F: FnOnce(&GenieClient) -> T + Send + 'static,
    T: Send + 'static,
{
    let base = Url::parse(&server.uri()).unwrap();
    tokio::task::spawn_blocking(move || {
        let client =
            GenieClient::with_client(reqwest::blocking::Client::new(), base, DEFAULT_TIMEOUT);
        f(&client)
    })
    .await
    .unwrap()
}

/// Like [`with_client`], but builds the client from a `ConnectionConfig`.
async fn with_config<T, F>(config: ConnectionConfig, f: F) -> T
where
    F: FnOnce(&GenieClient) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = GenieClient::new(&config).unwrap();
        f(&client)
    })
    .await
    .unwrap()
}

fn config_for(server: &MockServer) -> ConnectionConfig {
    let addr = server.address();
    ConnectionConfig::new(addr.ip().to_string()).with_port(addr.port())
}

const DEVICE: &str = "000149-c1500-000149014AF8";

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("projection", "_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "dev-a" },
            { "_id": "dev-b" }
        ])))
        .mount(&server)
        .await;

    let ids = with_client(&server, |c| c.device_ids()).await.unwrap();
    assert_eq!(ids, ["dev-a", "dev-b"]);
}

#[tokio::test]
async fn test_device_by_id_sends_encoded_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("query", r#"{"_id":"X"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": "X" }])))
        .expect(1)
        .mount(&server)
        .await;

    let device = with_client(&server, |c| c.device_by_id("X")).await.unwrap();
    assert_eq!(device, Some(json!({ "_id": "X" })));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("query=%7B%22_id%22%3A%22X%22%7D"));
}

#[tokio::test]
async fn test_device_by_mac_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param(
            "query",
            r#"{"InternetGatewayDevice.WANDevice.1.WANConnectionDevice.1.WANIPConnection.1.MACAddress":"00:11:22:33:44:55"}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let device = with_client(&server, |c| c.device_by_mac("00:11:22:33:44:55"))
        .await
        .unwrap();
    assert_eq!(device, None);
}

#[tokio::test]
async fn test_device_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("projection", "InternetGatewayDevice.DeviceInfo.SoftwareVersion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": DEVICE,
            "InternetGatewayDevice": {
                "DeviceInfo": {
                    "SoftwareVersion": {
                        "_value": "2.4.1",
                        "_type": "xsd:string",
                        "_timestamp": "2024-01-01T00:00:00.000Z"
                    }
                }
            }
        }])))
        .mount(&server)
        .await;

    let value = with_client(&server, |c| {
        c.device_parameter(DEVICE, "InternetGatewayDevice.DeviceInfo.SoftwareVersion")
    })
    .await
    .unwrap();
    assert_eq!(value, Some(json!("2.4.1")));
}

#[tokio::test]
async fn test_device_parameter_absent_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": DEVICE }])))
        .mount(&server)
        .await;

    let value = with_client(&server, |c| c.device_parameter(DEVICE, "A.B.C"))
        .await
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_device_parameters_merge_shared_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("projection", "A.B,A.C,A.Missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": DEVICE,
            "A": { "B": { "_value": 1 }, "C": { "_value": 2 } }
        }])))
        .mount(&server)
        .await;

    let tree = with_client(&server, |c| c.device_parameters(DEVICE, "A.B,A.C,A.Missing"))
        .await
        .unwrap();
    assert_eq!(
        tree.to_value(),
        json!({ "A": { "B": 1, "C": 2, "Missing": null } })
    );
}

#[tokio::test]
async fn test_device_parameters_unknown_device_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let tree = with_client(&server, |c| c.device_parameters("nope", "A.B,A.C"))
        .await
        .unwrap();
    assert!(tree.is_empty());
}

#[tokio::test]
async fn test_delete_device_encodes_id() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/devices/dev%20with%2Fslash"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| c.delete_device("dev with/slash"))
        .await
        .unwrap();
}

// ── Task tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_object_with_connection_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/devices/{DEVICE}/tasks")))
        .and(body_json(json!({
            "name": "refreshObject",
            "objectName": "InternetGatewayDevice.DeviceInfo."
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| {
        c.refresh_object(DEVICE, "InternetGatewayDevice.DeviceInfo.", true)
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("connection_request"));
}

#[tokio::test]
async fn test_set_parameter_values_queued_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/devices/{DEVICE}/tasks")))
        .and(body_json(json!({
            "name": "setParameterValues",
            "parameterValues": [["InternetGatewayDevice.BackupConfiguration.FileList", "backup.cfg"]]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| {
        c.set_parameter_values(
            DEVICE,
            vec![ParameterValue::new(
                "InternetGatewayDevice.BackupConfiguration.FileList",
                "backup.cfg",
            )],
            false,
        )
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_download_and_reboot_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/devices/{DEVICE}/tasks")))
        .and(body_json(json!({
            "name": "download",
            "fileType": "1 Firmware Upgrade Image",
            "fileName": "fw-2.4.1.bin"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/devices/{DEVICE}/tasks")))
        .and(body_json(json!({ "name": "reboot" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| {
        c.download(DEVICE, "1 Firmware Upgrade Image", "fw-2.4.1.bin", None, true)?;
        c.reboot(DEVICE, true)
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_get_values_add_object_and_factory_reset_bodies() {
    let server = MockServer::start().await;
    let task_path = format!("/devices/{DEVICE}/tasks");

    Mock::given(method("POST"))
        .and(path(task_path.as_str()))
        .and(body_json(json!({
            "name": "getParameterValues",
            "parameterNames": [
                "InternetGatewayDevice.DeviceInfo.UpTime",
                "InternetGatewayDevice.DeviceInfo.SoftwareVersion"
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(task_path.as_str()))
        .and(body_json(json!({
            "name": "addObject",
            "objectName": "InternetGatewayDevice.WANDevice.1.WANConnectionDevice."
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(task_path.as_str()))
        .and(body_json(json!({ "name": "factoryReset" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| {
        c.get_parameter_values(
            DEVICE,
            vec![
                "InternetGatewayDevice.DeviceInfo.UpTime".into(),
                "InternetGatewayDevice.DeviceInfo.SoftwareVersion".into(),
            ],
            false,
        )?;
        c.add_object(
            DEVICE,
            "InternetGatewayDevice.WANDevice.1.WANConnectionDevice.",
            false,
        )?;
        c.factory_reset(DEVICE, false)
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_tasks_for_device() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("query", format!(r#"{{"device":"{DEVICE}"}}"#)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "5f2a",
            "device": DEVICE,
            "name": "reboot",
            "timestamp": "2024-01-01T00:00:00.000Z"
        }])))
        .mount(&server)
        .await;

    let tasks = with_client(&server, |c| c.tasks_for_device(DEVICE)).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "5f2a");
    assert_eq!(tasks[0].kind(), Some(genieacs_api::TaskName::Reboot));
}

#[tokio::test]
async fn test_retry_task() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks/5f2a/retry"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| c.retry_task("5f2a")).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_task_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tasks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Task not found"))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.delete_task("missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(
        matches!(&err, Error::Http { status: 404, body } if body == "Task not found"),
        "expected Http error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_delete_task_twice_fails_second_time() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tasks/5f2a"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/tasks/5f2a"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (first, second) = with_client(&server, |c| (c.delete_task("5f2a"), c.delete_task("5f2a"))).await;
    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::Http { status: 404, .. })));
}

// ── Tag tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_tags() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("projection", "_tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": DEVICE,
            "_tags": ["tagged", "lab"]
        }])))
        .mount(&server)
        .await;

    let tags = with_client(&server, |c| c.tags(DEVICE)).await.unwrap();
    assert_eq!(tags, ["tagged", "lab"]);
}

#[tokio::test]
async fn test_assign_and_remove_tag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/devices/{DEVICE}/tags/needs%20upgrade")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/devices/{DEVICE}/tags/needs%20upgrade")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| {
        c.assign_tag(DEVICE, "needs upgrade")?;
        c.remove_tag(DEVICE, "needs upgrade")
    })
    .await
    .unwrap();
}

// ── Fault tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_faults_and_delete_fault() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/faults"))
        .and(query_param("query", format!(r#"{{"device":"{DEVICE}"}}"#)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": format!("{DEVICE}:default"),
            "device": DEVICE,
            "channel": "default",
            "code": "cwmp.9002",
            "message": "Internal error",
            "retries": 2
        }])))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/faults/{DEVICE}%3Adefault")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let faults = with_client(&server, |c| {
        let faults = c.faults_for_device(DEVICE)?;
        c.delete_fault(&faults[0].id)?;
        Ok::<_, Error>(faults)
    })
    .await
    .unwrap();
    assert_eq!(faults[0].code.as_deref(), Some("cwmp.9002"));
}

// ── Transport tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_basic_auth_and_path_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nbi/devices"))
        .and(basic_auth("admin", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server)
        .with_path_prefix("nbi")
        .with_credentials(Credentials::new("admin", "admin"));
    let ids = with_config(config, |c| c.device_ids()).await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/presets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let result = with_client(&server, |c| c.presets().list()).await;
    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
    assert_eq!(err.to_string(), "HTTP 500: db down");
}

#[tokio::test]
async fn test_malformed_json_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("<html>proxy error</html>"),
        )
        .mount(&server)
        .await;

    let result = with_client(&server, |c| c.device_ids()).await;
    assert!(
        matches!(result, Err(Error::MalformedData { .. })),
        "expected MalformedData, got: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).with_timeout(Duration::from_millis(200));
    let result = with_config(config, |c| c.device_ids()).await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_injected_client_reports_its_own_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let result = tokio::task::spawn_blocking(move || {
        let timeout = Duration::from_secs(1);
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap();
        GenieClient::with_client(http, base, timeout).device_ids()
    })
    .await
    .unwrap();
    assert!(
        matches!(result, Err(Error::Timeout { timeout_secs: 1 })),
        "expected a 1s Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_error_quotes_only_body_prefix() {
    let server = MockServer::start().await;

    let page = format!("<html>{}</html>", "x".repeat(50_000));
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.device_ids()).await.unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, Error::MalformedData { .. }));
    assert!(message.contains("<html>xxx"), "{message}");
    assert!(message.contains("(50013 bytes)"), "{message}");
    assert!(message.len() < 1_000, "message is {} bytes", message.len());
}

#[tokio::test]
async fn test_dot_segment_ids_never_reach_server() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let results = with_client(&server, |c| {
        vec![
            c.presets().delete(".."),
            c.delete_task("."),
            c.retry_task(".."),
            c.delete_device("."),
            c.delete_fault(".."),
            c.delete_file("."),
            c.remove_tag("dev-1", ".."),
            c.assign_tag("..", "t"),
            c.reboot(".", false),
        ]
    })
    .await;
    for result in results {
        assert!(
            matches!(result, Err(Error::MalformedData { .. })),
            "expected MalformedData, got: {result:?}"
        );
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn test_connection_refused() {
    let config = ConnectionConfig::new("127.0.0.1").with_port(1);
    let client = GenieClient::new(&config).unwrap();
    let result = client.device_ids();
    assert!(
        matches!(result, Err(Error::Connection { .. })),
        "expected Connection error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_file_upload_headers() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/files/fw-2.4.1.bin"))
        .and(header("fileType", "1 Firmware Upgrade Image"))
        .and(header("oui", "000149"))
        .and(header("productClass", "c1500"))
        .and(header("version", "2.4.1"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = genieacs_api::FileMetadata {
        file_type: "1 Firmware Upgrade Image".into(),
        oui: "000149".into(),
        product_class: "c1500".into(),
        version: "2.4.1".into(),
    };
    with_client(&server, move |c| {
        c.upload_file_bytes("fw-2.4.1.bin", b"\x7fELF".to_vec(), &metadata)
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, b"\x7fELF");
}

#[tokio::test]
async fn test_upload_from_disk_then_read_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/files/backup.cfg"))
        .and(header("fileType", "3 Vendor Configuration File"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("query", r#"{"_id":"backup.cfg"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "backup.cfg",
            "length": 11,
            "metadata": { "fileType": "3 Vendor Configuration File", "oui": "", "productClass": "", "version": "" }
        }])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("backup.cfg");
    std::fs::write(&source, "hostname=x\n").unwrap();

    let stored = with_client(&server, move |c| {
        let metadata = genieacs_api::FileMetadata {
            file_type: "3 Vendor Configuration File".into(),
            ..Default::default()
        };
        c.upload_file("backup.cfg", &source, &metadata)?;
        c.file_metadata("backup.cfg")
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(stored.length, Some(11));
    assert_eq!(stored.metadata.file_type, "3 Vendor Configuration File");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, b"hostname=x\n");
}

#[tokio::test]
async fn test_upload_missing_local_file_is_io_error() {
    let server = MockServer::start().await;

    let result = with_client(&server, |c| {
        c.upload_file(
            "nope.bin",
            std::path::Path::new("/nonexistent/nope.bin"),
            &genieacs_api::FileMetadata::default(),
        )
    })
    .await;
    assert!(matches!(result, Err(Error::Io { .. })), "got: {result:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}
