use actix_web::{
    App,
    http::{StatusCode, header::ContentType},
    test, web,
};
use homething_provisioning::{
    api::{self, SimulatorApi},
    wifi_scan::FileScanner,
};
use homething_provisioning_core::{Payload, Value, WifiScan, WireFormat};
use std::{io::Write, path::Path};
use tempfile::{NamedTempFile, TempDir};

const SETTINGS: &str = r#"[
    {"name": "wifi", "title": "Wifi", "variables": [
        {"name": "ssid", "title": "Network", "type": "ssid"},
        {"name": "password", "title": "Password", "type": "password"}
    ]},
    {"name": "device", "title": "Device", "variables": [
        {"name": "id", "title": "Device ID", "type": "device_id"},
        {"name": "debug", "title": "Debug", "type": "checkbox"}
    ]}
]"#;

const DEVICE_ID: [u8; 6] = [0xa0, 0xb1, 0xc2, 0xd3, 0xe4, 0xf5];

fn make_api(scanner: FileScanner) -> SimulatorApi {
    SimulatorApi::new(SETTINGS.to_string(), DEVICE_ID.to_vec(), 1024, scanner)
        .expect("failed to create api")
}

async fn init_app(
    api: SimulatorApi,
    static_dir: &Path,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let static_dir = static_dir.to_path_buf();
    test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .configure(|cfg| api::configure::<FileScanner>(cfg, &static_dir)),
    )
    .await
}

fn static_dir() -> TempDir {
    let dir = TempDir::new().expect("failed to create static dir");
    std::fs::write(dir.path().join("index.html"), "<html>provisioning</html>")
        .expect("failed to write index.html");
    dir
}

fn json_payload(body: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/config")
        .insert_header(ContentType::json())
        .set_payload(body.to_string())
}

#[actix_web::test]
async fn saved_values_are_served_without_passwords() {
    let dir = static_dir();
    let app = init_app(make_api(FileScanner::default()), dir.path()).await;

    let req = json_payload(
        r#"{"wifi": {"ssid": "Home", "password": "secret"}, "device": {"debug": true}}"#,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "Saved");

    let req = test::TestRequest::get().uri("/config").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        serde_json::json!({
            "wifi": {"ssid": "Home"},
            "device": {"id": "a0b1c2d3e4f5", "debug": true}
        })
    );
}

#[actix_web::test]
async fn msgpack_is_served_when_accepted() {
    let dir = static_dir();
    let app = init_app(make_api(FileScanner::default()), dir.path()).await;

    let req = test::TestRequest::get()
        .uri("/config")
        .insert_header(("Accept", "application/msgpack"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/msgpack"
    );

    let body = test::read_body(resp).await;
    let payload = WireFormat::MessagePack.decode(&body).unwrap();
    assert_eq!(
        payload.get("device", "id"),
        Some(&Value::Bytes(DEVICE_ID.to_vec()))
    );
}

#[actix_web::test]
async fn msgpack_body_is_accepted() {
    let dir = static_dir();
    let app = init_app(make_api(FileScanner::default()), dir.path()).await;
    let mut payload = Payload::new();
    payload.insert("wifi", "ssid", "Office");

    let req = test::TestRequest::post()
        .uri("/config")
        .insert_header(("Content-Type", "application/msgpack"))
        .set_payload(WireFormat::MessagePack.encode(&payload).unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn wrong_value_type_is_rejected() {
    let dir = static_dir();
    let app = init_app(make_api(FileScanner::default()), dir.path()).await;

    let req = json_payload(r#"{"device": {"debug": "yes"}}"#).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        test::read_body(resp).await,
        "Failed to extract bool variable value"
    );
}

#[actix_web::test]
async fn oversized_and_malformed_bodies_are_rejected() {
    let dir = static_dir();
    let app = init_app(make_api(FileScanner::default()), dir.path()).await;

    let huge = format!(r#"{{"wifi": {{"ssid": "{}"}}}}"#, "x".repeat(2048));
    let resp = test::call_service(&app, json_payload(&huge).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "config content length too big");

    let resp = test::call_service(&app, json_payload("{not json").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "failed to parse buffer");
}

#[actix_web::test]
async fn unknown_variables_are_ignored() {
    let dir = static_dir();
    let api = make_api(FileScanner::default());
    let app = init_app(api, dir.path()).await;

    let req = json_payload(r#"{"wifi": {"channel": 6}, "mqtt": {"host": "broker"}}"#).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/config").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["wifi"], serde_json::json!({}));
    assert!(body.get("mqtt").is_none());
}

#[actix_web::test]
async fn wifiscan_serves_scan_results() {
    let dir = static_dir();
    let mut results = NamedTempFile::new().unwrap();
    write!(
        results,
        r#"{{"networks": [{{"name": "Home", "rssi": -40, "channel": 6}}]}}"#
    )
    .unwrap();
    let scanner = FileScanner::new(Some(results.path().to_path_buf()));
    let app = init_app(make_api(scanner), dir.path()).await;

    let req = test::TestRequest::get().uri("/wifiscan").to_request();
    let scan: WifiScan = test::call_and_read_body_json(&app, req).await;

    assert_eq!(scan.networks.len(), 1);
    assert_eq!(scan.networks[0].name, "Home");
}

#[actix_web::test]
async fn settings_and_static_page_are_served() {
    let dir = static_dir();
    let app = init_app(make_api(FileScanner::default()), dir.path()).await;

    let req = test::TestRequest::get().uri("/settings.json").to_request();
    let settings: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(settings[0]["name"], "wifi");

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "<html>provisioning</html>");
}
