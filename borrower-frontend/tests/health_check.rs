use borrower_frontend::config::{ObservabilitySettings, Settings};
use borrower_frontend::startup::Application;
use reqwest::Client;

mod common;

/// Boot the real application on a random port and return its address.
async fn spawn_app() -> String {
    let settings = Settings {
        server: common::server_settings(),
        deed_api: common::deed_api_settings("http://127.0.0.1:1"),
        observability: ObservabilitySettings::default(),
    };

    let app = Application::build(settings)
        .await
        .expect("Failed to build test application");
    let address = format!("http://127.0.0.1:{}", app.port());

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    address
}

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let address = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", address))
        .header("x-request-id", "borrower-req-1")
        .send()
        .await
        .expect("Failed to execute request");

    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "borrower-req-1");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers["content-security-policy"]
        .to_str()
        .unwrap()
        .contains("frame-ancestors 'none'"));
}

#[tokio::test]
async fn request_id_is_generated_when_missing() {
    let address = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/health", address))
        .send()
        .await
        .expect("Failed to execute request");

    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid_like(request_id), "unexpected request id {request_id}");
}

#[tokio::test]
async fn metrics_unavailable_without_recorder() {
    let address = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/metrics", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}
