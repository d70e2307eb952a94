#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use borrower_frontend::config::{DeedApiSettings, ServerSettings};
use borrower_frontend::services::DeedApiClient;
use borrower_frontend::startup::build_router;
use borrower_frontend::AppState;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DEED_TOKEN: &str = "063604";
pub const BORROWER_TOKEN: &str = "38";
pub const AUTH_CODE: &str = "AAA123";

pub fn server_settings() -> ServerSettings {
    ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        secure_cookies: false,
        session_expiry_minutes: 30,
    }
}

pub fn deed_api_settings(url: &str) -> DeedApiSettings {
    DeedApiSettings {
        url: url.to_string(),
        health_path: "/health/service-check".to_string(),
    }
}

/// The frontend router wired to a mock deed API, acting as one browser.
///
/// The session cookie from each response is replayed on the next request.
pub struct TestApp {
    pub router: Router,
    pub deed_api: MockServer,
    cookie: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let deed_api = MockServer::start().await;
        let router = router_for(&deed_api.uri());

        Self {
            router,
            deed_api,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST with no body and no content type, as a bare form submit would.
    pub async fn post_empty(&mut self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        response
    }

    pub async fn mock_borrower(&self, borrower_token: &str, deed_token: &str) {
        Mock::given(method("POST"))
            .and(path("/borrower/validate"))
            .and(body_partial_json(json!({ "borrower_token": borrower_token })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deed_token": deed_token,
                "phone_number": "07700900123"
            })))
            .mount(&self.deed_api)
            .await;
    }

    /// Answer every borrower validation with `status` and no body.
    pub async fn mock_borrower_validation_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/borrower/validate"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.deed_api)
            .await;
    }

    pub async fn mock_deed(&self, deed_token: &str, status: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/deed/{}", deed_token)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deed": {
                    "token": deed_token,
                    "status": status,
                    "md_ref": "e-MD12344",
                    "title_number": "GR515835",
                    "property_address": "5 The Drive, This Town, This County, PL4 4TH"
                }
            })))
            .mount(&self.deed_api)
            .await;
    }

    pub async fn mock_auth_code_request(&self, deed_token: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/deed/{}/request-auth-code", deed_token)))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.deed_api)
            .await;
    }

    /// Accept `AUTH_CODE`; any other code is refused with 401.
    pub async fn mock_auth_code_verification(&self, deed_token: &str) {
        let verify_path = format!("/deed/{}/verify-auth-code", deed_token);

        Mock::given(method("POST"))
            .and(path(verify_path.clone()))
            .and(body_partial_json(json!({ "authentication_code": AUTH_CODE })))
            .respond_with(ResponseTemplate::new(200))
            .with_priority(1)
            .mount(&self.deed_api)
            .await;

        Mock::given(method("POST"))
            .and(path(verify_path))
            .respond_with(ResponseTemplate::new(401))
            .with_priority(2)
            .mount(&self.deed_api)
            .await;
    }

    /// Walk the reference and date-of-birth pages so the session holds
    /// `deed_token` and `borrower_token`.
    pub async fn sign_in_borrower(&mut self) {
        self.mock_borrower(BORROWER_TOKEN, DEED_TOKEN).await;

        let response = self
            .post_form(
                "/date-of-birth",
                &[
                    ("borrower_token", BORROWER_TOKEN),
                    ("dob-day", "01"),
                    ("dob-month", "10"),
                    ("dob-year", "1976"),
                    ("validate", "True"),
                ],
            )
            .await;
        assert_eq!(response.status(), 302, "borrower sign-in failed");
    }

    pub async fn accept_network_agreement(&mut self) {
        let response = self.post_form("/confirm-naa", &[("agree-naa", "on")]).await;
        assert_eq!(response.status(), 302, "network agreement not accepted");
    }
}

pub fn router_for(deed_api_url: &str) -> Router {
    let deed_api = Arc::new(DeedApiClient::new(deed_api_settings(deed_api_url)));
    build_router(AppState::new(deed_api), &server_settings())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
