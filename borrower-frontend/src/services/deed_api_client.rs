//! HTTP client for the deed API.
//!
//! Every call carries W3C trace context so deed API spans join the
//! borrower's request trace.

use crate::config::DeedApiSettings;
use crate::models::deed::{BorrowerValidation, Deed, DeedResponse};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use service_core::observability::TracedClientExt;

/// Date format the deed API expects for dates of birth.
pub const DOB_FORMAT: &str = "%d/%m/%Y";

pub struct DeedApiClient {
    client: Client,
    settings: DeedApiSettings,
}

/// A borrower's attempt to sign by entering the code sent to their phone.
#[derive(Debug, Serialize)]
pub struct AuthCodeVerification<'a> {
    #[serde(skip)]
    pub deed_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_token: Option<&'a str>,
    #[serde(rename = "authentication_code")]
    pub auth_code: &'a str,
}

impl DeedApiClient {
    pub fn new(settings: DeedApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);

        self.client.traced_get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to send GET request to {}: {}", url, e);
            anyhow::anyhow!("HTTP request failed: {}", e)
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response> {
        let url = self.url(path);

        self.client
            .traced_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })
    }

    /// Call the deed API's own service check.
    ///
    /// The raw response is returned; its status and body are interpreted by
    /// the service-check aggregator.
    pub async fn check_service_health(&self) -> Result<Response> {
        self.get(&self.settings.health_path).await
    }

    /// Fetch a deed, `None` if the deed API does not know the token.
    pub async fn get_deed(&self, deed_token: &str) -> Result<Option<Deed>> {
        let response = self.get(&format!("/deed/{}", deed_token)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let envelope: DeedResponse = response
            .error_for_status()?
            .json()
            .await
            .context("deed response was not a deed")?;

        Ok(Some(envelope.deed))
    }

    /// Match a borrower reference and date of birth to a deed.
    ///
    /// `None` means the pair is not recognised.
    pub async fn validate_borrower(
        &self,
        borrower_token: &str,
        dob: NaiveDate,
    ) -> Result<Option<BorrowerValidation>> {
        let response = self
            .post(
                "/borrower/validate",
                json!({
                    "borrower_token": borrower_token,
                    "dob": dob.format(DOB_FORMAT).to_string(),
                }),
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let validation = response
            .error_for_status()?
            .json()
            .await
            .context("borrower validation response was malformed")?;

        Ok(Some(validation))
    }

    /// Ask the deed API to text a fresh authentication code to the borrower.
    pub async fn request_auth_code(&self, deed_token: &str, borrower_token: &str) -> Result<()> {
        self.post(
            &format!("/deed/{}/request-auth-code", deed_token),
            json!({ "borrower_token": borrower_token }),
        )
        .await?
        .error_for_status()?;

        Ok(())
    }

    /// Submit an authentication code; `Ok(false)` when the deed API rejects it.
    pub async fn verify_auth_code(&self, verification: &AuthCodeVerification<'_>) -> Result<bool> {
        let body = serde_json::to_value(verification)?;
        let response = self
            .post(
                &format!("/deed/{}/verify-auth-code", verification.deed_token),
                body,
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY => {
                Ok(false)
            }
            status => Err(anyhow::anyhow!(
                "deed API answered auth code verification with {}",
                status
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_body_uses_deed_api_field_names() {
        let verification = AuthCodeVerification {
            deed_token: "063604",
            borrower_token: None,
            auth_code: "AAA123",
        };

        let body = serde_json::to_value(&verification).unwrap();

        assert_eq!(body, json!({ "authentication_code": "AAA123" }));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = DeedApiClient::new(DeedApiSettings {
            url: "http://deed-api:8080/".to_string(),
            health_path: "/health/service-check".to_string(),
        });

        assert_eq!(client.url("/deed/063604"), "http://deed-api:8080/deed/063604");
    }
}
