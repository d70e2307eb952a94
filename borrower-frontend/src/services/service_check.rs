//! Aggregated health of the borrower frontend and the services behind it.
//!
//! The deed API reports on its own dependencies; this frontend appends one
//! entry for its link to the deed API. A failed or unhealthy call collapses
//! the report to that single entry.

use crate::models::health::ServiceHealthEntry;
use crate::services::deed_api_client::DeedApiClient;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Status recorded when the deed API could not be reached or understood.
pub const UNREACHABLE_STATUS: u16 = 500;

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCheck {
    /// Downstream entries as reported, plus this frontend's entry.
    Healthy {
        downstream: Vec<Value>,
        frontend: ServiceHealthEntry,
    },
    /// The deed API was unreachable, malformed, or not 200.
    Degraded(ServiceHealthEntry),
}

/// One line of the report. Deed API entries pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Downstream(Value),
    Frontend(ServiceHealthEntry),
}

#[derive(Debug, Serialize)]
pub struct ServiceCheckReport {
    pub services: Vec<ReportEntry>,
}

impl ServiceCheck {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceCheck::Healthy { frontend, .. } => frontend.status_code,
            ServiceCheck::Degraded(entry) => entry.status_code,
        }
    }

    /// Downstream entries first, this frontend's entry last.
    pub fn into_report(self) -> ServiceCheckReport {
        let services = match self {
            ServiceCheck::Healthy {
                downstream,
                frontend,
            } => downstream
                .into_iter()
                .map(ReportEntry::Downstream)
                .chain(std::iter::once(ReportEntry::Frontend(frontend)))
                .collect(),
            ServiceCheck::Degraded(entry) => vec![ReportEntry::Frontend(entry)],
        };
        ServiceCheckReport { services }
    }
}

/// One call to the deed API's service check, folded into a [`ServiceCheck`].
///
/// Never fails: transport, decoding and shape errors are logged and reported
/// as [`UNREACHABLE_STATUS`].
pub async fn check_services(deed_api: &DeedApiClient) -> ServiceCheck {
    match fetch_downstream(deed_api).await {
        Ok((status, services)) => aggregate(status, services),
        Err(e) => {
            tracing::error!(
                error = ?e,
                deed_api = %deed_api.base_url(),
                "Service check could not reach deed-api"
            );
            ServiceCheck::Degraded(ServiceHealthEntry::unreachable(UNREACHABLE_STATUS))
        }
    }
}

async fn fetch_downstream(deed_api: &DeedApiClient) -> Result<(u16, Vec<Value>)> {
    let response = deed_api.check_service_health().await?;
    let status = response.status().as_u16();

    let body: Value = response
        .json()
        .await
        .context("deed-api service check did not return JSON")?;

    Ok((status, parse_services(body)?))
}

/// Pull the `services` list out of a deed API service-check body.
pub fn parse_services(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut fields) => match fields.remove("services") {
            Some(Value::Array(services)) => Ok(services),
            Some(other) => Err(anyhow::anyhow!(
                "`services` should be a list, got {}",
                other
            )),
            None => Err(anyhow::anyhow!("service check body has no `services`")),
        },
        other => Err(anyhow::anyhow!(
            "service check body should be an object, got {}",
            other
        )),
    }
}

/// Combine the deed API's status and entries into the frontend's report.
pub fn aggregate(status_code: u16, services: Vec<Value>) -> ServiceCheck {
    if status_code != 200 {
        return ServiceCheck::Degraded(ServiceHealthEntry::unreachable(status_code));
    }

    ServiceCheck::Healthy {
        downstream: services,
        frontend: ServiceHealthEntry::connected(status_code),
    }
}
