use serde::{Deserialize, Serialize};

pub const SERVICE_FROM: &str = "borrower frontend";
pub const SERVICE_TO: &str = "deed-api";
pub const CONNECTED_MESSAGE: &str = "Successfully connected";
pub const CONNECTION_ERROR_MESSAGE: &str = "Error: Could not connect";

/// One hop in the service-check report: this frontend's view of the deed API.
///
/// Serializes to the same shape as the entries the deed API reports for its
/// own dependencies.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceHealthEntry {
    pub status_code: u16,
    pub service_from: String,
    pub service_to: String,
    pub service_message: String,
}

impl ServiceHealthEntry {
    pub fn connected(status_code: u16) -> Self {
        Self::new(status_code, CONNECTED_MESSAGE)
    }

    pub fn unreachable(status_code: u16) -> Self {
        Self::new(status_code, CONNECTION_ERROR_MESSAGE)
    }

    fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            service_from: SERVICE_FROM.to_string(),
            service_to: SERVICE_TO.to_string(),
            service_message: message.to_string(),
        }
    }
}
