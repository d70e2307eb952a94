use serde::{Deserialize, Serialize};

/// Deed status once every borrower on the deed has signed.
pub const ALL_SIGNED_STATUS: &str = "ALL-SIGNED";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Deed {
    pub token: String,
    pub status: String, // DRAFT, PARTIAL, ALL-SIGNED, ...
    #[serde(default)]
    pub md_ref: Option<String>,
    #[serde(default)]
    pub title_number: Option<String>,
    #[serde(default)]
    pub property_address: Option<String>,
}

impl Deed {
    pub fn is_fully_signed(&self) -> bool {
        self.status == ALL_SIGNED_STATUS
    }
}

/// Envelope the deed API wraps a single deed in.
#[derive(Debug, Deserialize)]
pub struct DeedResponse {
    pub deed: Deed,
}

/// Deed API answer when a borrower reference and date of birth match a deed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BorrowerValidation {
    pub deed_token: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}
