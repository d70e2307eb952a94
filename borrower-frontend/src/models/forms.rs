//! Typed views of the form posts the borrower pages submit.
//!
//! Request bodies are decoded into these structs before any handler logic
//! runs, so handlers never look fields up by name.

use crate::error::FlowError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::Validate;

/// Borrower reference page post, optionally carrying the date of birth.
///
/// The reference page posts just `borrower_token`; the date-of-birth page
/// posts it again as a hidden field together with `validate` and the DOB.
#[derive(Debug, Default, Deserialize)]
pub struct BorrowerReferenceForm {
    pub borrower_token: Option<String>,
    pub validate: Option<String>,
    #[serde(rename = "dob-day")]
    pub dob_day: Option<String>,
    #[serde(rename = "dob-month")]
    pub dob_month: Option<String>,
    #[serde(rename = "dob-year")]
    pub dob_year: Option<String>,
}

impl BorrowerReferenceForm {
    pub fn borrower_token(&self) -> Option<&str> {
        non_blank(self.borrower_token.as_deref())
    }

    pub fn wants_validation(&self) -> bool {
        self.validate.is_some()
    }

    pub fn date_of_birth(&self) -> DateOfBirthForm {
        DateOfBirthForm::new(
            self.dob_day.as_deref().unwrap_or_default(),
            self.dob_month.as_deref().unwrap_or_default(),
            self.dob_year.as_deref().unwrap_or_default(),
        )
    }
}

/// Raw day/month/year as typed by the borrower.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateOfBirthForm {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateOfBirthForm {
    pub fn new(day: &str, month: &str, year: &str) -> Self {
        Self {
            day: day.trim().to_string(),
            month: month.trim().to_string(),
            year: year.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AuthCodeForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Please enter your authentication code"))]
    pub auth_code: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkAgreementForm {
    #[serde(rename = "agree-naa")]
    pub agree_naa: Option<String>,
}

impl NetworkAgreementForm {
    /// An unticked checkbox is simply absent from the post.
    pub fn agreed(&self) -> bool {
        non_blank(self.agree_naa.as_deref()).is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// `application/x-www-form-urlencoded` body decoded into `T`.
///
/// Unlike `axum::Form` this does not insist on a content type, and any
/// decoding failure (including a missing required field) is a 400.
pub struct FormData<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormData<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FlowError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| FlowError::InvalidForm(e.body_text()))?;

        serde_urlencoded::from_bytes(&body)
            .map(FormData)
            .map_err(|e| FlowError::InvalidForm(e.to_string()))
    }
}

/// [`FormData`] that must also pass its `validator` rules.
pub struct ValidatedForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = FlowError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let FormData(form) = FormData::<T>::from_request(req, state).await?;
        form.validate()
            .map_err(|e| FlowError::InvalidForm(e.to_string()))?;
        Ok(ValidatedForm(form))
    }
}
