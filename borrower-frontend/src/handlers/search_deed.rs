use crate::error::FlowError;
use crate::handlers::{found, rerender};
use crate::models::{BorrowerReferenceForm, BorrowerSession, DateOfBirthForm, Deed, FormData};
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use thiserror::Error;

pub const MISSING_REFERENCE_ERROR: &str = "Please enter your borrower reference";
pub const INVALID_DOB_ERROR: &str = "Please enter a valid date of birth";
pub const NO_MATCHING_DEED_ERROR: &str = "We could not find a mortgage deed matching these details";

/// Next page once the borrower has been matched to a deed.
pub const AFTER_BORROWER_FOUND: &str = "/how-to-proceed";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DobError {
    #[error("{}", INVALID_DOB_ERROR)]
    Malformed,
    #[error("{}", INVALID_DOB_ERROR)]
    InFuture,
}

/// Turn the borrower's day/month/year into a date of birth.
///
/// Rejects anything that is not a real calendar date (including years
/// before 1) and any date after `today`.
pub fn validate_dob(form: &DateOfBirthForm, today: NaiveDate) -> Result<NaiveDate, DobError> {
    let day = form.day.parse::<u32>().map_err(|_| DobError::Malformed)?;
    let month = form.month.parse::<u32>().map_err(|_| DobError::Malformed)?;
    let year = form
        .year
        .parse::<i32>()
        .ok()
        .filter(|year| *year >= 1)
        .ok_or(DobError::Malformed)?;

    let dob = NaiveDate::from_ymd_opt(year, month, day).ok_or(DobError::Malformed)?;

    if dob > today {
        return Err(DobError::InFuture);
    }
    Ok(dob)
}

#[derive(Template)]
#[template(path = "borrower-reference.html")]
pub struct BorrowerReferenceTemplate {
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "enter-dob.html")]
pub struct DateOfBirthTemplate {
    pub borrower_token: String,
    pub dob: DateOfBirthForm,
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "mortgage-deed.html")]
pub struct MortgageDeedTemplate {
    pub deed: Deed,
}

pub async fn borrower_reference_page() -> impl IntoResponse {
    BorrowerReferenceTemplate { error: None }
}

pub async fn date_of_birth_page() -> impl IntoResponse {
    DateOfBirthTemplate {
        borrower_token: String::new(),
        dob: DateOfBirthForm::default(),
        error: None,
    }
}

/// Both the borrower reference page and the date-of-birth page post here.
///
/// Without `validate` the reference is carried forward into the DOB form;
/// with it the borrower is matched against the deed API.
pub async fn submit_date_of_birth(
    State(state): State<AppState>,
    mut session: BorrowerSession,
    FormData(form): FormData<BorrowerReferenceForm>,
) -> Result<Response, FlowError> {
    let Some(borrower_token) = form.borrower_token() else {
        return Ok(rerender(BorrowerReferenceTemplate {
            error: Some(MISSING_REFERENCE_ERROR),
        }));
    };

    let dob_form = form.date_of_birth();
    let dob_page = |error: Option<&'static str>| DateOfBirthTemplate {
        borrower_token: borrower_token.to_string(),
        dob: dob_form.clone(),
        error,
    };

    if !form.wants_validation() {
        return Ok(dob_page(None).into_response());
    }

    let dob = match validate_dob(&dob_form, Local::now().date_naive()) {
        Ok(dob) => dob,
        Err(e) => {
            tracing::info!(reason = ?e, "Rejected date of birth");
            return Ok(rerender(dob_page(Some(INVALID_DOB_ERROR))));
        }
    };

    let Some(validation) = state.deed_api.validate_borrower(borrower_token, dob).await? else {
        tracing::info!("Borrower reference and date of birth matched no deed");
        return Ok(rerender(dob_page(Some(NO_MATCHING_DEED_ERROR))));
    };

    session
        .state
        .begin_signing(&validation.deed_token, borrower_token);
    session.save().await?;

    tracing::info!(deed_token = %validation.deed_token, "Borrower matched to deed");
    Ok(found(AFTER_BORROWER_FOUND))
}

pub async fn mortgage_deed(
    State(state): State<AppState>,
    session: BorrowerSession,
) -> Result<Response, FlowError> {
    let deed_token = session.state.deed_token()?;
    session.state.require_agreement()?;

    let deed = state
        .deed_api
        .get_deed(deed_token)
        .await?
        .ok_or_else(|| FlowError::DeedNotFound(deed_token.to_string()))?;

    Ok(MortgageDeedTemplate { deed }.into_response())
}
