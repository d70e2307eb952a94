use crate::error::FlowError;
use crate::handlers::{found, rerender};
use crate::models::{AuthCodeForm, BorrowerSession, Deed, SessionState, ValidatedForm};
use crate::services::AuthCodeVerification;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const INVALID_AUTH_CODE_ERROR: &str = "The authentication code you entered is not valid";

/// Where the JS page moves to while the signature is being applied.
pub const SIGNING_IN_PROGRESS: &str = "/confirming-mortgage-deed";

/// Where the no-JS page goes once the code is accepted.
pub const AFTER_NO_JS_VERIFICATION: &str = "/confirm-mortgage-is-signed";

#[derive(Template)]
#[template(path = "enter-auth-code.html")]
pub struct AuthCodeTemplate {
    pub code_sent: bool,
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "confirming-deed.html")]
pub struct ConfirmingDeedTemplate {}

#[derive(Template)]
#[template(path = "deed-signed.html")]
pub struct DeedSignedTemplate {
    pub deed: Deed,
}

#[derive(Template)]
#[template(path = "finished.html")]
pub struct FinishedTemplate {}

/// Body of `/verify-auth-code`, read by the page script.
#[derive(Debug, Serialize)]
pub struct VerificationResult {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl VerificationResult {
    fn from_outcome(verified: bool) -> Self {
        if verified {
            Self {
                verified,
                redirect: Some(SIGNING_IN_PROGRESS),
                error: None,
            }
        } else {
            Self {
                verified,
                redirect: None,
                error: Some(INVALID_AUTH_CODE_ERROR),
            }
        }
    }
}

pub async fn enter_auth_code_page(session: BorrowerSession) -> Result<Response, FlowError> {
    session.state.deed_token()?;

    Ok(AuthCodeTemplate {
        code_sent: false,
        error: None,
    }
    .into_response())
}

/// Have the deed API text a new code to the borrower, then show the code form.
pub async fn request_auth_code(
    State(state): State<AppState>,
    session: BorrowerSession,
) -> Result<Response, FlowError> {
    let deed_token = session.state.deed_token()?;
    let borrower_token = session.state.borrower_token()?;

    state
        .deed_api
        .request_auth_code(deed_token, borrower_token)
        .await?;
    tracing::info!(%deed_token, "Authentication code requested");

    Ok(AuthCodeTemplate {
        code_sent: true,
        error: None,
    }
    .into_response())
}

async fn verify(
    state: &AppState,
    session: &SessionState,
    form: &AuthCodeForm,
) -> Result<bool, FlowError> {
    let deed_token = session.deed_token()?;

    let verified = state
        .deed_api
        .verify_auth_code(&AuthCodeVerification {
            deed_token,
            borrower_token: session.borrower_token.as_deref(),
            auth_code: &form.auth_code,
        })
        .await?;

    tracing::info!(%deed_token, verified, "Authentication code checked");
    Ok(verified)
}

pub async fn verify_auth_code(
    State(state): State<AppState>,
    session: BorrowerSession,
    ValidatedForm(form): ValidatedForm<AuthCodeForm>,
) -> Result<Json<VerificationResult>, FlowError> {
    let verified = verify(&state, &session.state, &form).await?;
    Ok(Json(VerificationResult::from_outcome(verified)))
}

pub async fn verify_auth_code_no_js(
    State(state): State<AppState>,
    session: BorrowerSession,
    ValidatedForm(form): ValidatedForm<AuthCodeForm>,
) -> Result<Response, FlowError> {
    if verify(&state, &session.state, &form).await? {
        Ok(found(AFTER_NO_JS_VERIFICATION))
    } else {
        Ok(rerender(AuthCodeTemplate {
            code_sent: false,
            error: Some(INVALID_AUTH_CODE_ERROR),
        }))
    }
}

pub async fn confirming_mortgage_deed(session: BorrowerSession) -> Result<Response, FlowError> {
    session.state.deed_token()?;
    session.state.borrower_token()?;

    Ok(ConfirmingDeedTemplate {}.into_response())
}

pub async fn confirm_mortgage_is_signed(
    State(state): State<AppState>,
    session: BorrowerSession,
) -> Result<Response, FlowError> {
    let deed_token = session.state.deed_token()?;

    let deed = state
        .deed_api
        .get_deed(deed_token)
        .await?
        .ok_or_else(|| FlowError::DeedNotFound(deed_token.to_string()))?;

    Ok(DeedSignedTemplate { deed }.into_response())
}

/// Last page of the flow; the signing session ends here.
pub async fn finished(session: BorrowerSession) -> Result<Response, FlowError> {
    let deed_token = session.state.deed_token()?.to_string();
    session.state.borrower_token()?;

    session.clear().await?;
    tracing::info!(%deed_token, "Borrower finished signing");

    Ok(FinishedTemplate {}.into_response())
}
