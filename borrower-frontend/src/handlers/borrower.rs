use crate::error::FlowError;
use crate::handlers::{found, rerender};
use crate::models::{BorrowerSession, FormData, NetworkAgreementForm, SessionState};
use askama::Template;
use axum::response::{IntoResponse, Response};

pub const NAA_REQUIRED_ERROR: &str = "You must agree to these Terms and Conditions to proceed";

/// Next page once the network agreement is accepted.
pub const AFTER_AGREEMENT: &str = "/mortgage-deed";

#[derive(Template)]
#[template(path = "confirm-borrower-naa.html")]
pub struct NetworkAgreementTemplate {
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "how-to-proceed.html")]
pub struct HowToProceedTemplate {}

/// Record the borrower's acceptance of the network agreement.
///
/// Leaves `state` untouched and returns the inline error when the
/// agreement box was not ticked.
pub fn confirm_network_agreement(
    form: &NetworkAgreementForm,
    state: &mut SessionState,
) -> Result<(), &'static str> {
    if !form.agreed() {
        return Err(NAA_REQUIRED_ERROR);
    }
    state.record_agreement();
    Ok(())
}

pub async fn network_agreement_page() -> impl IntoResponse {
    NetworkAgreementTemplate { error: None }
}

pub async fn submit_network_agreement(
    mut session: BorrowerSession,
    FormData(form): FormData<NetworkAgreementForm>,
) -> Result<Response, FlowError> {
    match confirm_network_agreement(&form, &mut session.state) {
        Ok(()) => {
            session.save().await?;
            tracing::info!("Borrower accepted the network agreement");
            Ok(found(AFTER_AGREEMENT))
        }
        Err(error) => Ok(rerender(NetworkAgreementTemplate { error: Some(error) })),
    }
}

pub async fn how_to_proceed() -> impl IntoResponse {
    HowToProceedTemplate {}
}
