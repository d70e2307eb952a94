use crate::error::FlowError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

pub const DEED_TOKEN_KEY: &str = "deed_token";
pub const BORROWER_TOKEN_KEY: &str = "borrower_token";
pub const AGREEMENT_NAA_KEY: &str = "agreement_naa";

/// Value stored under `agreement_naa` once the borrower accepts the network agreement.
pub const AGREEMENT_CHECKED: &str = "Checked";

/// A borrower's progress through the signing flow.
///
/// Pages gate themselves on which of these are present rather than on an
/// explicit step counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub deed_token: Option<String>,
    pub borrower_token: Option<String>,
    pub agreement_naa: Option<String>,
}

impl SessionState {
    pub fn deed_token(&self) -> Result<&str, FlowError> {
        self.deed_token
            .as_deref()
            .ok_or(FlowError::SessionExpired(DEED_TOKEN_KEY))
    }

    pub fn borrower_token(&self) -> Result<&str, FlowError> {
        self.borrower_token
            .as_deref()
            .ok_or(FlowError::SessionExpired(BORROWER_TOKEN_KEY))
    }

    pub fn has_agreed(&self) -> bool {
        self.agreement_naa.is_some()
    }

    pub fn require_agreement(&self) -> Result<(), FlowError> {
        if self.has_agreed() {
            Ok(())
        } else {
            Err(FlowError::AgreementRequired)
        }
    }

    /// Borrower identified against a deed; any earlier progress is discarded.
    pub fn begin_signing(&mut self, deed_token: &str, borrower_token: &str) {
        *self = Self {
            deed_token: Some(deed_token.to_string()),
            borrower_token: Some(borrower_token.to_string()),
            agreement_naa: None,
        };
    }

    pub fn record_agreement(&mut self) {
        self.agreement_naa = Some(AGREEMENT_CHECKED.to_string());
    }
}

/// Session state loaded for the current request.
///
/// Handlers change `state` and call [`BorrowerSession::save`]; nothing is
/// written back implicitly.
pub struct BorrowerSession {
    session: Session,
    pub state: SessionState,
}

#[async_trait]
impl<S> FromRequestParts<S> for BorrowerSession
where
    S: Send + Sync,
{
    type Rejection = FlowError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| FlowError::SessionUnavailable)?;

        let state = SessionState {
            deed_token: session.get(DEED_TOKEN_KEY).await?,
            borrower_token: session.get(BORROWER_TOKEN_KEY).await?,
            agreement_naa: session.get(AGREEMENT_NAA_KEY).await?,
        };

        Ok(Self { session, state })
    }
}

impl BorrowerSession {
    pub async fn save(&self) -> Result<(), FlowError> {
        store(&self.session, DEED_TOKEN_KEY, &self.state.deed_token).await?;
        store(&self.session, BORROWER_TOKEN_KEY, &self.state.borrower_token).await?;
        store(&self.session, AGREEMENT_NAA_KEY, &self.state.agreement_naa).await?;
        Ok(())
    }

    /// End the signing session: drop the stored record and expire the cookie.
    pub async fn clear(self) -> Result<(), FlowError> {
        self.session.flush().await?;
        Ok(())
    }
}

async fn store(
    session: &Session,
    key: &str,
    value: &Option<String>,
) -> Result<(), tower_sessions::session::Error> {
    match value {
        Some(value) => session.insert(key, value).await,
        None => session.remove::<String>(key).await.map(|_| ()),
    }
}
