use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use tracing::debug;

use super::{
    dto::{Credentials, CredentialsPayload},
    error::AuthError,
};

#[async_trait]
impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        // Anything unreadable is treated like an empty body.
        let payload = if content_type.starts_with("application/json") {
            match Json::<CredentialsPayload>::from_request(req, state).await {
                Ok(Json(p)) => p,
                Err(e) => {
                    debug!(error = %e, "json body rejected");
                    CredentialsPayload::default()
                }
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            match Form::<CredentialsPayload>::from_request(req, state).await {
                Ok(Form(p)) => p,
                Err(e) => {
                    debug!(error = %e, "form body rejected");
                    CredentialsPayload::default()
                }
            }
        } else {
            debug!(content_type = %content_type, "unsupported content type");
            CredentialsPayload::default()
        };

        payload.into_credentials().ok_or(AuthError::MissingFields)
    }
}
