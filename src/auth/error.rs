use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::storage::InsertError;

/// Failures a signup or login request can end in. Bodies are plain text.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email and password are required.")]
    MissingFields,
    #[error("User already exists.")]
    UserExists,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Internal server error.")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::UserExists => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl From<InsertError> for AuthError {
    fn from(e: InsertError) -> Self {
        match e {
            InsertError::Duplicate => Self::UserExists,
            InsertError::Other(e) => Self::Internal(e),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            error!(error = %format!("{e:#}"), "request failed");
        }
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_expected_statuses() {
        assert_eq!(AuthError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::UserExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Internal(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = AuthError::Internal(anyhow::anyhow!("disk full at /var/data"));
        assert_eq!(err.to_string(), "Internal server error.");
    }

    #[test]
    fn duplicate_insert_becomes_user_exists() {
        assert!(matches!(AuthError::from(InsertError::Duplicate), AuthError::UserExists));
    }
}
