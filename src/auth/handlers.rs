use axum::{extract::State, routing::post, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::Credentials,
        error::AuthError,
        password::{hash_password_async, verify_password_async},
        repo_types::UserRecord,
    },
    state::AppState,
    storage::UserStore,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, creds), fields(email = %creds.email))]
pub async fn signup(
    State(state): State<AppState>,
    creds: Credentials,
) -> Result<&'static str, AuthError> {
    // Cheap rejection before paying for a hash; insert re-checks under the store lock.
    if state.store.find_by_email(&creds.email).await?.is_some() {
        warn!("email already registered");
        return Err(AuthError::UserExists);
    }

    let hash = hash_password_async(creds.password).await?;
    let record = UserRecord::new(creds.email, hash);

    if let Err(e) = state.store.insert(record).await {
        let e = AuthError::from(e);
        if matches!(e, AuthError::UserExists) {
            warn!("email registered concurrently");
        }
        return Err(e);
    }

    info!("user registered");
    Ok("Signup successful!")
}

#[instrument(skip(state, creds), fields(email = %creds.email))]
pub async fn login(
    State(state): State<AppState>,
    creds: Credentials,
) -> Result<&'static str, AuthError> {
    let Some(user) = state.store.find_by_email(&creds.email).await? else {
        warn!("login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    match verify_password_async(creds.password, user.password).await {
        Ok(true) => {
            info!("user logged in");
            Ok("Login successful!")
        }
        Ok(false) => {
            warn!("login invalid password");
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => {
            warn!(error = %e, "stored password is not a valid hash");
            Err(AuthError::InvalidCredentials)
        }
    }
}
