use serde::Deserialize;

/// Body of `/signup` and `/login`, as sent by a JSON client or the HTML form.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Email/password pair with both fields present and non-empty.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialsPayload {
    pub fn into_credentials(self) -> Option<Credentials> {
        let email = self.email.filter(|e| !e.is_empty())?;
        let password = self.password.filter(|p| !p.is_empty())?;
        Some(Credentials { email, password })
    }
}
