use crate::{
    api::{sanitize_body, ApiClient, OutboundRequest, LOGIN_PATH, REGISTER_PATH},
    session::{
        state::SessionState,
        store::CredentialStore,
        token::{self, Identity, Role},
        types::{Account, LoginRequest, LoginResponse, RegistrationProfile},
    },
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Any login failure. Whether it was the network or the credentials is
    /// logged, never shown.
    #[error("Invalid Credentials! Please Try Again.")]
    InvalidCredentials,
    /// Registration rejected; carries the server's message when it sent one.
    #[error("{0}")]
    Registration(String),
}

/// Login, registration and logout, plus identity queries derived from the
/// stored credential.
///
/// The gateway is the only writer of both the credential store and the session
/// state and keeps them in step: a token is stored only alongside a decoded
/// identity, and clearing one clears the other.
#[derive(Clone)]
pub struct AuthGateway {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    session: SessionState,
    check_expiry: bool,
}

impl AuthGateway {
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>, session: SessionState) -> Self {
        let check_expiry = api.config().check_expiry;
        Self {
            api,
            store,
            session,
            check_expiry,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Creates an account.
    ///
    /// # Errors
    /// Returns `AuthError::Registration` with the server's message verbatim when
    /// the response carries one, otherwise a generic message.
    #[instrument(skip_all)]
    pub async fn register(&self, profile: &RegistrationProfile) -> Result<Account, AuthError> {
        let request = OutboundRequest::post(REGISTER_PATH)
            .json(profile)
            .map_err(|err| {
                error!("Registration request could not be encoded: {err}");
                AuthError::Registration(REGISTRATION_FAILED.to_string())
            })?;

        let response = self.api.send(&request).await.map_err(|err| {
            error!("Registration failed: {err}");
            AuthError::Registration(REGISTRATION_FAILED.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Registration rejected: {status}");
            return Err(AuthError::Registration(registration_message(&body)));
        }

        let account = response.json::<Account>().await.map_err(|err| {
            error!("Registration response could not be decoded: {err}");
            AuthError::Registration(REGISTRATION_FAILED.to_string())
        })?;

        info!("Registered account {}", account.email);

        Ok(account)
    }

    /// Exchanges credentials for a token, then stores it and publishes the
    /// decoded identity.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidCredentials` for every failure: rejected
    /// credentials, transport errors, or a token that does not decode.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Identity, AuthError> {
        let request = OutboundRequest::post(LOGIN_PATH)
            .json(&LoginRequest {
                email,
                password: password.clone(),
            })
            .map_err(|err| {
                error!("Login request could not be encoded: {err}");
                AuthError::InvalidCredentials
            })?;

        let response: LoginResponse = self.api.json(&request).await.map_err(|err| {
            error!("Login failed: {err}");
            AuthError::InvalidCredentials
        })?;

        let identity = token::decode(&response.jwt_token).map_err(|err| {
            error!("Login returned an unreadable token: {err}");
            AuthError::InvalidCredentials
        })?;

        self.store.store(identity.token.clone());
        self.session.set_user(Some(identity.clone()));

        info!(user_id = identity.user_id, role = %identity.role, "Login succeeded");

        Ok(identity)
    }

    /// Clears the session and the stored token. Safe to call repeatedly.
    pub fn logout(&self) {
        self.session.set_user(None);
        self.store.clear();
    }

    /// True when a token is stored; the token itself is not re-validated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.retrieve().is_some()
    }

    /// Decodes the stored token on demand.
    ///
    /// A stored token that no longer decodes (or has expired, when expiry is
    /// enforced) is treated as a logout.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        let token = self.store.retrieve()?;

        match token::decode(token.expose_secret()) {
            Ok(identity) if self.check_expiry && identity.is_expired(now_unix_seconds()) => {
                warn!("Stored credential has expired, logging out");
                self.logout();
                None
            }
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!("Stored credential is unreadable, logging out: {err}");
                self.logout();
                None
            }
        }
    }

    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.current_identity().map(|identity| identity.role)
    }

    #[must_use]
    pub fn current_user_id(&self) -> Option<i64> {
        self.current_identity().map(|identity| identity.user_id)
    }

    /// Rebuilds the session state from a token already in the store, e.g. one
    /// handed in on the command line.
    pub fn restore(&self) -> Option<Identity> {
        let identity = self.current_identity()?;
        self.session.set_user(Some(identity.clone()));
        Some(identity)
    }
}

fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

/// Picks the user-facing message out of a registration error body.
fn registration_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return REGISTRATION_FAILED.to_string();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map_or_else(|| REGISTRATION_FAILED.to_string(), str::to_string),
        Ok(Value::String(message)) if !message.trim().is_empty() => message.trim().to_string(),
        Ok(_) => REGISTRATION_FAILED.to_string(),
        // plain text bodies are the server's own message
        Err(_) => sanitize_body(trimmed),
    }
}
