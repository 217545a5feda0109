//! Bearer token attachment for outbound API calls.

use crate::{api::OutboundRequest, session::store::CredentialStore};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides, per request, whether to attach `Authorization: Bearer <token>`.
///
/// The login call is always forwarded untouched. Other calls get the header on
/// a copy of the request when a token is stored; the caller's request is never
/// modified. No retries, no refresh: an unauthenticated call is left for the
/// server to reject.
#[derive(Clone)]
pub struct RequestAuthorizer {
    store: Arc<dyn CredentialStore>,
}

impl RequestAuthorizer {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn authorize(&self, request: &OutboundRequest) -> OutboundRequest {
        if request.is_login() {
            return request.clone();
        }

        let Some(token) = self.store.retrieve() else {
            debug!("no stored credential, forwarding {} unauthenticated", request.path);
            return request.clone();
        };

        let mut authorized = request.clone();
        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                authorized.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                warn!("stored credential is not a valid header value, forwarding unauthenticated");
            }
        }

        authorized
    }
}
