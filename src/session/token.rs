//! Bearer token payload decoding. The signature is not verified here; trust is
//! established by the issuing server and the client only reads the claims it
//! needs to route and label the session.

use base64ct::{Base64UrlUnpadded, Encoding};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_PETOWNER: &str = "ROLE_PETOWNER";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("empty token")]
    Empty,
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid token payload: {0}")]
    Payload(String),
}

/// Coarse permission class carried in the `role` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    PetOwner,
    /// A role string this client does not know about, kept verbatim.
    Other(String),
    /// The token carried no role claim.
    Unspecified,
}

impl Role {
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::Unspecified,
            Some(ROLE_ADMIN) => Self::Admin,
            Some(ROLE_PETOWNER) => Self::PetOwner,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => formatter.write_str(ROLE_ADMIN),
            Self::PetOwner => formatter.write_str(ROLE_PETOWNER),
            Self::Other(value) => formatter.write_str(value),
            Self::Unspecified => formatter.write_str("unspecified"),
        }
    }
}

/// Claims read from the token payload. Anything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: i64,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// The decoded user behind a bearer token.
///
/// Only ever built from a token that decoded completely; there is no partially
/// populated identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Expiration as unix seconds, when the token carries one.
    pub expires_at: Option<i64>,
    pub token: SecretString,
}

impl Identity {
    /// Whether the `exp` claim is at or before `now_unix_seconds`.
    /// A token without `exp` never expires on the client side.
    #[must_use]
    pub fn is_expired(&self, now_unix_seconds: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_unix_seconds)
    }
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    // tolerate padded segments from non-conforming issuers
    let bytes = Base64UrlUnpadded::decode_vec(s.trim_end_matches('=')).map_err(|_| Error::Base64)?;
    serde_json::from_slice(&bytes).map_err(|err| Error::Payload(err.to_string()))
}

/// Decode a compact `header.payload.signature` token into an [`Identity`].
///
/// # Errors
///
/// Returns an error if the token is empty, does not have three segments, or its
/// header/payload are not base64url-encoded JSON with the expected claims.
pub fn decode(token: &str) -> Result<Identity, Error> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Empty);
    }

    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
    // the signature segment must exist, its content is not checked
    parts.next().ok_or(Error::TokenFormat)?;
    if parts.next().is_some() || header_b64.is_empty() || claims_b64.is_empty() {
        return Err(Error::TokenFormat);
    }

    let _header: serde_json::Map<String, serde_json::Value> = b64d_json(header_b64)?;
    let claims: Claims = b64d_json(claims_b64)?;

    Ok(Identity {
        user_id: claims.user_id,
        email: claims.email,
        name: claims.name.unwrap_or_default(),
        role: Role::parse(claims.role.as_deref()),
        expires_at: claims.exp,
        token: SecretString::from(token.to_string()),
    })
}
