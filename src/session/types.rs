//! Request and response payloads for the login and registration endpoints.
//! Passwords are held as `SecretString` and only exposed while serializing.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, str::FromStr};

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub jwt_token: String,
}

/// Role requested at registration time, as the API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountRole {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "PETOWNER")]
    PetOwner,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => formatter.write_str("ADMIN"),
            Self::PetOwner => formatter.write_str("PETOWNER"),
        }
    }
}

impl FromStr for AccountRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().replace(['-', '_'], "").as_str() {
            "ADMIN" | "ROLEADMIN" => Ok(Self::Admin),
            "PETOWNER" | "ROLEPETOWNER" => Ok(Self::PetOwner),
            _ => Err(format!("unknown role: {value}")),
        }
    }
}

/// A new-account profile sent to `/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationProfile {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    pub mobile_number: String,
    pub user_role: AccountRole,
}

/// Account record returned by a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub user_id: Option<i64>,
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub user_role: Option<String>,
}
