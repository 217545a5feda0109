//! # Vetclinic (appointment client)
//!
//! `vetclinic` is a client for the veterinary clinic appointment API. Pet owners
//! register pets, request appointments and leave feedback; clinic staff review,
//! approve, reject or close appointments.
//!
//! ## Session model
//!
//! The server issues a signed bearer token on login. The client never verifies
//! the signature; it only decodes the payload into an [`session::Identity`] and
//! keeps the raw token in a process-scoped [`session::CredentialStore`]. Every
//! outbound call except `/login` goes through the [`session::RequestAuthorizer`],
//! which attaches `Authorization: Bearer <token>` when a token is present.
//!
//! Session state and the credential store must never diverge: clearing one
//! clears the other, and a stored token that no longer decodes forces a logout.

pub mod api;
pub mod cli;
pub mod clinic;
pub mod forms;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
