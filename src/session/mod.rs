//! Session and request-authorization core.
//!
//! Flow overview: the login command calls [`AuthGateway::login`], the server
//! answers with a bearer token, the token codec decodes it into an
//! [`Identity`], the session state publishes that identity, the credential
//! store keeps the raw token, and the role router picks a landing view. Every
//! later call goes through the [`RequestAuthorizer`], which reads the store.
//!
//! Lifecycle: `Unauthenticated` -> login -> `Authenticated` -> logout, or a
//! stored token that no longer decodes -> `Unauthenticated`. Token material
//! must never be logged.

pub mod authorizer;
pub mod gateway;
pub mod router;
pub mod state;
pub mod store;
pub mod token;
pub mod types;

pub use authorizer::RequestAuthorizer;
pub use gateway::{AuthError, AuthGateway};
pub use router::{guard, landing_for, Access, AccessDenied, Landing};
pub use state::SessionState;
pub use store::{CredentialStore, MemoryCredentialStore};
pub use token::{decode, Identity, Role};
pub use types::{Account, AccountRole, RegistrationProfile};
