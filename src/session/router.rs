//! Post-login landing choice and client-side access guards. Guards are UX only;
//! the API remains the real authority and rejects what it must.

use crate::session::token::{Identity, Role};
use std::fmt;
use thiserror::Error;

/// Views a user can land on after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    FeedbackManagement,
    Home,
}

impl Landing {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::FeedbackManagement => "/addfeedback",
            Self::Home => "/home",
        }
    }
}

impl fmt::Display for Landing {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}

/// Administrators land on feedback management, everyone else on home.
#[must_use]
pub fn landing_for(role: &Role) -> Landing {
    match role {
        Role::Admin => Landing::FeedbackManagement,
        Role::PetOwner | Role::Other(_) | Role::Unspecified => Landing::Home,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Please log in to continue.")]
    NotAuthenticated,
    #[error("This action is restricted to clinic staff.")]
    NotAdmin,
}

/// Checks the current identity against the access a view or action needs.
///
/// # Errors
/// Returns `AccessDenied` when there is no identity or the role is insufficient.
pub fn guard(identity: Option<&Identity>, access: Access) -> Result<(), AccessDenied> {
    let identity = identity.ok_or(AccessDenied::NotAuthenticated)?;
    match access {
        Access::Authenticated => Ok(()),
        Access::Admin if identity.role.is_admin() => Ok(()),
        Access::Admin => Err(AccessDenied::NotAdmin),
    }
}
