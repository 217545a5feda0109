use crate::{
    cli::actions::{print_json, Context},
    forms::{LoginForm, RegistrationForm},
    session::{landing_for, AccountRole, RegistrationProfile},
};
use anyhow::{anyhow, Context as _, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a SecretString,
    pub confirm_password: &'a SecretString,
    pub mobile_number: &'a str,
    pub role: &'a str,
}

/// # Errors
/// Returns an error if the form is invalid or the credentials are rejected.
pub async fn login(context: &Context, email: &str, password: &SecretString) -> Result<()> {
    LoginForm {
        email,
        password: password.expose_secret(),
    }
    .validate()?;

    let identity = context.gateway.login(email.trim(), password).await?;
    let landing = landing_for(&identity.role);

    println!("Logged in as {} ({})", identity.email, identity.role);
    println!("Landing: {landing}");
    println!("export VETCLINIC_TOKEN={}", identity.token.expose_secret());

    Ok(())
}

/// # Errors
/// Returns an error if the form is invalid or the server rejects the account.
pub async fn register(context: &Context, registration: Registration<'_>) -> Result<()> {
    RegistrationForm {
        username: registration.username,
        email: registration.email,
        password: registration.password.expose_secret(),
        confirm_password: registration.confirm_password.expose_secret(),
        mobile_number: registration.mobile_number,
        role: registration.role,
    }
    .validate()?;

    let user_role = registration
        .role
        .parse::<AccountRole>()
        .map_err(|err| anyhow!(err))?;

    let profile = RegistrationProfile {
        username: registration.username.trim().to_string(),
        email: registration.email.trim().to_string(),
        password: registration.password.clone(),
        mobile_number: registration.mobile_number.trim().to_string(),
        user_role,
    };

    let account = context.gateway.register(&profile).await?;
    print_json(&account)
}

pub fn logout(context: &Context) {
    context.gateway.logout();
    println!("Logged out. Run: unset VETCLINIC_TOKEN");
}

/// # Errors
/// Returns an error when no readable token was supplied.
pub fn whoami(context: &Context) -> Result<()> {
    let identity = context
        .gateway
        .current_identity()
        .context("Not logged in")?;

    print_json(&json!({
        "userId": identity.user_id,
        "email": identity.email,
        "name": identity.name,
        "role": identity.role.to_string(),
        "landing": landing_for(&identity.role).path(),
        "expiresAt": identity.expires_at,
    }))
}
