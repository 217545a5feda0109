use crate::{
    api::config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECONDS},
    cli::commands::{ARG_API_URL, ARG_CHECK_EXPIRY, ARG_TIMEOUT, ARG_TOKEN},
};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub token: Option<SecretString>,
    pub timeout_seconds: u64,
    pub check_expiry: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            check_expiry: false,
        }
    }

    #[must_use]
    pub fn from_matches(matches: &clap::ArgMatches) -> Self {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let mut globals = Self::new(api_url);
        globals.timeout_seconds = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        globals.check_expiry = matches.get_flag(ARG_CHECK_EXPIRY);

        if let Some(token) = matches
            .get_one::<String>(ARG_TOKEN)
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
        {
            globals.set_token(SecretString::from(token.to_string()));
        }

        globals
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    /// # Errors
    /// Returns an error if the base URL or timeout is invalid.
    pub fn app_config(&self) -> Result<AppConfig> {
        Ok(AppConfig::new(
            &self.api_url,
            self.timeout_seconds,
            self.check_expiry,
        )?)
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("check_expiry", &self.check_expiry)
            .finish()
    }
}
