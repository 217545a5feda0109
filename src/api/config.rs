//! Client configuration for the clinic API. Values come from the command line
//! or `VETCLINIC_*` environment variables; nothing here is secret.

use std::time::Duration;
use url::Url;

use super::errors::AppError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    /// Reject stored tokens whose `exp` claim has passed.
    pub check_expiry: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            check_expiry: false,
        }
    }
}

impl AppConfig {
    /// Builds a config after validating and normalizing the base URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the base URL is empty, unparsable, or not http(s).
    pub fn new(api_base_url: &str, timeout_seconds: u64, check_expiry: bool) -> Result<Self, AppError> {
        let api_base_url = normalize_base_url(api_base_url)?;
        if timeout_seconds == 0 {
            return Err(AppError::Config("Timeout must be at least one second.".to_string()));
        }

        Ok(Self {
            api_base_url,
            timeout: Duration::from_secs(timeout_seconds),
            check_expiry,
        })
    }
}

fn normalize_base_url(value: &str) -> Result<String, AppError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::Config("API base URL is not configured.".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|err| AppError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(AppError::Config(format!(
            "Unsupported API base URL scheme: {scheme}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace_and_trailing_slashes() {
        assert_eq!(
            normalize_base_url("  https://clinic.example/api// "),
            Ok("https://clinic.example/api".to_string())
        );
    }

    #[test]
    fn normalize_rejects_empty_and_bad_scheme() {
        assert!(matches!(normalize_base_url("   "), Err(AppError::Config(_))));
        assert!(matches!(
            normalize_base_url("ftp://clinic.example"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(normalize_base_url("not a url"), Err(AppError::Config(_))));
    }

    #[test]
    fn new_rejects_zero_timeout() {
        assert!(AppConfig::new(DEFAULT_API_BASE_URL, 0, false).is_err());
    }

    #[test]
    fn new_keeps_settings() -> Result<(), AppError> {
        let config = AppConfig::new("http://127.0.0.1:9000/api/", 3, true)?;
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(config.check_expiry);
        Ok(())
    }
}
