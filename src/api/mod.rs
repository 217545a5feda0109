//! HTTP transport for the clinic API with a consistent timeout and error policy.
//! Every request passes through the [`RequestAuthorizer`] before it is sent, so
//! feature clients never touch the bearer token themselves.

pub mod config;
pub mod errors;

pub use config::AppConfig;
pub use errors::AppError;

use crate::{session::RequestAuthorizer, APP_USER_AGENT};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

/// Maximum number of error body characters surfaced to the caller.
const MAX_ERROR_CHARS: usize = 200;

/// Path of the one endpoint that must never carry a bearer token.
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";

/// An API call before it hits the wire. Cloning is cheap enough that the
/// authorizer always works on a copy.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Body>,
}

/// Request payload. Most endpoints take JSON; a few read the raw body as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl OutboundRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Returns `AppError::Serialization` if the body cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, AppError> {
        let value = serde_json::to_value(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        self.body = Some(Body::Json(value));
        Ok(self)
    }

    /// Attaches a bare `text/plain` body.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    /// Whether this request targets the login endpoint.
    #[must_use]
    pub fn is_login(&self) -> bool {
        is_login_path(&self.path)
    }
}

/// Matches `/login` as the last path segment, ignoring query and trailing slash.
#[must_use]
pub fn is_login_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment == LOGIN_PATH.trim_start_matches('/'))
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: AppConfig,
    authorizer: RequestAuthorizer,
}

impl ApiClient {
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: AppConfig, authorizer: RequestAuthorizer) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            config,
            authorizer,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Authorizes and sends a request, returning the raw response.
    ///
    /// # Errors
    /// Returns `AppError::Timeout` or `AppError::Network` on transport failure.
    pub async fn send(&self, request: &OutboundRequest) -> Result<Response, AppError> {
        let request = self.authorizer.authorize(request);
        let url = build_url(&self.config.api_base_url, &request.path);

        let span = info_span!("api.request", http.method = %request.method, url = %url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers)
            .timeout(self.config.timeout);

        match &request.body {
            Some(Body::Json(body)) => builder = builder.json(body),
            Some(Body::Text(body)) => {
                builder = builder
                    .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
                    .body(body.clone());
            }
            None => {}
        }

        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        debug!("{} {} -> {}", request.method, url, response.status());

        Ok(response)
    }

    /// Sends a request and decodes a JSON response.
    ///
    /// # Errors
    /// Returns transport errors, `AppError::Http` for non-2xx responses, or
    /// `AppError::Parse` if the body is not the expected JSON.
    pub async fn json<T: DeserializeOwned>(&self, request: &OutboundRequest) -> Result<T, AppError> {
        let response = self.send(request).await?;
        handle_json_response(response).await
    }

    /// Sends a request and ignores any successful response body.
    ///
    /// # Errors
    /// Returns transport errors or `AppError::Http` for non-2xx responses.
    pub async fn empty(&self, request: &OutboundRequest) -> Result<(), AppError> {
        let response = self.send(request).await?;
        handle_empty_response(response).await
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AppError::Http {
        status,
        message: sanitize_body(&body),
    }
}

/// Trims and truncates an error body for display.
pub(crate) fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CredentialStore, MemoryCredentialStore};
    use anyhow::Result;
    use secrecy::SecretString;
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{body_json, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(base: &str, store: Arc<dyn CredentialStore>) -> Result<ApiClient> {
        let config = AppConfig::new(base, 5, false)?;
        Ok(ApiClient::new(config, RequestAuthorizer::new(store))?)
    }

    #[test]
    fn build_url_joins_base_and_path() {
        assert_eq!(
            build_url("https://clinic.example/api/", "/pet/3"),
            "https://clinic.example/api/pet/3"
        );
        assert_eq!(build_url("", "/pet"), "/pet");
    }

    #[test]
    fn login_path_detection() {
        assert!(is_login_path("/login"));
        assert!(is_login_path("/api/login/"));
        assert!(is_login_path("https://clinic.example/api/login?next=home"));
        assert!(!is_login_path("/logins"));
        assert!(!is_login_path("/login/history"));
        assert!(!is_login_path("/register"));
        assert!(!is_login_path(""));
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  denied \n"), "denied");
        assert_eq!(sanitize_body(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn json_body_is_attached() -> Result<()> {
        let request = OutboundRequest::post("/pet").json(&json!({"name": "Rex"}))?;
        assert_eq!(request.body, Some(Body::Json(json!({"name": "Rex"}))));
        assert_eq!(request.method, Method::POST);
        Ok(())
    }

    #[tokio::test]
    async fn send_posts_text_body_verbatim() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/appointments/2/status"))
            .and(header("Content-Type", "text/plain"))
            .and(body_string("CLOSED"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(
            &format!("{}/api", server.uri()),
            Arc::new(MemoryCredentialStore::new()),
        )?;
        let request = OutboundRequest::put("/appointments/2/status").text("CLOSED");
        assert_eq!(request.body, Some(Body::Text("CLOSED".to_string())));
        api.empty(&request).await?;
        Ok(())
    }

    #[tokio::test]
    async fn send_attaches_bearer_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pet"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_token(SecretString::from(
            "abc".to_string(),
        )));
        let api = client_for(&format!("{}/api", server.uri()), store)?;
        let pets: Vec<Value> = api.json(&OutboundRequest::get("/pet")).await?;
        assert!(pets.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn send_posts_json_and_maps_http_errors() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/feedback"))
            .and(body_json(json!({"rating": 9})))
            .respond_with(ResponseTemplate::new(403).set_body_string("Access Denied"))
            .mount(&server)
            .await;

        let api = client_for(
            &format!("{}/api", server.uri()),
            Arc::new(MemoryCredentialStore::new()),
        )?;
        let request = OutboundRequest::post("/feedback").json(&json!({"rating": 9}))?;
        let result = api.empty(&request).await;
        assert_eq!(
            result,
            Err(AppError::Http {
                status: 403,
                message: "Access Denied".to_string()
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn send_reports_unreachable_server() -> Result<()> {
        let api = client_for("http://127.0.0.1:9/api", Arc::new(MemoryCredentialStore::new()))?;
        let result = api.empty(&OutboundRequest::get("/pet")).await;
        assert!(matches!(
            result,
            Err(AppError::Network(_) | AppError::Timeout(_))
        ));
        Ok(())
    }
}
