// HTTP client for the admin backend
//
// Three operations: login, dashboard aggregate, activity logs. Each failure
// maps to exactly one ApiError variant so callers can pattern-match instead
// of sniffing message strings. Nothing here retries; every failure is a
// single terminal result surfaced to the caller.

use crate::models::{DashboardAggregate, LogEntry};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Request timeout for all backend calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure taxonomy for backend calls.
///
/// `InvalidCredentials` and `MalformedResponse` are presented identically on
/// the login form (neither leaks backend error shapes); the rest drive the
/// session lifecycle in the root controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend rejected the login attempt.
    InvalidCredentials,
    /// A success/failure envelope could not be parsed as expected.
    MalformedResponse,
    /// No local session credential exists.
    Unauthenticated,
    /// The backend rejected the session credential (401).
    SessionExpired,
    /// Any other non-success response or transport failure.
    FetchFailed(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidCredentials => write!(f, "login rejected by the backend"),
            ApiError::MalformedResponse => write!(f, "unexpected response from the backend"),
            ApiError::Unauthenticated => write!(f, "no authentication token found"),
            ApiError::SessionExpired => write!(f, "session expired or invalid"),
            ApiError::FetchFailed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Success envelope for `POST /auth/login`.
#[derive(Deserialize)]
struct TokenEnvelope {
    token: String,
}

/// Error envelope returned by the backend on non-2xx responses.
#[derive(Deserialize)]
struct ErrorEnvelope {
    description: Option<String>,
}

/// Envelope for `GET /logs`.
#[derive(Deserialize)]
struct LogsEnvelope {
    #[serde(default)]
    logs: Vec<LogEntry>,
}

/// Client for the admin backend API.
///
/// Cheap to clone (reqwest clients share their connection pool), so fetch
/// tasks can each own a clone. The session credential is passed per call;
/// the root controller owns it and decides when it exists.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Exchange credentials for a bearer token.
    pub async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<String, ApiError> {
        let body = serde_json::json!({
            "identifier": identifier,
            "secret": secret,
        });

        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let envelope: TokenEnvelope = response
                .json()
                .await
                .map_err(|_| ApiError::MalformedResponse)?;
            return Ok(envelope.token);
        }

        // Non-2xx: the envelope must parse before we trust the status code.
        let envelope: ErrorEnvelope = response
            .json()
            .await
            .map_err(|_| ApiError::MalformedResponse)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!("login rejected with {}", status);
            return Err(ApiError::InvalidCredentials);
        }

        Err(ApiError::FetchFailed(
            envelope.description.unwrap_or_else(|| "Login failed".to_string()),
        ))
    }

    /// Fetch the combined dashboard snapshot. Requires a present session.
    pub async fn fetch_dashboard(
        &self,
        token: Option<&str>,
    ) -> Result<DashboardAggregate, ApiError> {
        let token = token.ok_or(ApiError::Unauthenticated)?;

        let response = self
            .http
            .get(self.url("/dashboard"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            return Err(ApiError::FetchFailed(format!(
                "Failed to fetch dashboard data (HTTP {}).",
                status.as_u16()
            )));
        }

        response
            .json::<DashboardAggregate>()
            .await
            .map_err(|_| ApiError::MalformedResponse)
    }

    /// Fetch the backend activity-log feed. Requires a present session.
    ///
    /// Fetched independently of the aggregate; a failure here degrades only
    /// the logs panel and must never end the session.
    pub async fn fetch_logs(&self, token: Option<&str>) -> Result<Vec<LogEntry>, ApiError> {
        let token = token.ok_or(ApiError::Unauthenticated)?;

        let response = self
            .http
            .get(self.url("/logs"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            return Err(ApiError::FetchFailed(format!(
                "Failed to fetch logs (HTTP {}).",
                status.as_u16()
            )));
        }

        response
            .json::<LogsEnvelope>()
            .await
            .map(|e| e.logs)
            .map_err(|_| ApiError::MalformedResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://127.0.0.1:5000/v1/");
        assert_eq!(client.url("/dashboard"), "http://127.0.0.1:5000/v1/dashboard");

        let client = ApiClient::new("http://127.0.0.1:5000/v1");
        assert_eq!(client.url("/auth/login"), "http://127.0.0.1:5000/v1/auth/login");
    }

    #[tokio::test]
    async fn test_fetch_without_token_is_unauthenticated() {
        let client = ApiClient::new("http://127.0.0.1:1");
        // No token: the call must fail before any network traffic happens.
        assert_eq!(
            client.fetch_dashboard(None).await.unwrap_err(),
            ApiError::Unauthenticated
        );
        assert_eq!(
            client.fetch_logs(None).await.unwrap_err(),
            ApiError::Unauthenticated
        );
    }

    #[test]
    fn test_error_display_is_plain_text() {
        let err = ApiError::FetchFailed("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(
            ApiError::SessionExpired.to_string(),
            "session expired or invalid"
        );
    }
}
