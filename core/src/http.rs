//! JSON client for the REST API.
//!
//! Every call goes through [`HttpClient::execute`], which injects the bearer token,
//! performs the single refresh-and-retry on a 401 and normalizes failures into
//! [`ApiError`]. The wire itself is behind [`Transport`] so the browser `fetch`
//! binding and test doubles plug in the same way.

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::RefreshResponse;
use crate::session::SessionStore;

pub const REFRESH_PATH: &str = "/auth/refresh";
const AUTH_PREFIX: &str = "/auth/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request handed to the [`Transport`].
///
/// Transports must send the ambient session cookie (`credentials: include`), which
/// is what `/auth/refresh` authenticates with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub struct HttpClient<T> {
    transport: Rc<T>,
    session: SessionStore,
    config: Rc<ClientConfig>,
}

impl<T> Clone for HttpClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            session: self.session.clone(),
            config: Rc::clone(&self.config),
        }
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T, session: SessionStore, config: ClientConfig) -> Self {
        Self {
            transport: Rc::new(transport),
            session,
            config: Rc::new(config),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode(body)?;
        self.request(Method::Post, path, Some(body)).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode(body)?;
        self.request(Method::Put, path, Some(body)).await
    }

    /// Sends a request whose successful body is irrelevant (`DELETE`, logout).
    pub async fn send_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<(), ApiError> {
        self.execute(method, path, body).await.map(|_| ())
    }

    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<R, ApiError> {
        let response = self.execute(method, path, body).await?;
        decode(&response)
    }

    /// Sends once; on a 401 outside `/auth/*`, refreshes and retries exactly once.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let response = self.send_once(method, path, body.clone()).await?;
        if response.status != 401 || path.starts_with(AUTH_PREFIX) {
            return check(response);
        }

        debug!(%method, path, "received 401, attempting token refresh");
        if self.refresh().await {
            // Whatever token is current now wins, even if another refresh raced us.
            let retry = self.send_once(method, path, body).await?;
            return check(retry);
        }

        warn!(%method, path, "token refresh failed, session expired");
        self.session.clear();
        Err(ApiError::SessionExpired)
    }

    /// Exchanges the session cookie for a new access token.
    pub async fn refresh(&self) -> bool {
        let request = HttpRequest {
            method: Method::Post,
            url: self.config.url(REFRESH_PATH),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: None,
        };
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("refresh request failed: {e}");
                return false;
            }
        };
        if !response.is_success() {
            debug!(status = response.status, "refresh rejected");
            return false;
        }
        match serde_json::from_str::<RefreshResponse>(&response.body) {
            Ok(refreshed) => {
                self.session.set_token(&refreshed.access_token);
                true
            }
            Err(e) => {
                warn!("refresh response unreadable: {e}");
                false
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        let request = HttpRequest {
            method,
            url: self.config.url(path),
            headers,
            body,
        };

        debug!(%method, path, "sending request");
        self.transport
            .send(request)
            .await
            .map_err(|e| ApiError::Network(e.0))
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Decode(format!("Failed to encode body: {e}")))
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApiError> {
    serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Decode(format!("Failed to parse JSON: {e}")))
}

fn check(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Http {
            status: response.status,
            message: error_message(&response),
        })
    }
}

/// JSON `message` field, else the raw body, else the status text.
#[must_use]
pub fn error_message(response: &HttpResponse) -> String {
    let fallback = || {
        if response.status_text.is_empty() {
            format!("Request failed with status {}", response.status)
        } else {
            response.status_text.clone()
        }
    };

    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(value) => value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map_or_else(fallback, str::to_string),
        Err(_) if !response.body.trim().is_empty() => response.body.clone(),
        Err(_) => fallback(),
    }
}

/// Percent-encodes an opaque id for use as one path segment.
#[must_use]
pub fn path_segment(raw: &str) -> String {
    // Literal `+` is already `%2B`, so any `+` left stands for a space.
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment_escapes_reserved_bytes() {
        assert_eq!(path_segment("64f1c0ab"), "64f1c0ab");
        assert_eq!(path_segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(path_segment("x y+z"), "x%20y%2Bz");
    }

    fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_error_message_from_json_field() {
        let res = response(400, "Bad Request", r#"{"message":"Title is required"}"#);
        assert_eq!(error_message(&res), "Title is required");
    }

    #[test]
    fn test_error_message_json_without_message_uses_status_text() {
        let res = response(403, "Forbidden", r#"{"error":"nope"}"#);
        assert_eq!(error_message(&res), "Forbidden");
    }

    #[test]
    fn test_error_message_raw_body() {
        let res = response(502, "Bad Gateway", "upstream timed out");
        assert_eq!(error_message(&res), "upstream timed out");
    }

    #[test]
    fn test_error_message_empty_body() {
        assert_eq!(error_message(&response(404, "Not Found", "")), "Not Found");
        assert_eq!(
            error_message(&response(500, "", "")),
            "Request failed with status 500"
        );
    }

    #[test]
    fn test_check_passes_2xx() {
        assert!(check(response(204, "No Content", "")).is_ok());
        assert!(matches!(
            check(response(409, "Conflict", "")),
            Err(ApiError::Http { status: 409, .. })
        ));
    }
}
