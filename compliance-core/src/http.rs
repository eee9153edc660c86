//! JSON-over-HTTP helper.
//!
//! A [`Transport`] only moves bytes: it sends an [`ApiRequest`] and hands back
//! the status line, content type and full body text. Deciding whether that
//! response is usable JSON happens here, so every transport (browser fetch,
//! test doubles) reports failures the same way.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cancel::CancelToken;
use crate::error::{excerpt, FetchError, HTTP_BODY_EXCERPT, NON_JSON_BODY_EXCERPT};

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Patch,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Patch => "PATCH",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    /// A request carrying the default `Accept: application/json` header.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: vec![("Accept".into(), JSON_CONTENT_TYPE.into())],
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Sets a header, replacing any existing one with the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json_body(self, body: &Value) -> Self {
        let mut req = self.header("Content-Type", JSON_CONTENT_TYPE);
        req.body = Some(body.to_string());
        req
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What a transport observed, body already read as text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains(JSON_CONTENT_TYPE))
    }

    /// Fails with [`FetchError::Http`] unless the status is 2xx.
    pub fn ensure_success(&self) -> Result<(), FetchError> {
        if self.is_success() {
            return Ok(());
        }
        Err(FetchError::Http {
            status: self.status,
            status_text: self.status_text.clone(),
            body_excerpt: excerpt(&self.body, HTTP_BODY_EXCERPT),
        })
    }

    /// Status check, then content-type check, then parse.
    pub fn into_json(self) -> Result<Value, FetchError> {
        self.ensure_success()?;
        if !self.is_json() {
            let content_type = self
                .content_type
                .as_deref()
                .map(str::to_ascii_lowercase)
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| "none".to_string());
            return Err(FetchError::NonJson {
                content_type,
                body_excerpt: excerpt(&self.body, NON_JSON_BODY_EXCERPT),
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parses the body if it happens to be JSON, regardless of content type.
    pub fn json_lenient(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Moves one request over the wire.
///
/// Implementations must resolve to [`FetchError::Aborted`] when `cancel`
/// fires before the body is read, and to [`FetchError::Network`] for any other
/// transport failure. Status codes are never errors at this layer.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest, cancel: Option<&CancelToken>) -> Result<RawResponse, FetchError>;
}

/// Sends `request` and decodes the body as JSON into `T`.
pub async fn fetch_json<T, R>(transport: &T, request: ApiRequest, cancel: Option<&CancelToken>) -> Result<R, FetchError>
where
    T: Transport,
    R: DeserializeOwned,
{
    let method = request.method;
    let url = request.url.clone();
    tracing::debug!(method = method.as_str(), %url, "request");
    let raw = transport.send(request, cancel).await?;
    if cancel.is_some_and(CancelToken::is_cancelled) {
        return Err(FetchError::Aborted);
    }
    let value = raw.into_json().map_err(|e| {
        tracing::warn!(method = method.as_str(), %url, status = ?e.status(), error = %e, "request failed");
        e
    })?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, content_type: Option<&str>, body: &str) -> RawResponse {
        RawResponse {
            status,
            status_text: "Status".into(),
            content_type: content_type.map(ToString::to_string),
            body: body.into(),
        }
    }

    #[test]
    fn every_failure_status_reports_its_code() {
        for status in [300u16, 301, 400, 401, 403, 404, 418, 429, 500, 502, 503, 599] {
            let err = raw(status, Some("application/json"), "{}").into_json().unwrap_err();
            assert!(err.to_string().contains(&status.to_string()), "{err}");
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn http_error_excerpt_is_200_chars() {
        let body = "x".repeat(500);
        match raw(500, None, &body).into_json() {
            Err(FetchError::Http { body_excerpt, .. }) => assert_eq!(body_excerpt.len(), 200),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn success_without_json_content_type_fails() {
        for ct in [Some("text/html; charset=utf-8"), Some("text/plain"), Some(""), None] {
            let err = raw(200, ct, "[1, 2]").into_json().unwrap_err();
            assert!(matches!(err, FetchError::NonJson { .. }), "{err:?}");
        }
    }

    #[test]
    fn non_json_error_names_content_type_and_excerpt() {
        let html = format!("<html>{}</html>", "a".repeat(300));
        match raw(200, Some("Text/HTML"), &html).into_json() {
            Err(FetchError::NonJson {
                content_type,
                body_excerpt,
            }) => {
                assert_eq!(content_type, "text/html");
                assert_eq!(body_excerpt.chars().count(), 120);
                assert!(body_excerpt.starts_with("<html>"));
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = raw(200, None, "x").into_json().unwrap_err();
        assert!(err.to_string().contains("content-type=none"));
    }

    #[test]
    fn json_content_type_is_case_insensitive() {
        let v = raw(200, Some("Application/JSON; charset=utf-8"), r#"{"a":1}"#)
            .into_json()
            .expect("json");
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn parse_failure_propagates() {
        let err = raw(200, Some("application/json"), "{oops").into_json().unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn caller_headers_override_default_accept() {
        let req = ApiRequest::get("/x").header("accept", "text/plain");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header_value("Accept"), Some("text/plain"));
    }

    #[test]
    fn json_body_sets_content_type() {
        let req = ApiRequest::new(Method::Patch, "/x").json_body(&serde_json::json!({"is_compliant": true}));
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.header_value("accept"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"is_compliant":true}"#));
    }
}
