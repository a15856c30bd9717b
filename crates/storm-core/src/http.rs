//! Request and response values exchanged with a [`Dispatcher`](crate::dispatch::Dispatcher).
//!
//! Both are plain data: a request describes one API call and is consumed by
//! the dispatcher, a response carries the decoded outcome of that call.

use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One API call: method, path relative to `/v1`, extra headers and JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method, POST unless overridden
    pub method: Method,
    /// Operation path, e.g. `/Server/list`
    pub path: String,
    /// Headers that take precedence over the injected defaults
    pub headers: HeaderMap,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// A POST request to `path`. Every Storm operation is tunnelled through POST.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A request with an explicit method.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header, replacing any injected default with the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Interpreted response of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status (always 200 for a response that reached the caller)
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body, `None` when the server sent nothing
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Decode the body into `T`. An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`](crate::Error::ParseError) if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let value = self.body.clone().unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// Take the body, substituting `null` for an empty one.
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body.unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;

    #[test]
    fn post_defaults() {
        let request = ApiRequest::post("/Server/list");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/Server/list");
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn with_header_replaces_previous_value() {
        let request = ApiRequest::post("/Server/list")
            .with_header(AUTHORIZATION, HeaderValue::from_static("Basic one"))
            .with_header(AUTHORIZATION, HeaderValue::from_static("Basic two"));
        assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(request.headers[AUTHORIZATION], "Basic two");
    }

    #[test]
    fn response_json_and_empty_body() {
        let response = ApiResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Some(json!({"servers": []})),
        };
        let decoded: serde_json::Map<String, Value> = response.json().unwrap();
        assert_eq!(decoded["servers"], json!([]));

        let empty = ApiResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        };
        let unit: Option<String> = empty.json().unwrap();
        assert!(unit.is_none());
        assert_eq!(empty.into_body(), Value::Null);
    }
}
