//! Request dispatch.
//!
//! [`Dispatcher`] is the seam between operations and transport: operations
//! build an [`ApiRequest`], a dispatcher turns it into an [`ApiResponse`] or
//! an [`Error`]. [`HttpDispatcher`] talks to the real API; other crates can
//! plug in their own implementation (e.g. an in-memory one for tests).

use crate::auth::Credentials;
use crate::config::StormConfig;
use crate::connection::Connection;
use crate::http::{ApiRequest, ApiResponse};
use crate::response::interpret;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Issues API requests and interprets their responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Issue one request.
    ///
    /// # Errors
    ///
    /// Returns the typed failure described by [`interpret`](crate::response::interpret),
    /// or a transport error if no response was received.
    async fn issue(&self, request: ApiRequest) -> Result<ApiResponse>;

    /// Drop and re-establish any underlying channel. A no-op by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be rebuilt.
    fn reload(&self) -> Result<()> {
        Ok(())
    }
}

/// Dispatcher backed by a live HTTP [`Connection`].
#[derive(Debug)]
pub struct HttpDispatcher {
    connection: Connection,
    credentials: Credentials,
}

impl HttpDispatcher {
    /// Build a dispatcher from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the connection
    /// cannot be created.
    pub fn from_config(config: &StormConfig) -> Result<Self> {
        config.check()?;
        let endpoint = config.endpoint()?;
        let connection = Connection::new(
            endpoint,
            config.persistent,
            config.connection_options.clone(),
        )?;

        Ok(Self::new(connection, config.credentials()))
    }

    /// Build a dispatcher from its parts.
    #[must_use]
    pub const fn new(connection: Connection, credentials: Credentials) -> Self {
        Self {
            connection,
            credentials,
        }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    fn headers_for(&self, overrides: HeaderMap) -> Result<HeaderMap> {
        let auth = HeaderValue::from_str(&self.credentials.basic_auth_header()).map_err(|err| {
            Error::ConfigError(format!("Credentials produce an invalid header: {err}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(AUTHORIZATION, auth);
        // Replaces defaults with the same name rather than appending.
        headers.extend(overrides);
        Ok(headers)
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn issue(&self, request: ApiRequest) -> Result<ApiResponse> {
        let ApiRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let url = self.connection.endpoint().url_for(&path)?;
        let headers = self.headers_for(headers)?;
        let body = body.as_ref().map(serde_json::to_vec).transpose()?;

        debug!(%method, path = %path, "Sending Storm API request");
        let raw = self
            .connection
            .request(method, url, headers, body)
            .await
            .map_err(|err| {
                warn!(path = %path, error = %err, "Storm API request failed");
                err
            })?;
        debug!(path = %path, status = raw.status.as_u16(), "Received Storm API response");

        interpret(&path, raw.status, raw.headers, &raw.body).map_err(|err| {
            if err.should_log() {
                warn!(path = %path, error = %err, "Storm API call failed");
            } else {
                debug!(path = %path, error = %err, "Storm API call returned an error");
            }
            err
        })
    }

    fn reload(&self) -> Result<()> {
        self.connection.reset()
    }
}
