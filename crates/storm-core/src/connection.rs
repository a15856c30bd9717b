//! HTTP connection to the API endpoint.

use crate::client::{ConnectionOptions, PERSISTENT_POOL_MAX_IDLE_PER_HOST};
use crate::endpoint::Endpoint;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use std::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Raw outcome of one HTTP exchange, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Undecoded body bytes
    pub body: Vec<u8>,
}

/// Transport channel to a fixed endpoint.
///
/// In persistent mode the underlying pool keeps one idle connection to the
/// host and reuses it across calls. Otherwise no idle connection is kept and
/// each request opens its own. [`Connection::reset`] throws the pool away.
pub struct Connection {
    endpoint: Endpoint,
    persistent: bool,
    options: ConnectionOptions,
    http: RwLock<Client>,
}

impl Connection {
    /// Create a connection for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn new(endpoint: Endpoint, persistent: bool, options: ConnectionOptions) -> Result<Self> {
        let http = build_http(persistent, &options)?;
        debug!(
            origin = %endpoint.origin(),
            persistent,
            "Created Storm API connection"
        );

        Ok(Self {
            endpoint,
            persistent,
            options,
            http: RwLock::new(http),
        })
    }

    /// The endpoint this connection talks to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether connections are kept open between requests.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Issue a fully specified request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] or [`Error::Timeout`] when no response is
    /// received. HTTP statuses are not inspected here.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let http = self
            .http
            .read()
            .map(|client| client.clone())
            .map_err(|_| Error::Transport("connection lock poisoned".to_string()))?;

        let mut request = http.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Discard the underlying channel and start from a fresh pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be rebuilt.
    pub fn reset(&self) -> Result<()> {
        let fresh = build_http(self.persistent, &self.options)?;
        let mut guard = self
            .http
            .write()
            .map_err(|_| Error::Transport("connection lock poisoned".to_string()))?;
        *guard = fresh;
        debug!(origin = %self.endpoint.origin(), "Reset Storm API connection");
        Ok(())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("persistent", &self.persistent)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn build_http(persistent: bool, options: &ConnectionOptions) -> Result<Client> {
    let max_idle = if persistent {
        PERSISTENT_POOL_MAX_IDLE_PER_HOST
    } else {
        0
    };

    let mut builder = ClientBuilder::new()
        .user_agent(options.user_agent())
        .timeout(options.timeout())
        .connect_timeout(options.connect_timeout())
        .pool_idle_timeout(options.pool_idle_timeout())
        .pool_max_idle_per_host(max_idle);

    if !options.tls_verify {
        warn!("TLS verification disabled for Storm API connection");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connection(server: &MockServer, persistent: bool) -> Connection {
        let endpoint = Endpoint::parse(&server.uri()).unwrap();
        Connection::new(endpoint, persistent, ConnectionOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn request_returns_raw_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/list"))
            .and(body_string("{}"))
            .respond_with(ResponseTemplate::new(500).set_body_string("raw"))
            .mount(&server)
            .await;

        let conn = connection(&server, false);
        let url = conn.endpoint().url_for("/Server/list").unwrap();
        let raw = conn
            .request(Method::POST, url, HeaderMap::new(), Some(b"{}".to_vec()))
            .await
            .unwrap();

        assert_eq!(raw.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(raw.body, b"raw");
    }

    #[tokio::test]
    async fn persistent_connection_survives_reset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let conn = connection(&server, true);
        assert!(conn.is_persistent());
        let url = conn.endpoint().url_for("/Server/list").unwrap();

        conn.request(Method::POST, url.clone(), HeaderMap::new(), None)
            .await
            .unwrap();
        conn.reset().unwrap();
        conn.request(Method::POST, url, HeaderMap::new(), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let endpoint = Endpoint::parse("http://127.0.0.1:1").unwrap();
        let conn = Connection::new(endpoint, false, ConnectionOptions::default()).unwrap();
        let url = conn.endpoint().url_for("/Server/list").unwrap();
        let err = conn
            .request(Method::POST, url, HeaderMap::new(), None)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
