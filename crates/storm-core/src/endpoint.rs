//! Resolved API endpoint.

use crate::{Error, Result};
use url::Url;

/// Production API origin.
pub const API_URL: &str = "https://api.stormondemand.com";

/// Version segment inserted between the base path and every operation path.
pub const API_VERSION: &str = "v1";

/// Scheme, host, port and path prefix resolved once from the configured URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: u16,
    path: String,
}

impl Endpoint {
    /// Resolve an endpoint from a base URL such as `https://api.stormondemand.com`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL cannot be parsed, uses a
    /// scheme other than `http`/`https`, or has no host.
    pub fn parse(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Error::InvalidEndpoint(format!(
                "unsupported scheme `{scheme}` in {base_url}"
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidEndpoint(format!("missing host in {base_url}")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::InvalidEndpoint(format!("missing port in {base_url}")))?;

        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
            path: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// URL scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port, defaulted from the scheme when the URL omits it.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Path prefix without a trailing slash (empty for a bare origin).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `scheme://host:port`
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Full URL for an operation path: `<origin><prefix>/v1<path>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the joined URL is not valid.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let full = format!(
            "{}{}/{API_VERSION}{separator}{path}",
            self.origin(),
            self.path
        );
        Url::parse(&full).map_err(|err| Error::InvalidEndpoint(format!("{full}: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_api_url() {
        let endpoint = Endpoint::parse(API_URL).unwrap();
        assert_eq!(endpoint.scheme(), "https");
        assert_eq!(endpoint.host(), "api.stormondemand.com");
        assert_eq!(endpoint.port(), 443);
        assert_eq!(endpoint.path(), "");
        assert_eq!(endpoint.origin(), "https://api.stormondemand.com:443");
    }

    #[test]
    fn url_for_inserts_version() {
        let endpoint = Endpoint::parse(API_URL).unwrap();
        let url = endpoint.url_for("/Server/list_servers").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.stormondemand.com/v1/Server/list_servers"
        );
    }

    #[test]
    fn url_for_keeps_path_prefix() {
        let endpoint = Endpoint::parse("http://proxy.internal:8080/storm/").unwrap();
        assert_eq!(endpoint.path(), "/storm");
        let url = endpoint.url_for("Storm/Image/list").unwrap();
        assert_eq!(
            url.as_str(),
            "http://proxy.internal:8080/storm/v1/Storm/Image/list"
        );
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = Endpoint::parse("ftp://api.stormondemand.com").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Endpoint::parse("not a url"),
            Err(Error::InvalidEndpoint(_))
        ));
    }
}
