//! Configuration for Storm on Demand clients.
//!
//! [`StormConfig`] is the single structure a client is built from. It can be
//! constructed in code or deserialized from any serde format; loading it from
//! files or the environment is left to the caller.

use crate::auth::Credentials;
use crate::client::ConnectionOptions;
use crate::endpoint::{Endpoint, API_URL};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Configuration for a Storm on Demand client instance.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct StormConfig {
    /// API username
    #[validate(length(min = 1))]
    pub username: String,

    /// API password
    #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
    pub password: SecretString,

    /// Base URL of the API
    #[validate(url)]
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Transport tuning passed through to the connection
    #[validate(nested)]
    #[serde(default)]
    pub connection_options: ConnectionOptions,

    /// Keep the connection open between requests
    #[serde(default)]
    pub persistent: bool,
}

fn default_auth_url() -> String {
    API_URL.to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl StormConfig {
    /// Create a configuration with the required credentials and defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if validation fails (e.g. empty username).
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let config = Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            auth_url: default_auth_url(),
            connection_options: ConnectionOptions::default(),
            persistent: false,
        };

        config.check()?;
        Ok(config)
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Override the transport options.
    #[must_use]
    pub fn with_connection_options(mut self, options: ConnectionOptions) -> Self {
        self.connection_options = options;
        self
    }

    /// Keep the connection open between requests.
    #[must_use]
    pub const fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the invalid fields.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Credentials derived from the configured username and password.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.expose_secret().to_owned())
    }

    /// Parse the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL cannot be resolved.
    pub fn endpoint(&self) -> Result<Endpoint> {
        Endpoint::parse(&self.auth_url)
    }
}

impl Clone for StormConfig {
    fn clone(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: SecretString::from(self.password.expose_secret().to_owned()),
            auth_url: self.auth_url.clone(),
            connection_options: self.connection_options.clone(),
            persistent: self.persistent,
        }
    }
}
