//! Compute client.
//!
//! [`ComputeClient`] is a thin layer over a [`Dispatcher`]: it validates the
//! parameters of an [`Operation`], wraps them in the request envelope and
//! decodes the result. The per-resource methods live in sibling modules.

use crate::memory::{MemoryDispatcher, MemoryStore};
use crate::operations::Operation;
use crate::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use storm_core::client::ConnectionOptions;
use storm_core::{ApiRequest, Dispatcher, Error, HttpDispatcher, Params, StormConfig};
use tracing::debug;

/// Builder for [`ComputeClient`].
#[derive(Debug, Clone)]
pub struct ComputeClientBuilder {
    config: StormConfig,
}

impl ComputeClientBuilder {
    /// Create a builder for the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Ok(Self {
            config: StormConfig::new(username, password)?,
        })
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn from_config(config: StormConfig) -> Self {
        Self { config }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.config = self.config.with_auth_url(auth_url);
        self
    }

    /// Keep the connection open between requests.
    #[must_use]
    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.config = self.config.with_persistent(persistent);
        self
    }

    /// Override the transport options.
    #[must_use]
    pub fn with_connection_options(mut self, options: ConnectionOptions) -> Self {
        self.config = self.config.with_connection_options(options);
        self
    }

    /// Build a client talking to the live API.
    pub fn build(self) -> Result<ComputeClient> {
        ComputeClient::new(&self.config)
    }
}

/// Asynchronous Storm compute client.
#[derive(Clone)]
pub struct ComputeClient {
    dispatcher: Arc<dyn Dispatcher>,
}

impl ComputeClient {
    /// Construct a client for the live API.
    pub fn new(config: &StormConfig) -> Result<Self> {
        let dispatcher = HttpDispatcher::from_config(config)?;
        Ok(Self::with_dispatcher(Arc::new(dispatcher)))
    }

    /// Start a builder for the given credentials.
    pub fn builder(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<ComputeClientBuilder> {
        ComputeClientBuilder::new(username, password)
    }

    /// Construct a client over any dispatcher.
    #[must_use]
    pub fn with_dispatcher(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Construct a client backed by the in-memory store for `account`,
    /// registering the account if needed.
    pub fn in_memory(store: &MemoryStore, account: impl Into<String>) -> Result<Self> {
        let dispatcher = MemoryDispatcher::new(store, account)?;
        Ok(Self::with_dispatcher(Arc::new(dispatcher)))
    }

    /// Drop and re-establish the underlying connection.
    pub fn reload(&self) -> Result<()> {
        self.dispatcher.reload()
    }

    /// Run `operation` with `params` and return the decoded body (`null` when empty).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] without contacting the API if a
    /// required parameter is missing, otherwise whatever the dispatcher reports.
    pub async fn call(&self, operation: Operation, params: Params) -> Result<Value> {
        let missing = params.missing(operation.required_params());
        if !missing.is_empty() {
            return Err(Error::ValidationError(format!(
                "{operation} requires {}",
                missing.join(", ")
            )));
        }

        debug!(operation = operation.name(), "Calling Storm operation");
        let request = ApiRequest::post(operation.path()).with_body(params.into_body());
        let response = self.dispatcher.issue(request).await?;
        Ok(response.into_body())
    }

    /// Run `operation` and decode the body into `T`.
    pub(crate) async fn call_as<T>(&self, operation: Operation, params: Params) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.call(operation, params).await?;
        serde_json::from_value(body).map_err(|err| {
            Error::ParseError(format!("unexpected {operation} response: {err}"))
        })
    }
}

impl std::fmt::Debug for ComputeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeClient").finish_non_exhaustive()
    }
}
