//! # storm-core
//!
//! Core request pipeline for the Storm on Demand API.
//!
//! This crate owns everything below the named operations: configuration,
//! credentials, the HTTP connection, request dispatch and the interpretation
//! of responses into typed errors.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy (transport, status, not found, application)
//! - [`config`] - Client configuration and validation
//! - [`client`] - Transport tuning options
//! - [`auth`] - Credentials and the Basic authorization header
//! - [`endpoint`] - Endpoint resolution and URL building
//! - [`connection`] - Persistent or per-request HTTP connection
//! - [`http`] - Request and response values
//! - [`dispatch`] - The `Dispatcher` trait and its HTTP implementation
//! - [`response`] - Response interpretation
//! - [`params`] - Operation parameter builder
//! - [`ids`] - Server identifiers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod ids;
pub mod params;
pub mod response;

// Re-export commonly used types
pub use auth::Credentials;
pub use config::StormConfig;
pub use dispatch::{Dispatcher, HttpDispatcher};
pub use error::{Error, Result};
pub use http::{ApiRequest, ApiResponse};
pub use ids::UniqId;
pub use params::Params;
