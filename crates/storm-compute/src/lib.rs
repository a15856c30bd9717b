//! Storm on Demand compute API client.
//!
//! [`ComputeClient`] exposes one asynchronous method per named compute
//! operation (servers, load balancers, configs, templates, images, IPs,
//! firewalls, monitoring) on top of the `storm-core` request pipeline.
//! [`MemoryStore`] and [`MemoryDispatcher`] simulate an account's servers
//! and images in memory for tests.

#![deny(missing_docs)]

pub mod client;
pub mod memory;
pub mod models;
pub mod operations;

mod balancers;
mod configs;
mod firewall;
mod images;
mod network;
mod servers;
mod stats;

pub use client::{ComputeClient, ComputeClientBuilder};
pub use memory::{AccountData, MemoryDispatcher, MemoryStore};
pub use models::{Balancer, Config, Image, ListParams, Page, Server, ServerStatus, Template};
pub use operations::Operation;

/// Convenient result alias that reuses the shared Storm error type.
pub type Result<T> = storm_core::Result<T>;
