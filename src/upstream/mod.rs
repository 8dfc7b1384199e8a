//! Typed client for the upstream project-management REST API.

mod client;
mod error;
pub mod requests;

#[cfg(test)]
pub(crate) mod mock;


pub use client::{API_KEY_HEADER, UpstreamClient, UpstreamConfig};
pub use error::{GatewayError, GatewayResult};
