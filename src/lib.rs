//! Taskbridge: validates tool-style function calls and forwards them to an
//! upstream project-management REST API.
//!
//! The same [`dispatch::Dispatcher`] backs both shells: the HTTP API in
//! [`api`] and the stdio MCP server in [`mcp`].

pub mod api;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod dispatch;
pub mod mcp;
pub mod schema;
pub mod upstream;
