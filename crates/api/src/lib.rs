//! Bugboard API server library.
//!
//! Exposes config, state, error handling, routes and the WebSocket feeds so
//! integration tests and the binary entrypoint can both reach them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod ws;
