//! HTTP API: composes the session auth gate and the people directory.

pub mod app;
pub mod context;
pub mod middleware;
