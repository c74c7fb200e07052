//! API application
//!
//! Configuration and router assembly shared by the `api` server and the
//! `manage` command line tool.

pub mod app;
pub mod config;

pub use app::{build_router, with_http_layers};
pub use config::{AppConfig, Storage};
