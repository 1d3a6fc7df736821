//! Screenplay Server
//!
//! Wraps the domain in a JSON-over-HTTP API and serves a small browser UI
//! that talks to the same API.

pub mod config;
pub mod server;
pub mod static_files;

pub use config::ServerConfig;
pub use server::{serve, AppServer};
