//! One-shot local HTTP server for capturing the authorization redirect.

mod config;
mod http;
mod server;
mod target;

pub use config::CallbackServerConfig;
pub use server::CallbackServer;
