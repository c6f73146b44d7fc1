//! Google Drive authorization via the OAuth 2.0 authorization code flow.
//!
//! This crate is deliberately single-purpose: it holds the three credentials
//! a Drive integration needs (client id, client secret, redirect uri), builds
//! the consent URL with a fresh anti-forgery `state`, and exchanges the
//! redirect response for a token. Endpoints and scope are fixed to Google
//! Drive; token storage and refresh are left to the caller.

#[cfg(feature = "local-server")]
mod callback;
mod client;
mod error;
mod state;
mod types;

#[cfg(feature = "local-server")]
pub use callback::{CallbackServer, CallbackServerConfig};
pub use client::{
    AUTHORIZE_ENDPOINT, DRIVE_SCOPE, DriveAuthClient, DriveAuthConfig, TOKEN_ENDPOINT,
};
pub use error::AuthError;
pub use state::AuthState;
pub use types::{AuthorizationRequest, AuthorizationResponse, TokenResponse};
