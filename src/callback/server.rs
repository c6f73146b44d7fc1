use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{Router, routing::get};
use tokio::net::TcpListener as TokioTcpListener;
use tokio::sync::oneshot;

use crate::AuthError;

use super::config::{CallbackServerConfig, DEFAULT_ERROR_HTML, DEFAULT_SUCCESS_HTML};
use super::http::{
    CallbackState, RedirectResult, callback_handler, fallback_handler, send_redirect,
    wait_for_redirect,
};
use super::target::RedirectTarget;

/// Binds the redirect URI's host and port, serves the callback path until one
/// authorization redirect arrives, and resolves to that redirect's full URL.
#[derive(Debug, Clone)]
pub struct CallbackServer {
    target: RedirectTarget,
    success_html: String,
    error_html: String,
    timeout: Option<Duration>,
}

impl CallbackServer {
    pub fn new(redirect_uri: impl Into<String>) -> Result<Self, AuthError> {
        let redirect_uri = redirect_uri.into();
        Ok(Self {
            target: RedirectTarget::parse(&redirect_uri)?,
            success_html: DEFAULT_SUCCESS_HTML.to_string(),
            error_html: DEFAULT_ERROR_HTML.to_string(),
            timeout: None,
        })
    }

    pub fn from_config(config: CallbackServerConfig) -> Self {
        Self {
            target: config.target,
            success_html: config.success_html,
            error_html: config.error_html,
            timeout: config.timeout,
        }
    }

    pub fn with_success_html(mut self, html: impl Into<String>) -> Self {
        self.success_html = html.into();
        self
    }

    pub fn with_error_html(mut self, html: impl Into<String>) -> Self {
        self.error_html = html.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn bind(&self) -> Result<TcpListener, AuthError> {
        TcpListener::bind((self.target.host.as_str(), self.target.port)).map_err(AuthError::from)
    }

    /// Serves until one redirect carrying a code (or a provider error)
    /// arrives, then shuts down and returns the redirect URL.
    pub async fn wait_for_redirect(&self, listener: TcpListener) -> Result<String, AuthError> {
        let (redirect_tx, redirect_rx) = oneshot::channel::<RedirectResult>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let redirect_tx = Arc::new(Mutex::new(Some(redirect_tx)));

        let state = CallbackState {
            target: self.target.clone(),
            success_html: self.success_html.clone(),
            error_html: self.error_html.clone(),
            redirect_tx: redirect_tx.clone(),
        };

        let app = Router::new()
            .route(&state.target.path, get(callback_handler))
            .fallback(fallback_handler)
            .with_state(state);

        listener.set_nonblocking(true)?;
        let listener = TokioTcpListener::from_std(listener)?;

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });

        let redirect_tx_for_server = redirect_tx.clone();
        let server_handle = tokio::spawn(async move {
            if let Err(err) = server.await {
                let error = AuthError::Internal {
                    message: err.to_string(),
                };
                send_redirect(&redirect_tx_for_server, Err(error));
            }
        });

        let result = wait_for_redirect(redirect_rx, self.timeout).await;

        let _ = shutdown_tx.send(());
        let _ = server_handle.await;

        result
    }

    /// Convenience wrapper: bind and wait in one call.
    pub async fn capture_once(&self) -> Result<String, AuthError> {
        let listener = self.bind()?;
        self.wait_for_redirect(listener).await
    }
}
