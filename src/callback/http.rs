use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tokio::sync::oneshot;

use crate::{AuthError, AuthorizationResponse};

use super::target::RedirectTarget;

/// The server resolves to the full redirect URL the browser hit; the flow
/// feeds that URL to the token exchange unchanged.
pub(super) type RedirectResult = Result<String, AuthError>;
type RedirectSender = oneshot::Sender<RedirectResult>;
pub(super) type RedirectReceiver = oneshot::Receiver<RedirectResult>;
pub(super) type SharedRedirectSender = Arc<Mutex<Option<RedirectSender>>>;

#[derive(Clone)]
pub(super) struct CallbackState {
    pub(super) target: RedirectTarget,
    pub(super) success_html: String,
    pub(super) error_html: String,
    pub(super) redirect_tx: SharedRedirectSender,
}

pub(super) fn send_redirect(redirect_tx: &SharedRedirectSender, result: RedirectResult) {
    if let Ok(mut guard) = redirect_tx.lock() {
        if let Some(sender) = guard.take() {
            let _ = sender.send(result);
        }
    }
}

pub(super) async fn callback_handler(
    State(state): State<CallbackState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let CallbackState {
        target,
        success_html,
        error_html,
        redirect_tx,
    } = state;

    let query = query.unwrap_or_default();
    let redirect_url = match target.redirect_url(&query) {
        Ok(url) => url,
        Err(error) => {
            send_redirect(&redirect_tx, Err(error));
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(error_html));
        }
    };

    // Classify the redirect up front so the page shown in the browser
    // reflects the outcome. Requests without a code or error (reloads,
    // probes) keep the server waiting.
    match AuthorizationResponse::from_url(&redirect_url) {
        Ok(_) => {
            send_redirect(&redirect_tx, Ok(redirect_url));
            (StatusCode::OK, Html(success_html))
        }
        Err(AuthError::MissingAuthorizationCode) => (StatusCode::BAD_REQUEST, Html(error_html)),
        Err(denied @ AuthError::AuthorizationDenied { .. }) => {
            send_redirect(&redirect_tx, Err(denied));
            (StatusCode::OK, Html(error_html))
        }
        Err(error) => {
            send_redirect(&redirect_tx, Err(error));
            (StatusCode::INTERNAL_SERVER_ERROR, Html(error_html))
        }
    }
}

pub(super) async fn fallback_handler(State(state): State<CallbackState>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(state.error_html))
}

pub(super) async fn wait_for_redirect(
    redirect_rx: RedirectReceiver,
    timeout: Option<Duration>,
) -> RedirectResult {
    if let Some(timeout) = timeout {
        let result = tokio::time::timeout(timeout, redirect_rx)
            .await
            .map_err(|_| AuthError::CallbackTimeout { timeout })?;
        result.map_err(|_| AuthError::Internal {
            message: "callback redirect channel closed".to_string(),
        })?
    } else {
        redirect_rx.await.map_err(|_| AuthError::Internal {
            message: "callback redirect channel closed".to_string(),
        })?
    }
}
