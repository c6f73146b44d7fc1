use std::time::Duration;

use crate::AuthError;

use super::target::RedirectTarget;

pub(crate) const DEFAULT_SUCCESS_HTML: &str = include_str!("html/success.html");
pub(crate) const DEFAULT_ERROR_HTML: &str = include_str!("html/error.html");

/// Where the one-shot server listens and what it serves. The listen address
/// is kept as a parsed target so it can never disagree with the redirect URI
/// handed to Google.
#[derive(Debug, Clone)]
pub struct CallbackServerConfig {
    pub(super) target: RedirectTarget,
    pub(super) timeout: Option<Duration>,
    pub(super) success_html: String,
    pub(super) error_html: String,
}

impl CallbackServerConfig {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self::from_target(RedirectTarget {
            host: host.into(),
            port,
            path: normalize_path(path.into()),
        })
    }

    pub fn from_redirect_uri(redirect_uri: &str) -> Result<Self, AuthError> {
        RedirectTarget::parse(redirect_uri).map(Self::from_target)
    }

    fn from_target(target: RedirectTarget) -> Self {
        Self {
            target,
            timeout: None,
            success_html: DEFAULT_SUCCESS_HTML.to_string(),
            error_html: DEFAULT_ERROR_HTML.to_string(),
        }
    }

    pub fn redirect_uri(&self) -> String {
        self.target.base_url()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_success_html(mut self, html: impl Into<String>) -> Self {
        self.success_html = html.into();
        self
    }

    pub fn with_error_html(mut self, html: impl Into<String>) -> Self {
        self.error_html = html.into();
        self
    }
}

fn normalize_path(path: String) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::CallbackServerConfig;

    #[test]
    fn config_normalizes_path() {
        let config = CallbackServerConfig::new("localhost", 8085, "callback");
        assert_eq!(config.target.path, "/callback");
        assert_eq!(config.redirect_uri(), "http://localhost:8085/callback");
    }

    #[test]
    fn config_round_trips_through_redirect_uri() {
        let config =
            CallbackServerConfig::from_redirect_uri("http://127.0.0.1:9000/oauth/done").unwrap();
        assert_eq!(config.target.host, "127.0.0.1");
        assert_eq!(config.target.port, 9000);
        assert_eq!(config.redirect_uri(), "http://127.0.0.1:9000/oauth/done");
    }
}
