use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("os rng error: {message}")]
    OsRng { message: String },

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("token request timed out")]
    Timeout,

    #[error("token endpoint returned status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("malformed token response: {message}")]
    MalformedTokenResponse { message: String, body: String },

    #[error("missing authorization code in redirect url")]
    MissingAuthorizationCode,

    #[error("authorization denied: {error}")]
    AuthorizationDenied {
        error: String,
        description: Option<String>,
    },

    #[error("state mismatch (expected={expected}, received={received})")]
    StateMismatch { expected: String, received: String },

    #[cfg(feature = "local-server")]
    #[error("callback server timed out after {timeout:?}")]
    CallbackTimeout { timeout: std::time::Duration },

    #[cfg(feature = "local-server")]
    #[error("{message}")]
    Internal { message: String },
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else {
            AuthError::Network(err)
        }
    }
}
