use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{AuthError, AuthState, AuthorizationRequest, AuthorizationResponse, TokenResponse};
#[cfg(feature = "local-server")]
use crate::{CallbackServer, CallbackServerConfig};

pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct DriveAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub timeout: Duration,
    #[cfg(feature = "local-server")]
    pub callback: Option<CallbackServerConfig>,
}

impl DriveAuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            timeout: DEFAULT_TIMEOUT,
            #[cfg(feature = "local-server")]
            callback: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(feature = "local-server")]
    pub fn with_callback_config(mut self, callback: CallbackServerConfig) -> Self {
        self.redirect_uri = callback.redirect_uri();
        self.callback = Some(callback);
        self
    }
}

// The client secret stays out of Debug output and logs.
impl fmt::Debug for DriveAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("DriveAuthConfig");
        s.field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("timeout", &self.timeout);
        #[cfg(feature = "local-server")]
        s.field("callback", &self.callback);
        s.finish()
    }
}

#[derive(Debug, Clone)]
pub struct DriveAuthClient {
    config: DriveAuthConfig,
    http: Client,
    token_endpoint: String,
}

impl DriveAuthClient {
    pub fn new(config: DriveAuthConfig) -> Result<Self, AuthError> {
        validate(&config)?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http,
            token_endpoint: TOKEN_ENDPOINT.to_string(),
        })
    }

    pub fn with_http_client(config: DriveAuthConfig, http: Client) -> Result<Self, AuthError> {
        validate(&config)?;
        Ok(Self {
            config,
            http,
            token_endpoint: TOKEN_ENDPOINT.to_string(),
        })
    }

    pub fn config(&self) -> &DriveAuthConfig {
        &self.config
    }

    #[cfg(test)]
    fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    /// Builds the consent URL for the fixed Drive scope with a freshly
    /// generated `state`. No network I/O happens here.
    pub fn authorization_url(&self) -> Result<AuthorizationRequest, AuthError> {
        let state = AuthState::generate()?;

        let mut url = Url::parse(AUTHORIZE_ENDPOINT)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("response_type", "code");
            pairs.append_pair("client_id", &self.config.client_id);
            pairs.append_pair("redirect_uri", &self.config.redirect_uri);
            pairs.append_pair("scope", DRIVE_SCOPE);
            pairs.append_pair("state", state.as_str());
        }

        Ok(AuthorizationRequest {
            authorization_url: url.to_string(),
            state: state.into_string(),
            scope: DRIVE_SCOPE.to_string(),
        })
    }

    /// Exchanges the redirect response for a token.
    ///
    /// `authorization_response` is the full redirect URL the browser was sent
    /// to after consent; `state` is the value returned alongside the
    /// authorization URL and must be non-empty. The embedded state must match
    /// `state` or the exchange fails before any network call.
    pub async fn fetch_token(
        &self,
        authorization_response: &str,
        state: &str,
    ) -> Result<TokenResponse, AuthError> {
        // An empty expected state would let a state-less redirect through.
        if state.is_empty() {
            return Err(AuthError::Configuration(
                "state must not be empty".to_string(),
            ));
        }

        let response = AuthorizationResponse::from_url(authorization_response)?;
        if response.state.as_deref() != Some(state) {
            return Err(AuthError::StateMismatch {
                expected: state.to_string(),
                received: response.state.unwrap_or_default(),
            });
        }

        self.exchange_code(&response.code).await
    }

    /// Runs the whole flow against a local callback server bound to the
    /// redirect URI: build the consent URL, hand it to `on_authorize` (which
    /// typically opens a browser), wait for the redirect, exchange the code.
    #[cfg(feature = "local-server")]
    pub async fn run_local_flow<F>(&self, on_authorize: F) -> Result<TokenResponse, AuthError>
    where
        F: FnOnce(&AuthorizationRequest) -> Result<(), AuthError>,
    {
        let auth = self.authorization_url()?;
        let server = match &self.config.callback {
            Some(config) => CallbackServer::from_config(config.clone()),
            None => CallbackServer::new(self.config.redirect_uri.clone())?,
        };
        let listener = server.bind()?;

        let handle = tokio::spawn(async move { server.wait_for_redirect(listener).await });

        if let Err(err) = on_authorize(&auth) {
            handle.abort();
            return Err(err);
        }

        let redirect_url = handle.await.map_err(|err| AuthError::Internal {
            message: err.to_string(),
        })??;

        self.fetch_token(&redirect_url, &auth.state).await
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError> {
        let payload: HashMap<&str, &str> = HashMap::from([
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ]);

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| AuthError::MalformedTokenResponse {
            message: err.to_string(),
            body,
        })
    }
}

fn validate(config: &DriveAuthConfig) -> Result<(), AuthError> {
    for (name, value) in [
        ("client_id", &config.client_id),
        ("client_secret", &config.client_secret),
        ("redirect_uri", &config.redirect_uri),
    ] {
        if value.trim().is_empty() {
            return Err(AuthError::Configuration(format!(
                "{name} must not be empty"
            )));
        }
    }

    Url::parse(&config.redirect_uri).map_err(|err| {
        AuthError::Configuration(format!("redirect_uri is not a valid url: {err}"))
    })?;

    Ok(())
}
