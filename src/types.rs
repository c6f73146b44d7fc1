use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::AuthError;

/// Output of [`DriveAuthClient::authorization_url`](crate::DriveAuthClient::authorization_url):
/// the consent URL to send the user to, plus the `state` to keep for the
/// eventual token exchange.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub authorization_url: String,
    pub state: String,
    pub scope: String,
}

/// Code and state extracted from the redirect response URL.
#[derive(Debug, Clone)]
pub struct AuthorizationResponse {
    pub code: String,
    pub state: Option<String>,
}

impl AuthorizationResponse {
    pub fn from_url(redirect_url: &str) -> Result<Self, AuthError> {
        let url = Url::parse(redirect_url)?;
        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut description = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => description = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(AuthError::AuthorizationDenied { error, description });
        }

        let code = code.ok_or(AuthError::MissingAuthorizationCode)?;
        Ok(Self { code, state })
    }
}

/// Token document returned by the token endpoint. Persistence is up to the
/// caller; unknown provider fields are preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::{AuthorizationResponse, TokenResponse};
    use crate::AuthError;

    #[test]
    fn from_url_parses_code_and_state() {
        let response =
            AuthorizationResponse::from_url("http://localhost/callback?code=abc123&state=state456")
                .unwrap();
        assert_eq!(response.code, "abc123");
        assert_eq!(response.state.as_deref(), Some("state456"));
    }

    #[test]
    fn from_url_requires_code() {
        let result = AuthorizationResponse::from_url("http://localhost/callback?state=state456");
        assert!(matches!(result, Err(AuthError::MissingAuthorizationCode)));
    }

    #[test]
    fn from_url_surfaces_provider_error() {
        let result = AuthorizationResponse::from_url(
            "http://localhost/callback?error=access_denied&error_description=user%20declined",
        );
        match result {
            Err(AuthError::AuthorizationDenied { error, description }) => {
                assert_eq!(error, "access_denied");
                assert_eq!(description.as_deref(), Some("user declined"));
            }
            other => panic!("expected AuthorizationDenied, got {other:?}"),
        }
    }

    #[test]
    fn token_response_keeps_unknown_fields() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"abc","token_type":"Bearer","expires_in":3599,"id_token":"xyz"}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.expires_in, Some(3599));
        assert_eq!(token.extra.get("id_token").unwrap(), "xyz");
    }
}
