use url::Url;

use crate::AuthError;

/// Host, port, and path the callback server binds, parsed from the redirect
/// URI. Only plain http makes sense for a loopback listener.
#[derive(Debug, Clone)]
pub(super) struct RedirectTarget {
    pub(super) host: String,
    pub(super) port: u16,
    pub(super) path: String,
}

impl RedirectTarget {
    pub(super) fn parse(redirect_uri: &str) -> Result<Self, AuthError> {
        let url = Url::parse(redirect_uri)?;
        if url.scheme() != "http" {
            return Err(AuthError::Configuration(
                "redirect uri must use http scheme for the local callback server".to_string(),
            ));
        }

        let host = url
            .host_str()
            .ok_or_else(|| AuthError::Configuration("redirect uri is missing host".to_string()))?;

        let port = url
            .port_or_known_default()
            .ok_or_else(|| AuthError::Configuration("redirect uri is missing port".to_string()))?;

        Ok(Self {
            host: host.to_string(),
            port,
            path: url.path().to_string(),
        })
    }

    pub(super) fn base_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }

    /// Rebuilds the full redirect URL the browser hit, query string included,
    /// so the flow can hand it to the token exchange unchanged.
    pub(super) fn redirect_url(&self, query: &str) -> Result<String, AuthError> {
        let base = self.base_url();

        if query.is_empty() {
            return Ok(base);
        }

        let url = Url::parse(&format!("{base}?{query}"))?;
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::RedirectTarget;
    use crate::AuthError;

    #[test]
    fn parses_redirect_target() {
        let target = RedirectTarget::parse("http://localhost:8085/callback").unwrap();
        assert_eq!(target.host, "localhost");
        assert_eq!(target.port, 8085);
        assert_eq!(target.path, "/callback");
    }

    #[test]
    fn rejects_https_redirect_uri() {
        let result = RedirectTarget::parse("https://localhost:8085/callback");
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn rebuilds_redirect_url_with_query() {
        let target = RedirectTarget::parse("http://localhost:8085/callback").unwrap();
        let url = target.redirect_url("code=abc&state=s1").unwrap();
        assert_eq!(url, "http://localhost:8085/callback?code=abc&state=s1");
    }
}
