use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};

use crate::AuthError;

const STATE_BYTES: usize = 32;

/// Anti-forgery token binding an authorization request to its callback.
///
/// Single use: generate one per authorization round-trip and hand the same
/// value to [`DriveAuthClient::fetch_token`](crate::DriveAuthClient::fetch_token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState(String);

impl AuthState {
    pub fn generate() -> Result<Self, AuthError> {
        let mut bytes = [0u8; STATE_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|err| AuthError::OsRng {
                message: err.to_string(),
            })?;
        Ok(Self(URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::AuthState;

    #[test]
    fn generates_url_safe_state() {
        let state = AuthState::generate().unwrap();
        assert!(!state.as_str().contains('='), "state should be unpadded");
        assert!(!state.as_str().contains('+'), "state should be url safe");
        assert!(!state.as_str().contains('/'), "state should be url safe");
    }

    #[test]
    fn state_carries_enough_entropy() {
        // 32 random bytes encode to 43 base64 characters.
        let state = AuthState::generate().unwrap();
        assert_eq!(state.as_str().len(), 43);
    }

    #[test]
    fn consecutive_states_differ() {
        let first = AuthState::generate().unwrap();
        let second = AuthState::generate().unwrap();
        assert_ne!(first, second);
    }
}
