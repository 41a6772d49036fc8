use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Single fixed credential pair. Not a security boundary.
#[derive(Debug, Clone)]
pub struct CredentialCheck {
    expected: AuthConfig,
}

impl CredentialCheck {
    pub fn new(expected: AuthConfig) -> Self {
        Self { expected }
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == self.expected.username && password == self.expected.password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
