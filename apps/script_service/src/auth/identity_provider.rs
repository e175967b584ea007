use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 6;

/// A user account as known to the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    EmailExists,
    #[error("Identity service error: {0}")]
    Upstream(String),
    #[error("Failed to reach identity service: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Registration and sign-in are owned by an external identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
}

/// Cheap local checks run before any call to the identity service.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), IdentityError> {
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
        .unwrap_or(false);

    if !well_formed {
        return Err(IdentityError::Validation(
            "Please enter a valid email address.".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_credentials() {
        assert!(validate_credentials("writer@example.com", "secret1").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "writer", "@example.com", "writer@"] {
            assert!(
                matches!(
                    validate_credentials(email, "secret1"),
                    Err(IdentityError::Validation(_))
                ),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_short_password() {
        assert!(matches!(
            validate_credentials("writer@example.com", "12345"),
            Err(IdentityError::Validation(_))
        ));
    }
}
