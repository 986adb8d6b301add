//! Authentication types for the domain layer.
//!
//! The core never authenticates anyone. An identity collaborator resolves a
//! trusted learner identifier once per request (via the `SessionValidator`
//! port) and every operation receives only that identifier.

use super::LearnerId;
use thiserror::Error;

/// Learner identity resolved from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The learner this request acts on behalf of.
    pub learner_id: LearnerId,

    /// Display name if the token carried one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(learner_id: LearnerId, display_name: Option<String>) -> Self {
        Self {
            learner_id,
            display_name,
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the caller should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_carries_learner_id() {
        let user = AuthenticatedUser::new(LearnerId::new(12).unwrap(), Some("Ana".to_string()));
        assert_eq!(user.learner_id.value(), 12);
        assert_eq!(user.display_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn reauthentication_required_for_token_errors_only() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }
}
