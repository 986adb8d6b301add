//! HS256 JWT session validator.
//!
//! Tokens are minted by the platform's login service with a shared secret.
//! The `sub` claim carries the numeric learner id.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, LearnerId};
use crate::ports::SessionValidator;

/// Claims read from learner tokens.
#[derive(Debug, Serialize, Deserialize)]
struct LearnerClaims {
    /// Subject - the learner id
    sub: String,
    exp: i64,
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Configuration for the JWT validator.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    secret: SecretString,
    pub issuer: Option<String>,
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            issuer: None,
            leeway_secs: 30,
        }
    }

    /// Require tokens to carry this issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

/// Validates HS256 bearer tokens.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        validation.validate_aud = false;
        match &config.issuer {
            Some(issuer) => {
                validation.set_issuer(&[issuer]);
                validation.set_required_spec_claims(&["exp", "sub", "iss"]);
            }
            None => validation.set_required_spec_claims(&["exp", "sub"]),
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<LearnerClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer => {
                        tracing::warn!("Invalid issuer in token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::warn!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            },
        )?;

        let learner_id: LearnerId = data.claims.sub.parse().map_err(|_| {
            tracing::warn!("Invalid learner id in token: {}", data.claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(learner_id, data.claims.name))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-long-enough";

    fn token(sub: &str, exp_offset: i64, iss: Option<&str>) -> String {
        let claims = LearnerClaims {
            sub: sub.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iss: iss.map(str::to_string),
            name: Some("Ada".to_string()),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(JwtConfig::new(SecretString::new(SECRET.to_string())).with_leeway(0))
    }

    #[tokio::test]
    async fn valid_token_resolves_learner() {
        let user = validator().validate(&token("42", 600, None)).await.unwrap();
        assert_eq!(user.learner_id.value(), 42);
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let result = validator().validate(&token("42", -600, None)).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn non_numeric_subject_is_rejected() {
        let result = validator().validate(&token("ada", 600, None)).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let other = JwtSessionValidator::new(JwtConfig::new(SecretString::new("other".to_string())));
        let result = other.validate(&token("42", 600, None)).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn issuer_is_enforced_when_configured() {
        let strict = JwtSessionValidator::new(
            JwtConfig::new(SecretString::new(SECRET.to_string())).with_issuer("https://login.example"),
        );
        assert!(strict
            .validate(&token("42", 600, Some("https://login.example")))
            .await
            .is_ok());
        assert!(matches!(
            strict.validate(&token("42", 600, Some("https://evil.example"))).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
