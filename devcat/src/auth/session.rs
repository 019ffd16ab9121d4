//! JWT session token creation and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    auth::password::credential_digest, config::Config, db::models::clients::ClientDBResponse, errors::Error, types::ClientId,
};

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: ClientId,      // Subject (client ID)
    pub email: String,      // Login identifier
    pub roles: Vec<String>, // Effective roles at login time
    pub cred: String,       // Digest of the password hash; a password change ends the session
    pub exp: i64,           // Expiration time
    pub iat: i64,           // Issued at
}

impl SessionClaims {
    pub fn new(client: &ClientDBResponse, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.security.jwt_expiry;

        Self {
            sub: client.id,
            email: client.email.clone(),
            roles: client.effective_roles().into_iter().collect(),
            cred: credential_digest(&client.password_hash),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

fn secret_key(config: &Config) -> Result<&str, Error> {
    config.secret_key.as_deref().ok_or_else(|| Error::Internal {
        operation: "JWT sessions: secret_key is required".to_string(),
    })
}

/// Create a signed session token for a client
pub fn create_session_token(client: &ClientDBResponse, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(client, config);
    let key = EncodingKey::from_secret(secret_key(config)?.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify a session token's signature and expiry and return its claims
pub fn verify_session_token(token: &str, config: &Config) -> Result<SessionClaims, Error> {
    use jsonwebtoken::errors::ErrorKind;

    let key = DecodingKey::from_secret(secret_key(config)?.as_bytes());
    let token_data = decode::<SessionClaims>(token, &key, &Validation::default()).map_err(|e| match e.kind() {
        // Anything wrong with the token itself is the caller's problem (401)
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::InvalidAlgorithm => Error::Unauthenticated {
            message: Some("Invalid or expired token".to_string()),
        },

        // Key and signing failures are ours (500)
        _ => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::clients::ClientStatus;

    fn create_test_config() -> Config {
        Config {
            secret_key: Some("test-secret-key-for-jwt".to_string()),
            ..Default::default()
        }
    }

    fn create_test_client() -> ClientDBResponse {
        ClientDBResponse {
            id: 7,
            email: "demo@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=64,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            name: "Demo Client".to_string(),
            roles: vec!["ROLE_CLIENT".to_string()],
            status: ClientStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_and_verify_session_token() {
        let config = create_test_config();
        let client = create_test_client();

        let token = create_session_token(&client, &config).unwrap();
        let claims = verify_session_token(&token, &config).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "demo@example.com");
        assert_eq!(claims.roles, vec!["ROLE_CLIENT".to_string(), "ROLE_USER".to_string()]);
        assert_eq!(claims.cred, credential_digest(&client.password_hash));
        assert!(!token.contains("argon2"));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let mut config = create_test_config();
        let token = create_session_token(&create_test_client(), &config).unwrap();

        config.secret_key = Some("different-secret".to_string());
        let result = verify_session_token(&token, &config);
        assert!(matches!(result.unwrap_err(), Error::Unauthenticated { .. }));
    }

    #[test]
    fn test_verify_expired_token() {
        let config = create_test_config();
        let now = Utc::now();
        let claims = SessionClaims {
            exp: (now - chrono::Duration::seconds(3600)).timestamp(),
            ..SessionClaims::new(&create_test_client(), &config)
        };
        let key = EncodingKey::from_secret(b"test-secret-key-for-jwt");
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let result = verify_session_token(&token, &config);
        assert!(matches!(result.unwrap_err(), Error::Unauthenticated { .. }));
    }

    #[test]
    fn test_verify_malformed_token() {
        let config = create_test_config();

        for token in ["not.a.token", "invalid", "", "too.many.parts.in.this.token", "e30.e30.sig"] {
            let result = verify_session_token(token, &config);
            assert!(
                matches!(result, Err(Error::Unauthenticated { .. })),
                "Expected Unauthenticated error for token: {token}"
            );
        }
    }
}
