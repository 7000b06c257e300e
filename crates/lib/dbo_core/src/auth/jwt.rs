//! JWT token generation and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::warn;

use super::AuthError;
use crate::models::Credential;
use crate::models::auth::TokenClaims;

/// Access token lifetime: 24 hours.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// Generate a signed JWT access token (HS256, 24 h expiry) for an
/// already-authenticated credential.
pub fn issue_token(credential: &Credential, secret: &[u8]) -> Result<String, AuthError> {
    issue_token_at(credential, secret, Utc::now())
}

/// Same as [`issue_token`] with an explicit issue time.
pub fn issue_token_at(
    credential: &Credential,
    secret: &[u8],
    issued_at: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = TokenClaims {
        username: credential.username.clone(),
        role: credential.role.clone(),
        customer_id: credential.customer_id.clone(),
        sub: credential.username.clone(),
        iat: issued_at.timestamp(),
        exp: (issued_at + Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify signature and expiry of an access token, returning its claims.
///
/// Expiry is checked without leeway.
pub fn validate_token(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub"]);
    decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Resolve the JWT secret: env var `JWT_SECRET_KEY` → `JWT_SECRET` → a
/// random per-process secret.
///
/// A random secret invalidates every token when the process restarts.
pub fn resolve_jwt_secret() -> String {
    for var in ["JWT_SECRET_KEY", "JWT_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    warn!("JWT_SECRET_KEY not set, generating an ephemeral signing secret");
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::models::Role;

    const SECRET: &[u8] = b"test-secret";

    fn credential(username: &str, role: Role, customer_id: Option<&str>) -> Credential {
        let now = Utc::now();
        Credential {
            username: username.into(),
            password_hash: "$2b$10$unused".into(),
            role,
            customer_id: customer_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn validate_recovers_issued_claims() {
        let cred = credential("alice", Role::Customer, Some("acc-1"));
        let token = issue_token(&cred, SECRET).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.customer_id.as_deref(), Some("acc-1"));
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_EXPIRY_SECS);
    }

    #[test]
    fn admin_without_account_link_round_trips() {
        let cred = credential("root", Role::Admin, None);
        let token = issue_token(&cred, SECRET).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.customer_id, None);
    }

    #[test]
    fn token_minted_within_the_last_day_is_valid() {
        let cred = credential("alice", Role::Customer, Some("acc-1"));
        let issued = Utc::now() - Duration::hours(23);
        let token = issue_token_at(&cred, SECRET, issued).unwrap();
        assert!(validate_token(&token, SECRET).is_ok());
    }

    #[test]
    fn token_older_than_a_day_is_rejected() {
        let cred = credential("alice", Role::Customer, Some("acc-1"));
        let issued = Utc::now() - Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS + 1);
        let token = issue_token_at(&cred, SECRET, issued).unwrap();
        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let cred = credential("alice", Role::Customer, Some("acc-1"));
        let token = issue_token(&cred, SECRET).unwrap();
        let err = validate_token(&token, b"other-secret").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let cred = credential("alice", Role::Customer, Some("acc-1"));
        let token = issue_token(&cred, SECRET).unwrap();
        let admin = issue_token(&credential("mallory", Role::Admin, None), b"x").unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = admin.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let forged = parts.join(".");

        assert!(validate_token(&forged, SECRET).is_err());
    }

    #[test]
    fn missing_required_claims_are_rejected() {
        #[derive(Serialize)]
        struct Partial {
            sub: String,
            iat: i64,
            exp: i64,
        }
        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "alice".into(),
                iat: now,
                exp: now + 60,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_token("a.b.c", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
