use crate::error::{AppError, INVALID_TOKEN};
use crate::models::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Tokens are valid for 24 hours from issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Identifier of the user the token was issued to.
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiration, seconds since epoch.
    pub exp: i64,
}

/// Signs and verifies access tokens with a process-wide HMAC secret.
///
/// Built once from `Config::jwt_secret` and shared read-only through `web::Data`.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        // `exp` is a hard cutoff: no clock-skew allowance.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for the given identity, expiring in [`TOKEN_TTL_HOURS`].
    pub fn issue(&self, user_id: i64, username: &str, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry and returns the decoded claims.
    ///
    /// Every failure is reported as the same `Unauthorized` error; the cause is
    /// only logged.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token verification failed: {}", e);
                AppError::Unauthorized(INVALID_TOKEN.into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_for_tokens";

    fn sign_raw(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn assert_invalid(result: Result<Claims, AppError>) {
        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, INVALID_TOKEN),
            Ok(claims) => panic!("token should have been rejected, got {:?}", claims),
            Err(e) => panic!("unexpected error type: {:?}", e),
        }
    }

    #[test]
    fn test_token_round_trip_keeps_identity() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue(42, "alice", Role::Admin).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let two_hours_ago = (Utc::now() - Duration::hours(2)).timestamp();
        let claims = Claims {
            user_id: 2,
            username: "bob".into(),
            role: Role::User,
            iat: two_hours_ago - TOKEN_TTL_HOURS * 3600,
            exp: two_hours_ago,
        };
        let expired = sign_raw(&claims, SECRET);

        assert_invalid(TokenService::new(SECRET).verify(&expired));
    }

    #[test]
    fn test_token_is_rejected_right_after_expiry() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 2,
            username: "bob".into(),
            role: Role::User,
            iat: now - TOKEN_TTL_HOURS * 3600,
            exp: now - 5,
        };

        assert_invalid(TokenService::new(SECRET).verify(&sign_raw(&claims, SECRET)));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let issued = TokenService::new("some_other_secret")
            .issue(1, "carol", Role::User)
            .unwrap();

        assert_invalid(TokenService::new(SECRET).verify(&issued));
    }

    #[test]
    fn test_tampered_and_malformed_tokens_are_rejected() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue(1, "dave", Role::User).unwrap();

        // Swap the payload for one claiming admin, keep the original signature.
        let forged_claims = Claims {
            role: Role::Admin,
            ..tokens.verify(&token).unwrap()
        };
        let forged = sign_raw(&forged_claims, "attacker");
        let mut parts: Vec<&str> = forged.split('.').collect();
        let original_signature = token.rsplit('.').next().unwrap();
        parts[2] = original_signature;
        assert_invalid(tokens.verify(&parts.join(".")));

        assert_invalid(tokens.verify("not-a-token"));
        assert_invalid(tokens.verify(""));
    }
}
