use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_EMAIL_VERIFICATION: &str = "email_verification";
pub const TOKEN_TYPE_PASSWORD_RESET: &str = "password_reset";

const EMAIL_VERIFICATION_EXPIRE_HOURS: i64 = 24;
const PASSWORD_RESET_EXPIRE_HOURS: i64 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User email.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_expire_minutes: i64,
}

impl JwtService {
    pub fn new(secret: &str, algorithm: &str, access_token_expire_minutes: i64) -> AppResult<Self> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| AppError::ConfigError(format!("unknown JWT algorithm: {algorithm}")))?;
        // Symmetric signing only; secrets are shared-key material.
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::ConfigError(format!(
                "unsupported JWT algorithm: {algorithm:?}, expected HS256/HS384/HS512"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_token_expire_minutes,
        })
    }

    fn generate(&self, email: &str, token_type: &str, lifetime: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn generate_access_token(&self, email: &str) -> AppResult<String> {
        self.generate(
            email,
            TOKEN_TYPE_ACCESS,
            Duration::minutes(self.access_token_expire_minutes),
        )
    }

    pub fn generate_email_verification_token(&self, email: &str) -> AppResult<String> {
        self.generate(
            email,
            TOKEN_TYPE_EMAIL_VERIFICATION,
            Duration::hours(EMAIL_VERIFICATION_EXPIRE_HOURS),
        )
    }

    pub fn generate_password_reset_token(&self, email: &str) -> AppResult<String> {
        self.generate(
            email,
            TOKEN_TYPE_PASSWORD_RESET,
            Duration::hours(PASSWORD_RESET_EXPIRE_HOURS),
        )
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(self.algorithm);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Verifies signature and expiry, then the embedded `token_type` claim.
    /// A structurally valid token of another kind is rejected.
    fn verify_typed(&self, token: &str, expected_type: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != expected_type || claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        self.verify_typed(token, TOKEN_TYPE_ACCESS)
    }

    /// Returns the verified email.
    pub fn verify_email_verification_token(&self, token: &str) -> AppResult<String> {
        Ok(self.verify_typed(token, TOKEN_TYPE_EMAIL_VERIFICATION)?.sub)
    }

    /// Returns the verified email.
    pub fn verify_password_reset_token(&self, token: &str) -> AppResult<String> {
        Ok(self.verify_typed(token, TOKEN_TYPE_PASSWORD_RESET)?.sub)
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expire_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret", "HS256", 60).unwrap()
    }

    #[test]
    fn test_access_token_round_trip() {
        let jwt = service();
        let token = jwt.generate_access_token("a@b.com").unwrap();
        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtService::new("test-secret", "HS256", -10).unwrap();
        let token = jwt.generate_access_token("a@b.com").unwrap();
        assert!(matches!(
            jwt.verify_access_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service().generate_access_token("a@b.com").unwrap();
        let other = JwtService::new("other-secret", "HS256", 60).unwrap();
        assert!(matches!(
            other.verify_access_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_type_claim_mismatch_is_rejected() {
        let jwt = service();
        let reset = jwt.generate_password_reset_token("a@b.com").unwrap();
        // Signature and expiry are fine, but the type claim does not match.
        assert!(jwt.verify_access_token(&reset).is_err());
        assert!(jwt.verify_email_verification_token(&reset).is_err());
        assert_eq!(jwt.verify_password_reset_token(&reset).unwrap(), "a@b.com");
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert!(matches!(
            service().verify_token("not-a-jwt"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_rejects_non_hmac_algorithm() {
        assert!(JwtService::new("s", "RS256", 60).is_err());
        assert!(JwtService::new("s", "bogus", 60).is_err());
    }

    #[test]
    fn test_expires_in_is_seconds() {
        assert_eq!(service().access_token_expires_in(), 3600);
    }
}
