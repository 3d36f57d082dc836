use crate::domain::models::auth::{Claims, ADMIN_SUBJECT, SESSION_AUDIENCE};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Issues and verifies admin session tokens.
pub struct AuthService {
    issuer: String,
    session_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

pub struct Session {
    pub access_token: String,
    pub csrf_token: String,
    pub ttl: Duration,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .expect("Invalid JWT Private Key PEM");
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .expect("Invalid JWT Public Key PEM");

        Self {
            issuer: config.auth_issuer.clone(),
            session_ttl: Duration::minutes(config.session_ttl_minutes),
            encoding_key,
            decoding_key,
        }
    }

    pub fn issue_session(&self) -> Result<Session, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: ADMIN_SUBJECT.to_string(),
            aud: SESSION_AUDIENCE.to_string(),
            exp: (now + self.session_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            csrf: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        Ok(Session { access_token, csrf_token, ttl: self.session_ttl })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[SESSION_AUDIENCE]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        if data.claims.sub != ADMIN_SUBJECT {
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("admin123").unwrap();
        assert_ne!(hash, "admin123");
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("admin123", "admin123"));
        assert!(!verify_password("", ""));
    }
}
