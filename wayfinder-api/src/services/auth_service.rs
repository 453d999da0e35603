use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use wayfinder_shared::errors::{AppError, ErrorCode};
use wayfinder_shared::types::auth::{AuthToken, Claims, UserRole};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooWeak, "password must be at least 8 characters"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::new(ErrorCode::PasswordTooWeak, "password must contain at least one number"));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::new(ErrorCode::PasswordTooWeak, "password must contain at least one letter"));
    }
    Ok(())
}

pub fn generate_activation_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

/// Activation codes are stored hashed; only the emailed copy is plaintext.
pub fn hash_activation_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

pub fn create_access_token(
    user_id: Uuid,
    role: UserRole,
    secret: &str,
    ttl_secs: i64,
) -> Result<AuthToken, AppError> {
    let claims = Claims::new(user_id, role, ttl_secs);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("token creation failed: {e}")))?;
    Ok(AuthToken::bearer(token, ttl_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy_requires_length_letter_and_digit() {
        assert!(validate_password("short1").is_err());
        assert!(validate_password("allletters").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password("letters99").is_ok());
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("harbour-view9").unwrap();
        assert!(verify_password("harbour-view9", &hash).unwrap());
        assert!(!verify_password("wrong-password1", &hash).unwrap());
    }

    #[test]
    fn activation_codes_are_six_digits() {
        for _ in 0..20 {
            let code = generate_activation_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn activation_code_hash_is_stable_hex() {
        let first = hash_activation_code("123456");
        let second = hash_activation_code("123456");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_ne!(first, hash_activation_code("654321"));
    }
}
