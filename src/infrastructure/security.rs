use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, Params};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

// Argon2 parameters for 50-150ms target latency
const ARGON2_M_COST: u32 = 19456; // 19 MB
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

const TOKEN_LEEWAY_SECS: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    exp: u64,
    iat: u64,
}

fn argon2_hasher() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
        .map_err(argon2::password_hash::Error::from)?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2_hasher()?.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// `Ok(false)` for a wrong password, `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(argon2_hasher()?
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

pub fn generate_token(
    user_id: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = now_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now.saturating_add(ttl_secs),
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

/// Returns the user id carried by a valid token.
pub fn validate_token(token: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = TOKEN_LEEWAY_SECS;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_uses_argon2id_with_random_salt() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();

        assert!(hash1.starts_with("$argon2id$"));
        assert_ne!(hash1, "same_password");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password").unwrap();

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_with_unicode() {
        let hash = hash_password("пароль123").unwrap();
        assert!(verify_password("пароль123", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash_format() {
        assert!(verify_password("test_password", "not_a_valid_hash").is_err());
    }

    #[test]
    fn test_token_carries_user_id() {
        let token = generate_token("user_456", "test_secret", 3600).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(validate_token(&token, "test_secret").unwrap(), "user_456");
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let token = generate_token("user_789", "test_secret", u64::MAX).unwrap();
        assert_eq!(validate_token(&token, "test_secret").unwrap(), "user_789");
    }

    #[test]
    fn test_validate_token_rejects_garbage_and_wrong_secret() {
        assert!(validate_token("invalid.token.here", "secret_key").is_err());

        let token = generate_token("test_user", "correct_secret", 3600).unwrap();
        assert!(validate_token(&token, "wrong_secret").is_err());
    }

    #[test]
    fn test_validate_token_rejects_expired_token() {
        let issued = now_secs() - 7200;
        let claims = Claims {
            sub: "old_user".to_string(),
            exp: issued + 3600,
            iat: issued,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(validate_token(&token, "secret").is_err());
    }
}
