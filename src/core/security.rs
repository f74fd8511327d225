use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::core::config::Settings;
use crate::db::types::Role;

const ARGON2_MEMORY_KIB: u32 = 102_400;
const ARGON2_TIME: u32 = 2;
const ARGON2_PARALLELISM: u32 = 8;

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("password hashing failed")]
    Hashing,
    #[error("password verification failed")]
    Verification,
    #[error("jwt encoding failed")]
    JwtEncoding,
    #[error("jwt decoding failed")]
    JwtDecoding,
    #[error("token role {found:?} is not accepted here")]
    RoleMismatch { found: Role },
    #[error("unsupported jwt algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) email: String,
    pub(crate) role: Role,
    pub(crate) exp: i64,
}

impl Claims {
    pub(crate) fn principal_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

fn argon2() -> Result<Argon2<'static>, argon2::Error> {
    let params = argon2::Params::new(ARGON2_MEMORY_KIB, ARGON2_TIME, ARGON2_PARALLELISM, None)?;
    Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
}

pub(crate) fn hash_password(password: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()
        .map_err(|_| SecurityError::Hashing)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| SecurityError::Hashing)?
        .to_string();

    Ok(hash)
}

pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SecurityError::Verification)?;

    match argon2().map_err(|_| SecurityError::Verification)?.verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(SecurityError::Verification),
    }
}

/// Signs a token for `role` with that role's secret and lifetime.
pub(crate) fn create_access_token(
    role: Role,
    principal_id: i32,
    email: &str,
    settings: &Settings,
    expires_in: Option<Duration>,
) -> Result<String, SecurityError> {
    let algorithm = algorithm_from_settings(settings)?;
    let token_settings = settings.security().token(role);
    let expire = OffsetDateTime::now_utc()
        + expires_in.unwrap_or_else(|| Duration::minutes(token_settings.expire_minutes as i64));

    let claims = Claims {
        sub: principal_id.to_string(),
        email: email.to_string(),
        role,
        exp: expire.unix_timestamp(),
    };

    encode(
        &jsonwebtoken::Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(token_settings.secret_key.as_bytes()),
    )
    .map_err(|_| SecurityError::JwtEncoding)
}

/// Verifies `token` against each allowed role's secret in turn. A token is
/// only accepted when the secret that verifies it belongs to the role named
/// in its own claims.
pub(crate) fn verify_token(
    token: &str,
    allowed: &[Role],
    settings: &Settings,
) -> Result<Claims, SecurityError> {
    let algorithm = algorithm_from_settings(settings)?;
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());

    let mut mismatch = None;
    for role in allowed {
        let secret = &settings.security().token(*role).secret_key;
        let Ok(data) =
            decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        else {
            continue;
        };

        if data.claims.role == *role {
            return Ok(data.claims);
        }
        mismatch = Some(data.claims.role);
    }

    match mismatch {
        Some(found) => Err(SecurityError::RoleMismatch { found }),
        None => Err(SecurityError::JwtDecoding),
    }
}

fn algorithm_from_settings(settings: &Settings) -> Result<Algorithm, SecurityError> {
    match settings.security().algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(SecurityError::UnsupportedAlgorithm(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct-horse-battery-staple").expect("hash");
        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn token_carries_principal_and_role() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        let settings = Settings::load().expect("settings");

        let token = create_access_token(Role::Teacher, 42, "t@example.com", &settings, None)
            .expect("token");
        let claims = verify_token(&token, &[Role::Teacher], &settings).expect("claims");

        assert_eq!(claims.principal_id(), Some(42));
        assert_eq!(claims.email, "t@example.com");
        assert_eq!(claims.role, Role::Teacher);
    }

    #[tokio::test]
    async fn token_of_other_role_is_rejected_even_with_shared_secret() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        let settings = Settings::load().expect("settings");

        let token =
            create_access_token(Role::Student, 7, "s@example.com", &settings, None).expect("token");
        let result = verify_token(&token, &[Role::Admin, Role::Teacher], &settings);

        assert!(matches!(result, Err(SecurityError::RoleMismatch { found: Role::Student })));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        let settings = Settings::load().expect("settings");

        let token = create_access_token(
            Role::Admin,
            1,
            "a@example.com",
            &settings,
            Some(Duration::minutes(-5)),
        )
        .expect("token");

        assert!(matches!(
            verify_token(&token, &[Role::Admin], &settings),
            Err(SecurityError::JwtDecoding)
        ));
    }
}
