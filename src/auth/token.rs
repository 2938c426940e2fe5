use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use axum::http::header::AUTHORIZATION;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use uuid::Uuid;

use crate::auth::Subject;
use crate::error::Error;

const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// What a successful signup or login answers with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grant {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Signs a one-hour HS256 token for the given account.
pub fn issue(user_id: Uuid, email: &str) -> Result<String, Error> {
    let secret = env::var("JWT_SECRET")?;
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.into(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(Error::token_error)
}

/// Verifies a token's signature and expiry. Any verification failure maps to
/// the one authentication error; the cause stays internal.
pub fn verify(token: &str) -> Result<Claims, Error> {
    let secret = env::var("JWT_SECRET")?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|err| {
        tracing::debug!("token verification failed: {}", err);
        Error::authentication_error()
    })?;

    Ok(data.claims)
}

// Handlers for mutating routes take a `Subject` parameter; axum fills it from
// the Authorization header here.
#[async_trait]
impl<B> FromRequest<B> for Subject
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(Error::authentication_error)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(Error::authentication_error)?;

        let claims = verify(token)?;

        Ok(Subject::new(claims.sub))
    }
}

#[cfg(test)]
use serial_test::serial;

#[test]
#[serial]
fn issued_tokens_verify_and_carry_the_subject() {
    env::set_var("JWT_SECRET", "loci-test-secret-0123456789abcdef");

    let user_id = Uuid::new_v4();
    let token = issue(user_id, "max@example.com").unwrap();

    let claims = verify(&token).unwrap();

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "max@example.com");
    assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);
}

#[test]
#[serial]
fn garbage_tokens_fail_verification() {
    env::set_var("JWT_SECRET", "loci-test-secret-0123456789abcdef");

    let err = verify("not.a.token").unwrap_err();

    assert!(err.is_authentication_error());
}

#[test]
#[serial]
fn tokens_signed_with_another_secret_fail_verification() {
    env::set_var("JWT_SECRET", "loci-test-secret-0123456789abcdef");
    let token = issue(Uuid::new_v4(), "max@example.com").unwrap();

    env::set_var("JWT_SECRET", "a-completely-different-secret-value");
    let err = verify(&token).unwrap_err();

    assert!(err.is_authentication_error());
}
