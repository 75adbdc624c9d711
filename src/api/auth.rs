use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::error::ApiError;

/// Claims read from an identity provider's HS256 token. `sub` is the caller's
/// user id and becomes the owner of every record they create.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Caller identity taken from a verified Bearer token. Never from the body.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Lifetime of tokens minted by [`create_token`].
pub const TOKEN_TTL: Duration = Duration::hours(1);
/// Clock skew tolerated between the token issuer and this service, in seconds.
pub const CLOCK_SKEW_SECS: i64 = 60;

impl Claims {
    pub fn for_user(user_id: Uuid, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            sub: user_id.to_string(),
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

/// Mint a token for `user_id`.
///
/// In production tokens come from the identity provider sharing `JWT_SECRET`;
/// this is for local tooling and tests.
pub fn create_token(secret: &[u8], user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        &Claims::for_user(user_id, TOKEN_TTL),
        &EncodingKey::from_secret(secret),
    )
}

/// Verify signature and expiry, and refuse tokens issued in the future.
pub fn decode_token(secret: &[u8], token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = CLOCK_SKEW_SECS as u64;
    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?.claims;
    if claims.iat > Utc::now().timestamp() + CLOCK_SKEW_SECS {
        return Err(ErrorKind::ImmatureSignature.into());
    }
    Ok(claims)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
        let claims = decode_token(&state.jwt_secret, token).map_err(|e| {
            debug!(error = %e, "rejected bearer token");
            ApiError::unauthorized("Invalid or expired token")
        })?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::unauthorized("Invalid token subject"))?;
        Ok(AuthUser { user_id })
    }
}
