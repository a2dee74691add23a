use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::{config::AppConfig, error::ApiError, models::ROLE_ADMINISTRATOR};

/// Token validity window: 7 days from issuance. Expiry is the only
/// invalidation mechanism; there is no revocation list and no server-side
/// logout.
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Claims
///
/// The signed payload embedded in every session token. Claims are minted at
/// login and validated on every authenticated request.
///
/// The `role` claim is a snapshot taken at login time and is deliberately
/// NOT re-checked against the stored account on each request: a role change
/// only takes effect once the user logs in again. This staleness window is a
/// documented property of the design, not a bug.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the account UUID.
    pub sub: Uuid,
    /// Role snapshot at issuance: 'standard' or 'administrator'.
    pub role: String,
    /// Issued At (iat): timestamp when the token was minted.
    pub iat: usize,
    /// Expiration (exp): `iat + TOKEN_TTL_SECS`. Tokens at or past this
    /// instant fail verification.
    pub exp: usize,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// issue_token
///
/// Mints a signed session token for a freshly authenticated account. The
/// symmetric signing secret is immutable process-wide configuration injected
/// at startup; compromise of it invalidates all trust system-wide, and no
/// rotation mechanism exists at this layer.
pub fn issue_token(
    account_id: Uuid,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = unix_now();
    let claims = Claims {
        sub: account_id,
        role: role.to_string(),
        iat: now as usize,
        exp: (now + TOKEN_TTL_SECS) as usize,
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// AuthUser
///
/// The resolved principal of an authenticated request: the account id and
/// role decoded from a verified bearer token. This is the typed context
/// value handlers receive instead of an ambient request field — it is
/// threaded explicitly through extractor arguments.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account UUID from the token's `sub` claim.
    pub id: Uuid,
    /// The role snapshot from the token. See [`Claims`] for staleness notes.
    pub role: String,
}

impl AuthUser {
    /// True when the principal carries the administrator role.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMINISTRATOR
    }

    /// can_mutate
    ///
    /// The authorization policy, as a pure decision function: a principal may
    /// update or delete a resource iff it is an administrator or it owns the
    /// resource. Applied identically to posts and comments; never applied to
    /// create (ownership is stamped from the principal) or to reads.
    ///
    /// Callers must check existence of the target BEFORE invoking this, so a
    /// missing resource yields `NotFound` rather than a denial, regardless of
    /// the requester's role.
    pub fn can_mutate(&self, resource_owner_id: Uuid) -> bool {
        self.is_admin() || self.id == resource_owner_id
    }
}

/// AuthUser Extractor Implementation
///
/// The authentication gate. Implements Axum's `FromRequestParts`, making
/// `AuthUser` usable as a handler argument on every protected route.
///
/// Behavior:
/// - No `Authorization` header, or a header without the `Bearer ` scheme
///   prefix, counts as an absent token and rejects with 401
///   ("authentication required").
/// - A token that is present but fails verification — bad signature,
///   malformed payload, or expired — rejects with 403. The 401/403 split is
///   intentional: "missing" and "present-but-bad" are distinguished.
/// - On success the `{id, role}` principal is taken from the token alone.
///   The account record is NOT re-fetched, so an account deleted after
///   issuance still passes the gate until the token expires; its store
///   operations simply affect zero rows.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        // Token extraction. A missing header and a wrong scheme prefix are
        // both treated as "no token presented".
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthenticated)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;
        // Expiry is exact: no grace window past the exp instant.
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| ApiError::InvalidCredential("invalid token".to_string()))?;

        Ok(AuthUser {
            id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }
}
