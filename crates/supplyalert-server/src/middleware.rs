use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Env var holding the comma-separated bearer tokens.
const API_KEYS_VAR: &str = "SUPPLYALERT_API_KEYS";

/// User id attached to requests while auth is disabled.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The caller's user id, stored as a request extension by
/// [`require_bearer_auth`]. Route history is scoped by this value.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// API key auth settings used by middleware.
///
/// Only salted digests of the configured tokens are kept in memory. The hex
/// digest of a presented token doubles as its user id.
#[derive(Debug, Clone)]
pub struct AuthState {
    key_digests: Arc<Vec<String>>,
    salt: Arc<str>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `SUPPLYALERT_API_KEYS`.
    ///
    /// # Errors
    ///
    /// See [`AuthState::new`].
    pub fn from_env(salt: &str, is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var(API_KEYS_VAR).unwrap_or_default();
        Self::new(&raw, salt, is_development)
    }

    /// Builds auth config from a comma-separated token list.
    ///
    /// In development, an empty list disables auth for local iteration.
    /// In non-development envs, an empty list fails startup.
    ///
    /// # Errors
    ///
    /// Returns an error when no tokens are configured outside development.
    pub fn new(raw_keys: &str, salt: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut key_digests: Vec<String> = raw_keys
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|token| token_digest(salt, token))
            .collect();
        key_digests.sort();
        key_digests.dedup();

        if key_digests.is_empty() {
            if is_development {
                tracing::warn!(
                    "{API_KEYS_VAR} not set; bearer auth disabled in development environment"
                );
                return Ok(Self {
                    key_digests: Arc::new(Vec::new()),
                    salt: Arc::from(salt),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "{API_KEYS_VAR} is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            key_digests: Arc::new(key_digests),
            salt: Arc::from(salt),
            enabled: true,
        })
    }

    /// Returns the user id for `token` when it matches a configured key.
    ///
    /// Every configured digest is compared so timing does not depend on
    /// which key matched.
    fn authenticate(&self, token: &str) -> Option<String> {
        let digest = token_digest(&self.salt, token);
        let matched = self
            .key_digests
            .iter()
            .fold(subtle::Choice::from(0), |acc, known| {
                acc | known.as_bytes().ct_eq(digest.as_bytes())
            });
        bool::from(matched).then_some(digest)
    }
}

/// Hex SHA-256 of `salt:token`.
fn token_digest(salt: &str, token: &str) -> String {
    format!("{:x}", Sha256::digest(format!("{salt}:{token}").as_bytes()))
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for MiddlewareErrorBody {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Bearer token auth when enabled.
///
/// On success the caller's [`AuthenticatedUser`] is inserted into the
/// request extensions; with auth disabled every caller is [`ANONYMOUS_USER`].
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        req.extensions_mut()
            .insert(AuthenticatedUser(ANONYMOUS_USER.to_string()));
        return next.run(req).await;
    }

    let user = extract_bearer_token(req.headers().get(AUTHORIZATION))
        .and_then(|token| auth.authenticate(token));

    if let Some(user_id) = user {
        req.extensions_mut().insert(AuthenticatedUser(user_id));
        next.run(req).await
    } else {
        MiddlewareErrorBody {
            error: MiddlewareError {
                code: "unauthorized",
                message: "missing or invalid bearer token",
            },
        }
        .into_response()
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
