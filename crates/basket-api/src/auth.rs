//! # Identity Tokens
//!
//! Requests identify their account with a `token` header:
//!
//! ```text
//! token: t=<unix seconds>,uid=<account id>,v1=<hex HMAC-SHA256 of "<t>.<uid>">
//! ```
//!
//! The middleware verifies the signature and age, then places an
//! [`AuthenticatedUser`] in the request extensions for the handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use basket_core::{AccountId, ShopError, ShopResult};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use std::time::Duration;

/// Header carrying the identity token
pub const TOKEN_HEADER: &str = "token";

/// Allowed clock skew for tokens stamped slightly in the future
const CLOCK_SKEW_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

/// Identity resolved from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub account_id: AccountId,
}

/// Issues and verifies identity tokens with a shared secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: Arc<str>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        let secret: String = secret.into();
        Self {
            secret: Arc::from(secret),
            ttl,
        }
    }

    /// Token for `account_id` stamped now
    pub fn issue(&self, account_id: AccountId) -> ShopResult<String> {
        self.issue_at(account_id, Utc::now().timestamp())
    }

    pub fn issue_at(&self, account_id: AccountId, timestamp: i64) -> ShopResult<String> {
        let uid = account_id.to_string();
        let signature = self.sign(timestamp, &uid)?;
        Ok(format!("t={},uid={},v1={}", timestamp, uid, signature))
    }

    /// Verify a token header against the current time
    pub fn verify(&self, header: &str) -> ShopResult<AccountId> {
        self.verify_at(header, Utc::now().timestamp())
    }

    pub fn verify_at(&self, header: &str, now: i64) -> ShopResult<AccountId> {
        let token = parse_token(header)?;

        let age = now - token.timestamp;
        if age > self.ttl.as_secs() as i64 {
            return Err(ShopError::Unauthorized("token expired".to_string()));
        }
        if age < -CLOCK_SKEW_SECS {
            return Err(ShopError::Unauthorized(
                "token issued in the future".to_string(),
            ));
        }

        let expected = self.sign(token.timestamp, token.uid)?;
        if !constant_time_compare(token.signature, &expected) {
            return Err(ShopError::Unauthorized("signature mismatch".to_string()));
        }

        token
            .uid
            .parse()
            .map_err(|_| ShopError::InvalidAccountId(token.uid.to_string()))
    }

    fn sign(&self, timestamp: i64, uid: &str) -> ShopResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| ShopError::Internal(format!("token key rejected: {}", e)))?;
        mac.update(format!("{}.{}", timestamp, uid).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

struct TokenParts<'a> {
    timestamp: i64,
    uid: &'a str,
    signature: &'a str,
}

fn parse_token(header: &str) -> ShopResult<TokenParts<'_>> {
    let mut timestamp = None;
    let mut uid = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("uid", value)) => uid = Some(value),
            Some(("v1", value)) => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, uid, signature) {
        (Some(timestamp), Some(uid), Some(signature)) => Ok(TokenParts {
            timestamp,
            uid,
            signature,
        }),
        _ => Err(ShopError::Unauthorized("malformed token".to_string())),
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Reject requests without a valid token; attach the identity otherwise
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ShopError::Unauthorized("missing token header".to_string()))?;

    let account_id = state.tokens.verify(header)?;
    request
        .extensions_mut()
        .insert(AuthenticatedUser { account_id });

    Ok(next.run(request).await)
}
