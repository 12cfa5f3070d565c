//! Session decoding and the admin gate.
//!
//! The identity provider issues a JWT for every session. Its signature is
//! verified by the backend on each request; the console only reads the
//! claims to decide whether the admin screens may be shown. The role claim
//! is turned into a [`UserRole`] here and nowhere else.

use core::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{UserId, UserRole};

/// Delay between showing the access-denied message and signing out.
pub const SIGN_OUT_DELAY: Duration = Duration::from_secs(1);

/// Why a session may not use the admin console.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenial {
    /// No session token was supplied.
    #[error("not signed in")]
    MissingToken,
    /// The token could not be decoded.
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    /// The token has expired.
    #[error("session expired")]
    Expired,
    /// The token carries no recognised role claim.
    #[error("session has no role")]
    MissingRole,
    /// The session belongs to a non-admin user.
    #[error("administrator role required")]
    NotAdmin,
}

/// Claims read from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// User identifier (`sub` claim).
    pub user_id: UserId,
    /// Role read from the metadata claims.
    pub role: UserRole,
    /// Email address, when the provider includes it.
    pub email: Option<String>,
    /// Expiry time (`exp` claim).
    pub expires_at: Option<DateTime<Utc>>,
}

/// A session proven to belong to an administrator.
///
/// Only [`Session::require_admin`] constructs it, so holding one is enough
/// to call admin-only operations without re-checking the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession(Session);

impl AdminSession {
    /// Returns the underlying session.
    #[inline]
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.0
    }
}

/// Raw claim set, with the metadata aliases the provider may use.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClaims {
    /// Subject.
    #[serde(default)]
    sub: Option<String>,
    /// Expiry as seconds since the epoch.
    #[serde(default)]
    exp: Option<i64>,
    /// Email address.
    #[serde(default)]
    email: Option<String>,
    /// Session metadata.
    #[serde(default)]
    metadata: Option<Value>,
    /// Public user metadata.
    #[serde(default)]
    public_metadata: Option<Value>,
    /// Unsafe user metadata.
    #[serde(default)]
    unsafe_metadata: Option<Value>,
    /// Top-level role claim.
    #[serde(default)]
    role: Option<Value>,
}

impl RawClaims {
    /// Finds the first role claim, in lookup order.
    fn role(&self) -> Option<&str> {
        [&self.metadata, &self.public_metadata, &self.unsafe_metadata]
            .into_iter()
            .flatten()
            .find_map(|meta| meta.get("role").and_then(Value::as_str))
            .or_else(|| self.role.as_ref().and_then(Value::as_str))
    }
}

impl Session {
    /// Decodes a session token and validates it against `now`.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessDenial`] if the token is empty, malformed,
    /// expired, or carries no recognised role.
    pub fn decode(token: &str, now: DateTime<Utc>) -> Result<Self, AccessDenial> {
        let raw = token.trim();
        if raw.is_empty() {
            return Err(AccessDenial::MissingToken);
        }

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = jsonwebtoken::decode::<RawClaims>(
            raw,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .map_err(|e| AccessDenial::InvalidToken(e.to_string()))?
        .claims;

        let expires_at = claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));
        if expires_at.is_some_and(|exp| exp <= now) {
            return Err(AccessDenial::Expired);
        }

        let role = claims
            .role()
            .and_then(|role| role.parse::<UserRole>().ok())
            .ok_or(AccessDenial::MissingRole)?;

        let user_id = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .map(UserId::new)
            .ok_or_else(|| AccessDenial::InvalidToken("missing subject".to_owned()))?;

        tracing::debug!(user = %user_id, role = role.as_wire(), "decoded session");
        Ok(Self {
            user_id,
            role,
            email: claims.email,
            expires_at,
        })
    }

    /// Checks that the session belongs to an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenial::NotAdmin`] for any other role.
    #[inline]
    pub fn require_admin(self) -> Result<AdminSession, AccessDenial> {
        if self.role == UserRole::Admin {
            Ok(AdminSession(self))
        } else {
            Err(AccessDenial::NotAdmin)
        }
    }
}

/// Decodes `token` and admits it only for administrators.
///
/// # Errors
///
/// Returns an [`AccessDenial`] describing why access was refused.
#[inline]
pub fn authorize_admin(token: &str, now: DateTime<Utc>) -> Result<AdminSession, AccessDenial> {
    Session::decode(token, now)?.require_admin()
}
