use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::ServiceError;
use crate::types::internal::Claims;

/// Cookie name carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Session lifetime: 2 hours
const SESSION_MINUTES: i64 = 120;

/// Issues and verifies bearer session tokens bound to an identity
///
/// Tokens are HS256 JWTs delivered as an HTTP-only cookie. The server holds
/// no session table: logout only instructs the client to discard the cookie,
/// so a previously issued, unexpired token remains technically valid if
/// replayed before natural expiry. This statelessness trade-off is
/// deliberate; true revocation would need a server-side blacklist.
pub struct SessionService {
    secret: String,
    session_minutes: i64,
}

impl SessionService {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            session_minutes: SESSION_MINUTES,
        }
    }

    /// Issue a signed session token for an identity, expiring in 2 hours
    pub fn issue(&self, identity_id: &str) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: identity_id.to_string(),
            exp: now + self.session_minutes * 60,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::internal("issue_session", e))
    }

    /// Verify signature and expiry, returning the bound claims
    ///
    /// Malformed, forged, and expired tokens all map to `Forbidden`; the
    /// absence of a token is the caller's `Unauthorized` case.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Forbidden)
    }

    /// Cookie header value delivering a session token to the client
    ///
    /// HTTP-only, not Secure-flagged, max-age matching token expiry.
    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "{}={}; HttpOnly; Path=/; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.session_minutes * 60
        )
    }

    /// Cookie header value instructing the client to discard its token
    pub fn clear_cookie(&self) -> String {
        format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE)
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("secret", &"<redacted>")
            .field("session_minutes", &self.session_minutes)
            .finish()
    }
}
