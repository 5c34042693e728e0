use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Payload carried by a session token.
///
/// `sub` holds the account identifier. `jti` is a fresh random id per
/// issuance so two sessions minted within the same second never produce
/// the same token string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (account identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Token id
    pub jti: String,
}

impl SessionClaims {
    /// Create claims for a session starting now.
    ///
    /// # Arguments
    /// * `subject` - Account identifier bound to the session
    /// * `lifetime` - How long the session stays valid
    pub fn issue(subject: impl ToString, lifetime: Duration) -> Self {
        Self::issued_at(subject, Utc::now(), lifetime)
    }

    /// Create claims for a session starting at `now`.
    pub fn issued_at(subject: impl ToString, now: DateTime<Utc>, lifetime: Duration) -> Self {
        let expiration = now + lifetime;

        Self {
            sub: subject.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Expiration as a timestamp, `None` if out of chrono's range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
