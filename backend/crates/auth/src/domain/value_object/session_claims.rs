//! Session Claims
//!
//! Contents of the signed `userid` cookie. There is no server-side session
//! row: the cookie is the session, and its signature is the only proof.
//!
//! ```text
//! userid = dumps({"uid": "<uuid>", "iat": <unix ms>}, key, salt = "auth.session")
//! ```

use platform::signing::{SignatureError, Signer};
use serde::{Deserialize, Serialize};

use super::user_id::UserId;

/// Salt separating session tokens from every other signed value
pub const SESSION_SALT: &str = "auth.session";

/// Tolerated clock drift for tokens issued "in the future"
const CLOCK_SKEW_MS: i64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: UserId,
    /// Issued-at, unix milliseconds
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(uid: UserId, issued_at_ms: i64) -> Self {
        Self {
            uid,
            iat: issued_at_ms,
        }
    }

    pub fn is_expired(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.iat) > ttl_ms || self.iat > now_ms + CLOCK_SKEW_MS
    }

    pub fn encode(&self, signer: &Signer) -> Result<String, serde_json::Error> {
        signer.dumps(self, true)
    }

    pub fn decode(token: &str, signer: &Signer) -> Result<Self, SignatureError> {
        signer.loads(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn signer() -> Signer {
        Signer::new(b"test-secret".to_vec()).with_salt(SESSION_SALT)
    }

    #[test]
    fn test_encode_decode() {
        let claims = SessionClaims::new(UserId::new(), 1_700_000_000_000);
        let token = claims.encode(&signer()).unwrap();
        assert_eq!(SessionClaims::decode(&token, &signer()).unwrap(), claims);
    }

    #[test]
    fn test_decode_rejects_other_salt() {
        let claims = SessionClaims::new(UserId::new(), 0);
        let token = claims.encode(&signer()).unwrap();
        let unsalted = Signer::new(b"test-secret".to_vec());
        assert!(SessionClaims::decode(&token, &unsalted).is_err());
    }

    #[test]
    fn test_expiry() {
        let now = 100 * DAY_MS;
        let ttl = 14 * DAY_MS;
        assert!(!SessionClaims::new(UserId::new(), now - DAY_MS).is_expired(now, ttl));
        assert!(!SessionClaims::new(UserId::new(), now - ttl).is_expired(now, ttl));
        assert!(SessionClaims::new(UserId::new(), now - ttl - 1).is_expired(now, ttl));
        // Far-future issue time is not trusted
        assert!(SessionClaims::new(UserId::new(), now + DAY_MS).is_expired(now, ttl));
    }
}
