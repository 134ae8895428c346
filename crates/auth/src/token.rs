//! Signed bearer tokens.
//!
//! A token is a JSON payload carrying the claims plus a hex-encoded
//! HMAC-SHA256 tag computed over the serialized claims with a process-wide
//! secret. Verification recomputes the tag and compares in constant time,
//! then checks expiry. Nothing else is consulted.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{Error, Identity, Result, Role};

type HmacSha256 = Hmac<Sha256>;

/// Shortest permitted token lifetime.
pub const MIN_TTL_DAYS: i64 = 1;
/// Longest permitted token lifetime.
pub const MAX_TTL_DAYS: i64 = 7;

/// Claims embedded in a token.
///
/// Timestamps are unix seconds. Field order is the canonical serialization
/// order the tag is computed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub subject_id: String,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Wire form of a token: claims plus signature tag.
#[derive(Debug, Serialize, Deserialize)]
struct SignedToken {
    #[serde(flatten)]
    claims: Claims,
    mac: String,
}

/// Issues and verifies signed tokens with a fixed secret.
///
/// The secret is configured once at startup and treated as immutable.
pub struct TokenKeeper {
    secret: Vec<u8>,
}

impl TokenKeeper {
    /// Create a keeper from the process-wide secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::EmptySecret);
        }
        Ok(Self { secret })
    }

    /// Issue a token for a subject, valid for `ttl_days`.
    pub fn issue(&self, subject_id: impl Into<String>, role: Role, ttl_days: i64) -> Result<String> {
        if !(MIN_TTL_DAYS..=MAX_TTL_DAYS).contains(&ttl_days) {
            return Err(Error::TtlOutOfRange {
                min: MIN_TTL_DAYS,
                max: MAX_TTL_DAYS,
            });
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            subject_id: subject_id.into(),
            role,
            issued_at: now,
            expires_at: now + ttl_days * 86_400,
        };
        self.sign(claims)
    }

    fn sign(&self, claims: Claims) -> Result<String> {
        let mac = hex::encode(self.tag(&claims)?);
        let token = SignedToken { claims, mac };
        Ok(serde_json::to_string(&token)?)
    }

    /// Verify a token and resolve the identity it carries.
    ///
    /// Fails when the token is blank, malformed, carries a bad signature,
    /// or has expired. No lookup is performed beyond the token itself.
    pub fn verify(&self, token: &str) -> Result<Identity> {
        if token.trim().is_empty() {
            return Err(Error::MissingToken);
        }

        let signed: SignedToken =
            serde_json::from_str(token).map_err(|e| Error::Malformed(e.to_string()))?;
        let tag = hex::decode(&signed.mac).map_err(|e| Error::Malformed(e.to_string()))?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| Error::Malformed(e.to_string()))?;
        mac.update(&serde_json::to_vec(&signed.claims)?);
        mac.verify_slice(&tag)
            .map_err(|_| Error::InvalidSignature)?;

        if Utc::now().timestamp() >= signed.claims.expires_at {
            return Err(Error::Expired);
        }

        Ok(Identity::new(signed.claims.subject_id, signed.claims.role))
    }

    fn tag(&self, claims: &Claims) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| Error::Malformed(e.to_string()))?;
        mac.update(&serde_json::to_vec(claims)?);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keeper() -> TokenKeeper {
        TokenKeeper::new("test-secret").unwrap()
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        let token = keeper().issue("s-1", Role::Student, 7).unwrap();
        let identity = keeper().verify(&token).unwrap();
        assert_eq!(identity.subject_id, "s-1");
        assert_eq!(identity.role, Role::Student);
    }

    #[test]
    fn blank_token_is_missing() {
        assert!(matches!(keeper().verify("  "), Err(Error::MissingToken)));
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert!(matches!(
            keeper().verify("not json"),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn tampered_claims_fail_signature_check() {
        let token = keeper().issue("s-1", Role::Student, 1).unwrap();
        let escalated = token.replace("student", "admin");
        assert!(matches!(
            keeper().verify(&escalated),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let token = keeper().issue("s-1", Role::Admin, 1).unwrap();
        let other = TokenKeeper::new("other-secret").unwrap();
        assert!(matches!(
            other.verify(&token),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            subject_id: "s-1".to_string(),
            role: Role::Student,
            issued_at: now - 200,
            expires_at: now - 100,
        };
        let token = keeper().sign(claims).unwrap();
        assert!(matches!(keeper().verify(&token), Err(Error::Expired)));
    }

    #[test]
    fn ttl_outside_window_is_rejected() {
        for days in [0, 8, -1] {
            assert!(matches!(
                keeper().issue("s-1", Role::Student, days),
                Err(Error::TtlOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(TokenKeeper::new(""), Err(Error::EmptySecret)));
    }
}
