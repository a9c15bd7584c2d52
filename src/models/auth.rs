// Session token claims.
// The token is the only session state in the system: no server-side store,
// validity is signature + expiry alone.

use serde::{Deserialize, Serialize};

use crate::models::account::Role;

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Account ID (subject)
    pub sub: String,

    /// Token ID (UUID format), for correlation in logs
    pub jti: String,

    /// Role at issuance time; the role gate trusts this for the token's
    /// lifetime
    pub role: Role,

    /// Audience
    pub aud: String,

    /// Issuer
    pub iss: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

impl SessionClaims {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(iat: u64, exp: u64) -> SessionClaims {
        SessionClaims {
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            role: Role::Standard,
            aud: "gatehouse.test".to_string(),
            iss: "gatehouse.test".to_string(),
            iat,
            exp,
        }
    }

    #[test]
    fn test_claims_serialization_round_trip() {
        let original = claims(1640995200, 1641024000);

        let json = serde_json::to_string(&original).expect("Should serialize");
        let deserialized: SessionClaims = serde_json::from_str(&json).expect("Should deserialize");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let c = claims(0, 0);
        let value = serde_json::to_value(&c).expect("Should serialize");
        assert_eq!(value["role"], "standard");
    }

    #[test]
    fn test_token_expiry_check() {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        assert!(claims(now - 3600, now - 1).is_expired());
        assert!(!claims(now, now + 3600).is_expired());
    }
}
