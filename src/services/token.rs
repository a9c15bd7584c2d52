// Session token issuer and verifier (HS256)
// Stateless: a token is valid iff its signature checks out and it has not
// expired. There is no revocation list; see DESIGN.md for the trade-off.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::models::account::{Account, Role};
use crate::models::auth::SessionClaims;

/// Error types for token operations.
///
/// `Expired` and `Malformed` are deliberately separate kinds: the HTTP
/// boundary collapses them into one response, but logs and metrics keep the
/// distinction.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Malformed or tampered token")]
    Malformed,

    #[error("Token encoding error: {0}")]
    Encoding(String),

    #[error("System clock error: {0}")]
    Clock(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            _ => TokenError::Encoding(err.to_string()),
        }
    }
}

/// Token signing configuration
#[derive(Clone)]
pub struct TokenConfig {
    pub expiry: u64,
    pub algorithm: Algorithm,
    pub audience: String,
    pub issuer: String,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
    pub key_version: u32,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("expiry", &self.expiry)
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"<redacted>")
            .field("decoding_key", &"<redacted>")
            .field("key_version", &self.key_version)
            .finish()
    }
}

impl TokenConfig {
    fn build_from_params(
        secret: &str,
        expiry: u64,
        audience: String,
        issuer: String,
        key_version: u32,
    ) -> Self {
        TokenConfig {
            expiry,
            algorithm: Algorithm::HS256,
            audience,
            issuer,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            key_version,
        }
    }

    /// Create token config from centralized app configuration
    pub fn from_env() -> Self {
        let settings = &crate::app_config::config().token;
        Self::build_from_params(
            &settings.secret,
            settings.expiry,
            settings.audience.clone(),
            settings.issuer.clone(),
            settings.key_version,
        )
    }

    /// Deterministic config for tests, independent of the environment
    pub fn for_test() -> Self {
        Self::build_from_params(
            "test-session-secret-hs256-minimum-32-characters",
            28800,
            "gatehouse.test".to_string(),
            "gatehouse.test".to_string(),
            1,
        )
    }

    /// Test config with an arbitrary secret, for wrong-key scenarios
    pub fn for_test_with_secret(secret: &str) -> Self {
        Self::build_from_params(
            secret,
            28800,
            "gatehouse.test".to_string(),
            "gatehouse.test".to_string(),
            1,
        )
    }
}

/// Token issuer/verifier service
pub struct TokenService {
    config: TokenConfig,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(TokenConfig::from_env())
    }

    fn now_unix(&self) -> Result<u64, TokenError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| TokenError::Clock(e.to_string()))
    }

    /// Issue a session token for an account.
    ///
    /// Callers must have passed the approval gate first; this function only
    /// encodes what it is given.
    pub fn issue_session_token(&self, account: &Account) -> Result<String, TokenError> {
        self.issue_for(account.id, account.role)
    }

    /// Issue a token from raw parts
    pub fn issue_for(&self, account_id: Uuid, role: Role) -> Result<String, TokenError> {
        let now = self.now_unix()?;

        let claims = SessionClaims {
            sub: account_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            role,
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.expiry,
        };

        let mut header = Header::new(self.config.algorithm);
        header.kid = Some(self.config.key_version.to_string());

        encode(&header, &claims, &self.config.encoding_key).map_err(Into::into)
    }

    /// Verify a session token and return its claims.
    ///
    /// Signature, audience, issuer and expiry are all checked, with zero
    /// leeway on expiry.
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.config.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Configured token lifetime in seconds
    pub fn expiry_seconds(&self) -> u64 {
        self.config.expiry
    }
}
