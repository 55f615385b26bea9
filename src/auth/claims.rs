/// JWT Claims structure
///
/// Access and refresh tokens share one claim set and one signing scheme.
/// They are told apart only by the issuer label, which is decoded into a
/// `TokenKind` once at the authorization boundary.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Issuer label for access tokens. Part of the wire contract.
pub const ACCESS_ISSUER: &str = "chirpy-access";
/// Issuer label for refresh tokens. Part of the wire contract.
pub const REFRESH_ISSUER: &str = "chirpy-refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_ISSUER,
            TokenKind::Refresh => REFRESH_ISSUER,
        }
    }

    /// `None` for any issuer this service does not mint.
    pub fn from_issuer(issuer: &str) -> Option<Self> {
        match issuer {
            ACCESS_ISSUER => Some(TokenKind::Access),
            REFRESH_ISSUER => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user id as decimal string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id, so two tokens minted in the same second still differ
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    pub fn new(user_id: u64, kind: TokenKind, issued_at: i64, lifetime_seconds: i64) -> Self {
        Self {
            iss: kind.issuer().to_string(),
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + lifetime_seconds,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Extract the user id from the subject
    ///
    /// # Errors
    /// `SubjectFormat` if the subject is not a non-negative integer
    pub fn user_id(&self) -> Result<u64, AuthError> {
        self.sub.parse::<u64>().map_err(|_| AuthError::SubjectFormat)
    }

    pub fn kind(&self) -> Option<TokenKind> {
        TokenKind::from_issuer(&self.iss)
    }
}
