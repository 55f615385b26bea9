/// JWT Token Issuance and Authorization
///
/// Both token kinds are HS256 JWTs signed with the same secret. The secret
/// and the current time are passed in explicitly so these functions stay
/// pure.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, TokenKind};
use crate::error::{AppError, AuthError};

/// Default and maximum access token lifetime
pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 60 * 60;
/// Fixed refresh token lifetime
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// A token whose signature, structure and expiry have been verified.
///
/// Which flows may use it is decided by the caller through [`require`].
///
/// [`require`]: AuthorizedToken::require
#[derive(Debug, Clone)]
pub struct AuthorizedToken {
    pub raw: String,
    pub claims: Claims,
}

impl AuthorizedToken {
    pub fn kind(&self) -> Option<TokenKind> {
        self.claims.kind()
    }

    /// Fail with `TokenKindMismatch` unless the token was minted as `kind`.
    pub fn require(&self, kind: TokenKind) -> Result<(), AuthError> {
        if self.kind() == Some(kind) {
            Ok(())
        } else {
            tracing::warn!(
                issuer = %self.claims.iss,
                expected = kind.issuer(),
                "Token kind mismatch"
            );
            Err(AuthError::TokenKindMismatch)
        }
    }

    pub fn user_id(&self) -> Result<u64, AuthError> {
        self.claims.user_id()
    }
}

/// Lifetime granted for a token of `kind`.
///
/// Refresh tokens always live 60 days. Access tokens default to one hour
/// and a requested lifetime is clamped to that ceiling; non-positive
/// requests fall back to the default.
pub fn token_lifetime(kind: TokenKind, requested_expiry_seconds: Option<i64>) -> Duration {
    match kind {
        TokenKind::Refresh => Duration::days(REFRESH_TOKEN_TTL_DAYS),
        TokenKind::Access => {
            let seconds = match requested_expiry_seconds {
                Some(requested) if requested > 0 => requested.min(ACCESS_TOKEN_TTL_SECONDS),
                _ => ACCESS_TOKEN_TTL_SECONDS,
            };
            Duration::seconds(seconds)
        }
    }
}

/// Create a signed token for `user_id`
///
/// # Errors
/// `Signing` if the secret is empty or encoding fails
pub fn issue_token(
    user_id: u64,
    kind: TokenKind,
    secret: &str,
    requested_expiry_seconds: Option<i64>,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    if secret.is_empty() {
        return Err(AuthError::Signing("signing secret is empty".to_string()).into());
    }

    let lifetime = token_lifetime(kind, requested_expiry_seconds);
    let claims = Claims::new(user_id, kind, now.timestamp(), lifetime.num_seconds());

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::from(AuthError::Signing(e.to_string())))
}

/// Verify a token's signature, structure and expiry
///
/// # Errors
/// - `TokenInvalid` on a bad signature or malformed token
/// - `TokenExpired` once `now` has reached the token's `exp`
pub fn authorize(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<AuthorizedToken, AppError> {
    if secret.is_empty() || token.is_empty() {
        return Err(AuthError::TokenInvalid.into());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against the injected clock
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        AuthError::TokenInvalid
    })?;

    if now.timestamp() >= data.claims.exp {
        return Err(AuthError::TokenExpired.into());
    }

    Ok(AuthorizedToken {
        raw: token.to_string(),
        claims: data.claims,
    })
}
