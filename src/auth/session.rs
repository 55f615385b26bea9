/// Session Lifecycle
///
/// Login, refresh and revoke. Each is a short linear protocol composed from
/// the password check, token issuance/authorization and the refresh-token
/// records in the document store. Every failure is terminal for the request.

use std::sync::Arc;

use crate::auth::claims::TokenKind;
use crate::auth::jwt::{authorize, issue_token, token_lifetime, AuthorizedToken};
use crate::auth::password::verify_password;
use crate::clock::Clock;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::{Db, User};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

pub struct SessionController {
    db: Arc<Db>,
    secret: String,
    clock: Arc<dyn Clock>,
}

impl SessionController {
    pub fn new(db: Arc<Db>, jwt: &JwtSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            secret: jwt.secret.clone(),
            clock,
        }
    }

    /// Verify the credentials, mint an access/refresh pair and persist the
    /// refresh token record.
    ///
    /// # Errors
    /// - `InvalidCredentials` for an unknown email or a wrong password alike
    /// - `Signing` if a token cannot be signed
    /// - store errors if the refresh record cannot be saved
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        expires_in_seconds: Option<i64>,
    ) -> Result<LoginOutcome, AppError> {
        let record = match self.db.get_user_by_email(email).await? {
            Some(record) if verify_password(password, &record.password_hash) => record,
            Some(record) => {
                tracing::info!(user_id = record.id, "Login rejected: wrong password");
                return Err(AuthError::InvalidCredentials.into());
            }
            None => {
                tracing::info!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let now = self.clock.now();
        let access_token = issue_token(
            record.id,
            TokenKind::Access,
            &self.secret,
            expires_in_seconds,
            now,
        )?;
        let refresh_token = issue_token(record.id, TokenKind::Refresh, &self.secret, None, now)?;

        let expires_at = now + token_lifetime(TokenKind::Refresh, None);
        self.db
            .save_refresh_token(&refresh_token, record.id, expires_at)
            .await?;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            user: User::from(&record),
        })
    }

    /// Mint a new one-hour access token from a refresh token.
    ///
    /// The persisted record decides validity: a missing record is rejected as
    /// not found and a record past its `expires_at` as expired. The refresh
    /// token itself is not rotated.
    pub async fn refresh(&self, token: &str) -> Result<String, AppError> {
        let now = self.clock.now();
        let authorized = self.authorize_kind(token, TokenKind::Refresh)?;

        let record = self
            .db
            .get_refresh_token(&authorized.raw)
            .await?
            .ok_or(AuthError::RefreshTokenNotFound)?;

        if record.is_expired(now) {
            tracing::info!(user_id = record.user_id, "Refresh token record expired");
            return Err(AuthError::TokenExpired.into());
        }

        let user_id = authorized.user_id()?;
        issue_token(user_id, TokenKind::Access, &self.secret, None, now)
    }

    /// Delete the refresh token's record. Succeeds whether or not a record
    /// existed, so clients may retry.
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let authorized = self.authorize_kind(token, TokenKind::Refresh)?;

        let existed = self.db.delete_refresh_token(&authorized.raw).await?;
        if !existed {
            tracing::debug!("Revoke for a token with no record");
        }

        Ok(())
    }

    /// Authorize a token for access-protected routes.
    pub fn authorize_access(&self, token: &str) -> Result<AuthorizedToken, AppError> {
        self.authorize_kind(token, TokenKind::Access)
    }

    fn authorize_kind(&self, token: &str, kind: TokenKind) -> Result<AuthorizedToken, AppError> {
        let authorized = authorize(token, &self.secret, self.clock.now())?;
        authorized.require(kind)?;
        Ok(authorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::clock::ManualClock;
    use chrono::{Duration, Utc};

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    struct Harness {
        _dir: tempfile::TempDir,
        db: Arc<Db>,
        clock: Arc<ManualClock>,
        sessions: SessionController,
    }

    async fn harness() -> Harness {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Arc::new(Db::open(dir.path().join("database.json")).await.unwrap());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let jwt = JwtSettings {
            secret: SECRET.to_string(),
        };
        let sessions = SessionController::new(db.clone(), &jwt, clock.clone());

        Harness {
            _dir: dir,
            db,
            clock,
            sessions,
        }
    }

    async fn signup(h: &Harness, email: &str, password: &str) -> User {
        let hash = hash_password(password).unwrap();
        h.db.create_user(email, &hash).await.unwrap()
    }

    fn auth_error(err: AppError) -> AuthError {
        match err {
            AppError::Auth(e) => e,
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_then_refresh_keeps_subject() {
        let h = harness().await;
        let user = signup(&h, "a@example.com", "pw1").await;

        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();
        assert_eq!(outcome.user, user);

        let access = h.sessions.refresh(&outcome.refresh_token).await.unwrap();
        let authorized = h.sessions.authorize_access(&access).unwrap();
        assert_eq!(authorized.user_id().unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_login_persists_refresh_record() {
        let h = harness().await;
        let user = signup(&h, "a@example.com", "pw1").await;

        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        let record = h
            .db
            .get_refresh_token(&outcome.refresh_token)
            .await
            .unwrap()
            .expect("refresh record");
        assert_eq!(record.user_id, user.id);
        assert_eq!(record.expires_at, h.clock.now() + Duration::days(60));
    }

    #[tokio::test]
    async fn test_bad_credentials_look_the_same() {
        let h = harness().await;
        signup(&h, "a@example.com", "pw1").await;

        let wrong_password = h.sessions.login("a@example.com", "nope", None).await.unwrap_err();
        let unknown_email = h.sessions.login("b@example.com", "pw1", None).await.unwrap_err();

        assert!(matches!(auth_error(wrong_password), AuthError::InvalidCredentials));
        assert!(matches!(auth_error(unknown_email), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_requested_expiry_is_clamped() {
        let h = harness().await;
        signup(&h, "a@example.com", "pw1").await;

        let outcome = h
            .sessions
            .login("a@example.com", "pw1", Some(999_999))
            .await
            .unwrap();
        let claims = h.sessions.authorize_access(&outcome.access_token).unwrap().claims;

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_access_token_cannot_refresh_or_revoke() {
        let h = harness().await;
        signup(&h, "a@example.com", "pw1").await;
        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        let refresh = h.sessions.refresh(&outcome.access_token).await.unwrap_err();
        let revoke = h.sessions.revoke(&outcome.access_token).await.unwrap_err();

        assert!(matches!(auth_error(refresh), AuthError::TokenKindMismatch));
        assert!(matches!(auth_error(revoke), AuthError::TokenKindMismatch));
    }

    #[tokio::test]
    async fn test_refresh_token_cannot_access_routes() {
        let h = harness().await;
        signup(&h, "a@example.com", "pw1").await;
        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        let err = h.sessions.authorize_access(&outcome.refresh_token).unwrap_err();
        assert!(matches!(auth_error(err), AuthError::TokenKindMismatch));
    }

    #[tokio::test]
    async fn test_expired_record_rejects_valid_signature() {
        let h = harness().await;
        let user = signup(&h, "a@example.com", "pw1").await;
        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        h.db.save_refresh_token(
            &outcome.refresh_token,
            user.id,
            h.clock.now() - Duration::seconds(1),
        )
        .await
        .unwrap();

        let err = h.sessions.refresh(&outcome.refresh_token).await.unwrap_err();
        assert!(matches!(auth_error(err), AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_record_expires_at_its_boundary() {
        let h = harness().await;
        let user = signup(&h, "a@example.com", "pw1").await;
        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        h.db.save_refresh_token(&outcome.refresh_token, user.id, h.clock.now())
            .await
            .unwrap();

        let err = h.sessions.refresh(&outcome.refresh_token).await.unwrap_err();
        assert!(matches!(auth_error(err), AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_revoked_token_cannot_refresh() {
        let h = harness().await;
        signup(&h, "a@example.com", "pw1").await;
        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        h.sessions.revoke(&outcome.refresh_token).await.unwrap();

        let err = h.sessions.refresh(&outcome.refresh_token).await.unwrap_err();
        assert!(matches!(auth_error(err), AuthError::RefreshTokenNotFound));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let h = harness().await;
        signup(&h, "a@example.com", "pw1").await;
        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        h.sessions.revoke(&outcome.refresh_token).await.unwrap();
        h.sessions.revoke(&outcome.refresh_token).await.unwrap();

        // Validly signed but never persisted
        let never_issued =
            issue_token(99, TokenKind::Refresh, SECRET, None, h.clock.now()).unwrap();
        h.sessions.revoke(&never_issued).await.unwrap();
    }

    #[tokio::test]
    async fn test_sessions_in_same_second_are_revoked_independently() {
        let h = harness().await;
        signup(&h, "a@example.com", "pw1").await;

        let laptop = h.sessions.login("a@example.com", "pw1", None).await.unwrap();
        let phone = h.sessions.login("a@example.com", "pw1", None).await.unwrap();
        assert_ne!(laptop.refresh_token, phone.refresh_token);

        h.sessions.revoke(&laptop.refresh_token).await.unwrap();

        let err = h.sessions.refresh(&laptop.refresh_token).await.unwrap_err();
        assert!(matches!(auth_error(err), AuthError::RefreshTokenNotFound));
        assert!(h.sessions.refresh(&phone.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_access_expires_but_refresh_still_works() {
        let h = harness().await;
        let user = signup(&h, "a@example.com", "pw1").await;
        let outcome = h.sessions.login("a@example.com", "pw1", None).await.unwrap();

        h.clock.advance(Duration::seconds(3601));

        let err = h.sessions.authorize_access(&outcome.access_token).unwrap_err();
        assert!(matches!(auth_error(err), AuthError::TokenExpired));

        let fresh = h.sessions.refresh(&outcome.refresh_token).await.unwrap();
        let claims = h.sessions.authorize_access(&fresh).unwrap().claims;
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.exp - claims.iat, 3600);

        h.clock.advance(Duration::seconds(3599));
        assert!(h.sessions.authorize_access(&fresh).is_ok());
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let h = harness().await;

        let err = h.sessions.refresh("not-a-jwt").await.unwrap_err();
        assert!(matches!(auth_error(err), AuthError::TokenInvalid));
    }
}
