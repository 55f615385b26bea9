/// Access Token Guard
///
/// Access-protected handlers take an [`AccessToken`] argument. Extraction
/// reads the bearer token from the Authorization header and accepts only a
/// valid, unexpired access-kind token; anything else is rejected before the
/// handler runs.

use actix_web::{
    dev::Payload,
    http::header::{HeaderMap, AUTHORIZATION},
    web, FromRequest, HttpRequest,
};
use std::future::{ready, Ready};

use crate::auth::{AuthorizedToken, SessionController};
use crate::error::{AppError, AuthError};

fn authorization_credentials<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(scheme))
        .and_then(|h| h.strip_prefix(' '))
        .map(str::trim)
        .filter(|credentials| !credentials.is_empty())
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// # Errors
/// `MissingToken` if the header is absent or uses another scheme
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    authorization_credentials(headers, "Bearer")
        .map(str::to_string)
        .ok_or(AuthError::MissingToken)
}

/// Extract the key from an `Authorization: ApiKey <key>` header
pub fn api_key(headers: &HeaderMap) -> Option<&str> {
    authorization_credentials(headers, "ApiKey")
}

/// A verified access token for the calling user
#[derive(Debug, Clone)]
pub struct AccessToken(pub AuthorizedToken);

impl AccessToken {
    /// # Errors
    /// `SubjectFormat` if the subject is not a user id
    pub fn user_id(&self) -> Result<u64, AuthError> {
        self.0.user_id()
    }

    fn extract(req: &HttpRequest) -> Result<Self, AppError> {
        let sessions = req
            .app_data::<web::Data<SessionController>>()
            .ok_or_else(|| AppError::Internal("session controller is not configured".to_string()))?;

        let token = bearer_token(req.headers())?;
        let authorized = sessions.authorize_access(&token)?;

        tracing::debug!(subject = %authorized.claims.sub, "Access token validated");
        Ok(AccessToken(authorized))
    }
}

impl FromRequest for AccessToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}
