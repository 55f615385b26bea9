/// Authentication Routes
///
/// Login, access-token refresh and refresh-token revocation. The handlers
/// only decode the request and shape the response; the flows themselves
/// live in `SessionController`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::SessionController;
use crate::error::{AppError, ErrorContext};
use crate::middleware::bearer_token;
use crate::store::User;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub expires_in_seconds: Option<i64>,
}

/// Login response: both tokens plus the public user view
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    #[serde(flatten)]
    pub user: User,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: Unknown email or wrong password (indistinguishable)
/// - 500: Token signing or document write failed
pub async fn login(
    form: web::Json<LoginRequest>,
    sessions: web::Data<SessionController>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");
    let form = form.into_inner();

    let outcome = sessions
        .login(&form.email, &form.password, form.expires_in_seconds)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = outcome.user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
        user: outcome.user,
    }))
}

/// POST /api/refresh
///
/// Requires `Authorization: Bearer <refresh token>`.
///
/// # Errors
/// - 401: Missing, invalid, expired, revoked or access-kind token
/// - 403: Token subject is not a user id
pub async fn refresh(
    req: HttpRequest,
    sessions: web::Data<SessionController>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let token = bearer_token(req.headers())?;
    let access_token = sessions.refresh(&token).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(request_id = %context.request_id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(TokenResponse {
        token: access_token,
    }))
}

/// POST /api/revoke
///
/// Requires `Authorization: Bearer <refresh token>`. Responds 204 whether or
/// not the token still had a record.
///
/// # Errors
/// - 401: Missing, invalid or access-kind token
pub async fn revoke(
    req: HttpRequest,
    sessions: web::Data<SessionController>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    let token = bearer_token(req.headers())?;
    sessions.revoke(&token).await.map_err(|e| {
        context.log_error(&e);
        e
    })?;

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");

    Ok(HttpResponse::NoContent().finish())
}
