use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::hash_password;
use crate::error::{AppError, ErrorContext, StoreError};
use crate::middleware::AccessToken;
use crate::store::Db;
use crate::validators::is_valid_email;

#[derive(Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<UserRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    let password_hash = hash_password(&form.password)?;
    let user = db.create_user(&email, &password_hash).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(user))
}

/// GET /api/users
pub async fn list_users(db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    let users = db.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id}
pub async fn get_user(path: web::Path<u64>, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = db
        .get_user(id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;

    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/users
///
/// Updates the calling user's email and password.
/// **Requires a valid access token.**
///
/// # Errors
/// - 401: Missing, invalid or refresh-kind token
/// - 403: Token subject is not a user id
/// - 404: The token's user no longer exists
pub async fn update_user(
    token: AccessToken,
    form: web::Json<UserRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let user_id = token.user_id()?;
    let context = ErrorContext::new("user_update").with_user_id(user_id);

    let email = is_valid_email(&form.email)?;
    let password_hash = hash_password(&form.password)?;
    let user = db
        .update_user(user_id, &email, &password_hash)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("user {}", user_id)))?;

    tracing::info!(request_id = %context.request_id, user_id, "User updated");

    Ok(HttpResponse::Ok().json(user))
}
