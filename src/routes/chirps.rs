use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError, ErrorContext, StoreError};
use crate::middleware::AccessToken;
use crate::store::{Db, DeleteOutcome};
use crate::validators::clean_chirp;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct ChirpQuery {
    pub author_id: Option<u64>,
}

#[derive(Serialize)]
pub struct CleanedChirp {
    pub cleaned_body: String,
}

/// POST /api/validate_chirp
///
/// Kept for older clients; answers with `{"error": ...}` rather than the
/// structured error body.
pub async fn validate_chirp(form: web::Json<ChirpRequest>) -> HttpResponse {
    match clean_chirp(&form.body) {
        Ok(cleaned_body) => HttpResponse::Ok().json(CleanedChirp { cleaned_body }),
        Err(_) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Chirp is too long"
        })),
    }
}

/// POST /api/chirps
///
/// **Requires a valid access token.** The body is length-checked and
/// censored before it is stored.
pub async fn create_chirp(
    token: AccessToken,
    form: web::Json<ChirpRequest>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let author_id = token.user_id()?;
    let context = ErrorContext::new("chirp_create").with_user_id(author_id);

    let body = clean_chirp(&form.body)?;
    let chirp = db.create_chirp(body, author_id).await?;

    tracing::info!(request_id = %context.request_id, chirp_id = chirp.id, "Chirp created");

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps[?author_id=N]
pub async fn list_chirps(
    query: web::Query<ChirpQuery>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let chirps = db.list_chirps(query.author_id).await?;
    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{id}
pub async fn get_chirp(path: web::Path<u64>, db: web::Data<Db>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let chirp = db
        .get_chirp(id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("chirp {}", id)))?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{id}
///
/// **Requires a valid access token** belonging to the chirp's author.
///
/// # Errors
/// - 403: Caller is not the author
/// - 404: No such chirp
pub async fn delete_chirp(
    token: AccessToken,
    path: web::Path<u64>,
    db: web::Data<Db>,
) -> Result<HttpResponse, AppError> {
    let user_id = token.user_id()?;
    let id = path.into_inner();
    let context = ErrorContext::new("chirp_delete").with_user_id(user_id);

    match db.delete_chirp_by(id, user_id).await? {
        DeleteOutcome::Deleted => {}
        DeleteOutcome::NotFound => {
            return Err(StoreError::NotFound(format!("chirp {}", id)).into());
        }
        DeleteOutcome::Forbidden => {
            let err = AppError::from(AuthError::Forbidden);
            context.log_error(&err);
            return Err(err);
        }
    }

    tracing::info!(request_id = %context.request_id, chirp_id = id, "Chirp deleted");

    Ok(HttpResponse::NoContent().finish())
}
