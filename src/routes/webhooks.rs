/// Payment provider webhooks

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::configuration::PolkaSettings;
use crate::error::{AppError, AuthError, ErrorContext, StoreError};
use crate::middleware::api_key;
use crate::store::Db;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: u64,
}

/// POST /api/polka/webhooks
///
/// Requires `Authorization: ApiKey <key>`. Only `user.upgraded` events
/// change anything; all other events are acknowledged with 204.
///
/// # Errors
/// - 401: Missing or wrong API key
/// - 404: Upgraded user does not exist
pub async fn polka_webhook(
    req: HttpRequest,
    form: web::Json<WebhookRequest>,
    db: web::Data<Db>,
    polka: web::Data<PolkaSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("polka_webhook");

    let authorized = match api_key(req.headers()) {
        Some(key) => !polka.api_key.is_empty() && key == polka.api_key,
        None => false,
    };
    if !authorized {
        return Err(AuthError::InvalidApiKey.into());
    }

    if form.event != USER_UPGRADED {
        tracing::debug!(event = %form.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = form.data.user_id;
    if !db.set_upgraded(user_id).await? {
        return Err(StoreError::NotFound(format!("user {}", user_id)).into());
    }

    tracing::info!(request_id = %context.request_id, user_id, "User upgraded");

    Ok(HttpResponse::NoContent().finish())
}
