/// Payment provider (Polka) webhook

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth::api_key;
use crate::authorization::ensure_webhook_key;
use crate::configuration::PolkaSettings;
use crate::error::{AppError, AuthError, ValidationError};
use crate::store::{Database, UserId};

const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: UserId,
}

/// POST /api/polka/webhooks
///
/// Requires `Authorization: ApiKey <key>`. Only `user.upgraded` events act;
/// every other event is acknowledged with 204.
///
/// # Errors
/// - 401: missing or wrong API key (checked before the body is parsed)
/// - 400: body is not a webhook payload
/// - 404: the user to upgrade does not exist
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    db: web::Data<Database>,
    polka: web::Data<PolkaSettings>,
) -> Result<HttpResponse, AppError> {
    let presented = api_key(req.headers()).map_err(|e| {
        tracing::warn!("Webhook without usable API key: {}", e);
        AppError::Auth(AuthError::InvalidApiKey)
    })?;
    ensure_webhook_key(&presented, &polka.api_key)?;

    let form: WebhookRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Unreadable webhook payload: {}", e);
        ValidationError::InvalidFormat("webhook body".to_string())
    })?;

    if form.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %form.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = form
        .data
        .as_ref()
        .map(|data| data.user_id)
        .ok_or_else(|| ValidationError::EmptyField("data.user_id".to_string()))?;

    db.upgrade_tier(user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
