use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::USER_AGENT, HeaderMap},
    routing::post,
    Json, Router,
};
use chrono::Local;
use roots_core::DeviceClass;
use roots_notify::{Notification, OrderMessage};
use roots_shared::{CheckoutReview, GeoLocation, Order, UserIdentity};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/notifications/preview", post(preview_order))
        .route("/v1/notifications/checkout", post(prepare_checkout))
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub order: Order,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default)]
    pub review: Option<CheckoutReview>,
    #[serde(default)]
    pub user: Option<UserIdentity>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn device_of(headers: &HeaderMap) -> DeviceClass {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    DeviceClass::from_user_agent(user_agent)
}

/// POST /v1/notifications/preview
/// Render a pre-shaped order and the links the browser should open
pub async fn preview_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<Notification>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let config = state.notifier.as_ref();

    let message = OrderMessage::from_order(&request.order);
    let notification = Notification::prepare(
        config,
        &message,
        &config.destination_number,
        device_of(&headers),
        &Local::now(),
    )
    .map_err(AppError::from_notify)?;

    tracing::info!("Prepared preview for order {}", message.order_id);
    Ok(Json(notification))
}

/// POST /v1/notifications/checkout
/// Merge the checkout draft with the stored order and return the message,
/// links and attempt order for the caller's user agent
pub async fn prepare_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<Notification>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let config = state.notifier.as_ref();

    let message = OrderMessage::from_checkout(
        request.order.as_ref(),
        request.review.as_ref(),
        request.user.as_ref(),
        request.location.as_ref(),
        &config.order_prefix,
    );
    let destination = request
        .phone_number
        .as_deref()
        .unwrap_or(&config.destination_number);

    let device = device_of(&headers);
    let notification = Notification::prepare(config, &message, destination, device, &Local::now())
        .map_err(AppError::from_notify)?;

    tracing::info!("Prepared checkout notification for order {} ({:?})", message.order_id, device);
    Ok(Json(notification))
}
