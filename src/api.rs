//! HTTP surface: routes, request/response shapes, and the uniform envelope.

use axum::extract::{FromRequest, Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::config::Config;
use crate::domain::aggregates::order::{Order, OrderStatus};
use crate::error::{Error, Result};
use crate::service::OrderService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
    pub config: Arc<Config>,
}

/// Uniform response envelope: `{ "status": bool, "message": string, "data"? }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse { status: true, message: message.into(), data: Some(data) }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn failure(message: impl Into<String>) -> Self {
        ApiResponse { status: false, message: message.into(), data: None }
    }
}

/// `Json` with rejections reported through the envelope instead of axum's
/// plain-text default.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/users/:user_id/orders",
            get(list_orders).post(create_order).put(update_order_status),
        )
        .route("/users/:user_id/orders/:order_id", get(get_order))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "shopfront-orders" }))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    /// Kept as raw JSON: the legacy wire format sends `"true"`/`"false"`
    /// strings where newer clients send booleans.
    #[serde(default)]
    pub cancellable: serde_json::Value,
}

/// Accepts a native boolean or the legacy string forms; anything else is a
/// client error.
fn parse_cancellable(value: &serde_json::Value) -> Result<Option<bool>> {
    use serde_json::Value;
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::String(s) if s == "true" => Ok(Some(true)),
        Value::String(s) if s == "false" => Ok(Some(false)),
        _ => Err(Error::InvalidInput(
            "cancellable should have only true/false in it".to_string(),
        )),
    }
}

async fn create_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    let cancellable = parse_cancellable(&body.cancellable)?;
    let order = state.service.create_order(caller, user_id, cancellable).await?;
    Ok(Json(ApiResponse::ok("order created successfully", order)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub order_id: Uuid,
    pub status: String,
}

async fn update_order_status(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    let requested =
        OrderStatus::parse(&body.status).map_err(|e| Error::InvalidInput(e.to_string()))?;
    let order = state
        .service
        .update_order_status(caller, user_id, body.order_id, requested)
        .await?;
    Ok(Json(ApiResponse::ok(format!("order status {}", order.status), order)))
}

async fn get_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path((user_id, order_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Order>>> {
    let order = state.service.get_order(caller, user_id, order_id).await?;
    Ok(Json(ApiResponse::ok("order fetched successfully", order)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

async fn list_orders(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).min(100);
    let orders = state
        .service
        .list_orders(
            caller,
            user_id,
            per_page as i64,
            ((page - 1) * per_page) as i64,
        )
        .await?;
    Ok(Json(ApiResponse::ok("orders fetched successfully", orders)))
}
