//! Order endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch},
};
use campus_common::AppResult;
use campus_core::CreateOrderInput;
use campus_db::entities::meal_order;
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AppState,
    response::{ApiResponse, no_content},
};

// ==================== Request/Response Types ====================

/// Order response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub meal_id: String,
    pub meal_title: String,
    pub price: f64,
    pub user_email: String,
    pub user_name: Option<String>,
    pub status: meal_order::OrderStatus,
    pub created_at: String,
}

impl From<meal_order::Model> for OrderResponse {
    fn from(o: meal_order::Model) -> Self {
        Self {
            id: o.id,
            meal_id: o.meal_id,
            meal_title: o.meal_title,
            price: o.price,
            user_email: o.user_email,
            user_name: o.user_name,
            status: o.status,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

/// List orders query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub user_email: Option<String>,
}

// ==================== Handlers ====================

/// Place an order.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderInput>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.order_service.create(req).await?;
    Ok(ApiResponse::created(order.into()))
}

/// List orders.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let orders = state.order_service.list(query.user_email.as_deref()).await?;
    Ok(ApiResponse::ok(orders.into_iter().map(Into::into).collect()))
}

/// Mark an order as served.
async fn done(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.order_service.mark_done(&id).await?;
    Ok(no_content())
}

// ==================== Router ====================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}/done", patch(done))
}
