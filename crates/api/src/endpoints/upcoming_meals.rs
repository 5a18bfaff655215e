//! Upcoming meal endpoints, including like voting.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch, post},
};
use campus_common::{AppError, AppResult};
use campus_core::{CreateMealInput, Tally};
use campus_db::entities::upcoming_meal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use super::meals::MealResponse;
use crate::{
    middleware::AppState,
    response::{ApiResponse, no_content},
};

// ==================== Request/Response Types ====================

/// Upcoming meal response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMealResponse {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image: Option<String>,
    pub ingredients: JsonValue,
    pub description: Option<String>,
    pub price: f64,
    pub rating: f64,
    pub distributor_name: String,
    pub distributor_email: String,
    pub likes: i32,
    pub liked_by: Vec<String>,
    pub created_at: String,
}

impl From<upcoming_meal::Model> for UpcomingMealResponse {
    fn from(m: upcoming_meal::Model) -> Self {
        let liked_by = m.voters();
        Self {
            id: m.id,
            title: m.title,
            category: m.category,
            image: m.image,
            ingredients: m.ingredients,
            description: m.description,
            price: m.price,
            rating: m.rating,
            distributor_name: m.distributor_name,
            distributor_email: m.distributor_email,
            likes: m.likes,
            liked_by,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Like or unlike request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[validate(length(min = 1, max = 256))]
    pub user_id: String,
}

// ==================== Handlers ====================

/// Open a poll item.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateMealInput>,
) -> AppResult<ApiResponse<UpcomingMealResponse>> {
    let item = state.upcoming_meal_service.create(req).await?;
    Ok(ApiResponse::created(item.into()))
}

/// List poll items, most liked first.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<UpcomingMealResponse>>> {
    let items = state.upcoming_meal_service.list().await?;
    Ok(ApiResponse::ok(items.into_iter().map(Into::into).collect()))
}

/// Get one poll item.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UpcomingMealResponse>> {
    let item = state.upcoming_meal_service.get(&id).await?;
    Ok(ApiResponse::ok(item.into()))
}

/// Close a poll item.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.upcoming_meal_service.delete(&id).await?;
    Ok(no_content())
}

/// Move a poll item onto the menu.
async fn publish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MealResponse>> {
    let meal = state.upcoming_meal_service.publish(&id).await?;
    Ok(ApiResponse::created(meal.into()))
}

/// Cast a like.
async fn like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<Tally>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tally = state.voting.cast_vote(&id, &req.user_id).await?;
    Ok(ApiResponse::ok(tally))
}

/// Withdraw a like.
async fn unlike(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<Tally>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tally = state.voting.withdraw_vote(&id, &req.user_id).await?;
    Ok(ApiResponse::ok(tally))
}

/// Current like count and voters.
async fn tally(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Tally>> {
    let tally = state.voting.tally(&id).await?;
    Ok(ApiResponse::ok(tally))
}

// ==================== Router ====================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(delete))
        .route("/{id}/publish", post(publish))
        .route("/{id}/like", patch(like))
        .route("/{id}/unlike", patch(unlike))
        .route("/{id}/tally", get(tally))
}
