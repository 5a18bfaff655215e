//! Review endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use campus_common::AppResult;
use campus_core::{CreateReviewInput, UpdateReviewInput};
use campus_db::entities::review;
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// Review response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub meal_id: String,
    pub meal_title: String,
    pub user_email: String,
    pub user_name: Option<String>,
    pub review: String,
    pub rating: Option<i32>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<review::Model> for ReviewResponse {
    fn from(r: review::Model) -> Self {
        Self {
            id: r.id,
            meal_id: r.meal_id,
            meal_title: r.meal_title,
            user_email: r.user_email,
            user_name: r.user_name,
            review: r.review,
            rating: r.rating,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// List reviews query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsQuery {
    pub meal_id: Option<String>,
}

// ==================== Handlers ====================

/// Review a meal.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.create(req).await?;
    Ok(ApiResponse::created(review.into()))
}

/// List reviews.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListReviewsQuery>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state.review_service.list(query.meal_id.as_deref()).await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

/// Edit a review.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.update(&id, req).await?;
    Ok(ApiResponse::ok(review.into()))
}

// ==================== Router ====================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update))
}
