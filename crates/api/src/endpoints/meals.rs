//! Meal endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch},
};
use campus_common::AppResult;
use campus_core::{CreateMealInput, MealPage};
use campus_db::entities::meal;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    middleware::AppState,
    response::{ApiResponse, no_content},
};

// ==================== Request/Response Types ====================

/// Meal response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
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
    pub reviews_count: i32,
    pub created_at: String,
}

impl From<meal::Model> for MealResponse {
    fn from(m: meal::Model) -> Self {
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
            reviews_count: m.reviews_count,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

// ==================== Handlers ====================

/// Add a meal to the menu.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateMealInput>,
) -> AppResult<ApiResponse<MealResponse>> {
    let meal = state.meal_service.create(req).await?;
    Ok(ApiResponse::created(meal.into()))
}

/// List a page of meals.
async fn list(
    State(state): State<AppState>,
    Query(page): Query<MealPage>,
) -> AppResult<ApiResponse<Vec<MealResponse>>> {
    let meals = state.meal_service.list(&page).await?;
    Ok(ApiResponse::ok(meals.into_iter().map(Into::into).collect()))
}

/// List every meal.
async fn all(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<MealResponse>>> {
    let meals = state.meal_service.all().await?;
    Ok(ApiResponse::ok(meals.into_iter().map(Into::into).collect()))
}

/// Get one meal.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MealResponse>> {
    let meal = state.meal_service.get(&id).await?;
    Ok(ApiResponse::ok(meal.into()))
}

/// Remove a meal.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.meal_service.delete(&id).await?;
    Ok(no_content())
}

/// Add one like.
async fn like(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.meal_service.like(&id).await?;
    Ok(no_content())
}

/// Remove one like.
async fn unlike(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.meal_service.unlike(&id).await?;
    Ok(no_content())
}

// ==================== Router ====================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/all", get(all))
        .route("/{id}", get(show).delete(delete))
        .route("/{id}/like", patch(like))
        .route("/{id}/unlike", patch(unlike))
}
