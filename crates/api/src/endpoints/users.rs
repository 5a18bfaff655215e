//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch},
};
use campus_common::AppResult;
use campus_core::CreateUserInput;
use campus_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AppState,
    response::{ApiResponse, no_content},
};

// ==================== Request/Response Types ====================

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: user::UserRole,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            photo_url: u.photo_url,
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Admin check response.
#[derive(Serialize)]
pub struct AdminResponse {
    pub admin: bool,
}

/// List users query.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
}

// ==================== Handlers ====================

/// Register a user.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.create(req).await?;
    Ok(ApiResponse::created(user.into()))
}

/// List users.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.list(query.search.as_deref()).await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Grant the admin role.
async fn promote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.user_service.promote_to_admin(&id).await?;
    Ok(no_content())
}

/// Check whether an email belongs to an admin.
async fn is_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<ApiResponse<AdminResponse>> {
    let admin = state.user_service.is_admin(&email).await?;
    Ok(ApiResponse::ok(AdminResponse { admin }))
}

// ==================== Router ====================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/admin/{email}", get(is_admin))
        .route("/{id}/admin", patch(promote))
}
