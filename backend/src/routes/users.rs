//! User API routes

use crate::error::ApiResult;
use crate::routes::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bloglist_shared::{RegisterRequest, UserResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register))
        .route("/:id", get(get_user))
}

/// GET /api/users - every user with their blogs
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserService::list(state.users(), state.blogs()).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::find_by_id(state.users(), state.blogs(), &id).await?;
    Ok(Json(user))
}

/// POST /api/users - register
///
/// Password hashing is offloaded to the blocking thread pool.
async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::register(state.users(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
