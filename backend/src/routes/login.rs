//! Login route

use crate::error::ApiResult;
use crate::routes::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use bloglist_shared::{LoginRequest, LoginResponse};

/// Create login routes
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/", post(login))
}

/// POST /api/login - exchange credentials for a bearer token
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = UserService::login(state.users(), state.tokens(), req).await?;
    Ok(Json(response))
}
