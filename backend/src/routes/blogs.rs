//! Blog API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::ApiJson;
use crate::services::BlogService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use bloglist_shared::{BlogResponse, BlogStatistics, CreateBlogRequest, UpdateBlogRequest};

/// Create blog routes
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/stats", get(blog_statistics))
        .route("/:id", put(update_blog).delete(delete_blog))
}

/// GET /api/blogs - every blog with its owner
async fn list_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<BlogResponse>>> {
    let blogs = BlogService::list_all(state.blogs()).await?;
    Ok(Json(blogs))
}

/// GET /api/blogs/stats - likes and author aggregates
async fn blog_statistics(State(state): State<AppState>) -> ApiResult<Json<BlogStatistics>> {
    let stats = BlogService::statistics(state.blogs()).await?;
    Ok(Json(stats))
}

/// POST /api/blogs - create a blog owned by the caller
///
/// # Authentication
/// Requires valid Bearer token in Authorization header.
async fn create_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateBlogRequest>,
) -> ApiResult<(StatusCode, Json<BlogResponse>)> {
    let blog = BlogService::create(state.blogs(), &auth, req).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// PUT /api/blogs/:id - update the fields present in the body
///
/// Whether a token is needed depends on `blogs.update_requires_owner`.
async fn update_blog(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateBlogRequest>,
) -> ApiResult<Json<BlogResponse>> {
    let blog = BlogService::update(
        state.blogs(),
        &state.config().blogs,
        auth.as_ref(),
        &id,
        req,
    )
    .await?;
    Ok(Json(blog))
}

/// DELETE /api/blogs/:id - owner only
async fn delete_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    BlogService::remove(state.blogs(), &auth, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
