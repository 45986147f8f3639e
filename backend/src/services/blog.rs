//! Blog service
//!
//! Validation and ownership rules for blog mutations. A blog's owner is
//! stored on the blog only; the owner's list of blogs is derived from it,
//! so creating or deleting a blog is a single write.

use crate::auth::AuthUser;
use crate::config::BlogPolicyConfig;
use crate::error::ApiError;
use crate::repositories::{BlogChanges, BlogRecord, BlogRepository, NewBlog};
use bloglist_shared::stats;
use bloglist_shared::validation::{validate_blog_update, validate_new_blog};
use bloglist_shared::{
    AuthError, BlogOwner, BlogResponse, BlogStatistics, CreateBlogRequest, UpdateBlogRequest,
};
use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

/// Parse a path identifier
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("invalid id".to_string()))
}

impl From<BlogRecord> for BlogResponse {
    fn from(record: BlogRecord) -> Self {
        BlogResponse {
            id: record.id,
            title: record.title,
            author: record.author,
            url: record.url,
            likes: record.likes,
            user: BlogOwner {
                id: record.user_id,
                username: record.owner_username,
                name: record.owner_name,
            },
        }
    }
}

impl From<UpdateBlogRequest> for BlogChanges {
    fn from(req: UpdateBlogRequest) -> Self {
        BlogChanges {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}

/// Blog service for business logic
pub struct BlogService;

impl BlogService {
    /// Every blog, enriched with its owner
    pub async fn list_all(blogs: &dyn BlogRepository) -> Result<Vec<BlogResponse>, ApiError> {
        Ok(blogs
            .list()
            .await?
            .into_iter()
            .map(BlogResponse::from)
            .collect())
    }

    /// Aggregates over every blog
    pub async fn statistics(blogs: &dyn BlogRepository) -> Result<BlogStatistics, ApiError> {
        let all = Self::list_all(blogs).await?;
        Ok(stats::statistics(&all))
    }

    /// Create a blog owned by the caller
    pub async fn create(
        blogs: &dyn BlogRepository,
        owner: &AuthUser,
        req: CreateBlogRequest,
    ) -> Result<BlogResponse, ApiError> {
        validate_new_blog(&req)?;

        let record = blogs
            .create(NewBlog {
                title: req.title.unwrap_or_default(),
                author: req.author,
                url: req.url.unwrap_or_default(),
                likes: req.likes.unwrap_or(0),
                user_id: owner.id,
            })
            .await?;

        counter!("bloglist_blogs_created_total").increment(1);
        info!(blog_id = %record.id, user_id = %owner.id, "Blog created");

        Ok(record.into())
    }

    /// Delete a blog; only its owner may do so
    pub async fn remove(
        blogs: &dyn BlogRepository,
        caller: &AuthUser,
        id: &str,
    ) -> Result<(), ApiError> {
        let id = parse_id(id)?;
        let blog = blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("blog not found".to_string()))?;

        if blog.user_id != caller.id {
            warn!(blog_id = %id, user_id = %caller.id, "Delete by non-owner refused");
            return Err(ApiError::Forbidden(
                "only the creator can delete a blog".to_string(),
            ));
        }

        // Guarded by owner as well, in case the blog changed hands or
        // vanished since the lookup
        if !blogs.delete_owned(id, caller.id).await? {
            return Err(ApiError::NotFound("blog not found".to_string()));
        }

        counter!("bloglist_blogs_deleted_total").increment(1);
        info!(blog_id = %id, user_id = %caller.id, "Blog deleted");

        Ok(())
    }

    /// Update the fields present in `req`
    ///
    /// With `policy.update_requires_owner` the caller must own the blog;
    /// otherwise anyone, authenticated or not, may update it.
    pub async fn update(
        blogs: &dyn BlogRepository,
        policy: &BlogPolicyConfig,
        caller: Option<&AuthUser>,
        id: &str,
        req: UpdateBlogRequest,
    ) -> Result<BlogResponse, ApiError> {
        let id = parse_id(id)?;
        validate_blog_update(&req)?;

        let owner_guard = if policy.update_requires_owner {
            let caller = caller.ok_or(AuthError::MissingToken)?;
            let blog = blogs
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::NotFound("blog not found".to_string()))?;

            if blog.user_id != caller.id {
                warn!(blog_id = %id, user_id = %caller.id, "Update by non-owner refused");
                return Err(ApiError::Forbidden(
                    "only the creator can update a blog".to_string(),
                ));
            }
            Some(caller.id)
        } else {
            None
        };

        let record = blogs
            .update(id, owner_guard, req.into())
            .await?
            .ok_or_else(|| ApiError::NotFound("blog not found".to_string()))?;

        counter!("bloglist_blogs_updated_total").increment(1);
        info!(blog_id = %id, "Blog updated");

        Ok(record.into())
    }
}
