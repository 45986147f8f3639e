//! Data access layer
//!
//! Services talk to storage through the [`UserRepository`] and
//! [`BlogRepository`] ports. Two adapters implement them: Postgres via
//! `sqlx`, and a process-local store used by tests and throwaway
//! deployments.
//!
//! A blog's `user_id` is the only link between the two collections. A
//! user's blogs are always looked up by owner, never stored on the user.

pub mod blog;
pub mod memory;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub use blog::PgBlogRepository;
pub use memory::InMemoryStore;
pub use user::PgUserRepository;

/// Storage failures, already classified for the service layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate value for unique field `{field}`")]
    UniqueViolation { field: &'static str },

    /// A write referenced a row that does not exist (e.g. a deleted owner)
    #[error("{0} does not exist")]
    MissingReference(&'static str),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some("users_username_key") => "username",
                    _ => "id",
                };
                return StoreError::UniqueViolation { field };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference("user");
            }
        }
        StoreError::Backend(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User record from storage
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Blog record joined with its owner's public fields
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct BlogRecord {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_name: Option<String>,
}

/// Input for creating a blog
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user_id: Uuid,
}

/// Field changes for a blog; `None` leaves the stored value alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogChanges {
    pub title: Option<String>,
    /// `Some(None)` clears the byline
    pub author: Option<Option<String>>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Persistence port for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with [`StoreError::UniqueViolation`] when the
    /// username is taken; the check and the insert are one atomic step.
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    /// All users in creation order
    async fn list(&self) -> StoreResult<Vec<UserRecord>>;
}

/// Persistence port for blogs
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// All blogs in creation order
    async fn list(&self) -> StoreResult<Vec<BlogRecord>>;

    /// Blogs owned by one user, in creation order
    async fn list_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<BlogRecord>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<BlogRecord>>;

    /// Insert a blog. Fails with [`StoreError::MissingReference`] when the
    /// owner does not exist.
    async fn create(&self, blog: NewBlog) -> StoreResult<BlogRecord>;

    /// Apply `changes` to a blog. When `owner` is given the write only
    /// happens if the blog still belongs to that user. Returns `None` when
    /// nothing matched.
    async fn update(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: BlogChanges,
    ) -> StoreResult<Option<BlogRecord>>;

    /// Delete a blog if it belongs to `owner`. Returns whether a row was
    /// removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;

    /// Storage liveness probe
    async fn ping(&self) -> StoreResult<()>;
}
