//! Blog repository for database operations
//!
//! Every read joins the owning user so callers get `owner_username` and
//! `owner_name` without a second query.

use super::{BlogChanges, BlogRecord, BlogRepository, NewBlog, StoreResult};
use crate::db;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Postgres-backed blog store
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn list(&self) -> StoreResult<Vec<BlogRecord>> {
        let records = sqlx::query_as::<_, BlogRecord>(
            r#"
            SELECT b.id, b.title, b.author, b.url, b.likes, b.user_id, b.created_at,
                   u.username AS owner_username, u.name AS owner_name
            FROM blogs b
            JOIN users u ON u.id = b.user_id
            ORDER BY b.created_at, b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<BlogRecord>> {
        let records = sqlx::query_as::<_, BlogRecord>(
            r#"
            SELECT b.id, b.title, b.author, b.url, b.likes, b.user_id, b.created_at,
                   u.username AS owner_username, u.name AS owner_name
            FROM blogs b
            JOIN users u ON u.id = b.user_id
            WHERE b.user_id = $1
            ORDER BY b.created_at, b.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<BlogRecord>> {
        let record = sqlx::query_as::<_, BlogRecord>(
            r#"
            SELECT b.id, b.title, b.author, b.url, b.likes, b.user_id, b.created_at,
                   u.username AS owner_username, u.name AS owner_name
            FROM blogs b
            JOIN users u ON u.id = b.user_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn create(&self, blog: NewBlog) -> StoreResult<BlogRecord> {
        let record = sqlx::query_as::<_, BlogRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO blogs (id, title, author, url, likes, user_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, title, author, url, likes, user_id, created_at
            )
            SELECT i.id, i.title, i.author, i.url, i.likes, i.user_id, i.created_at,
                   u.username AS owner_username, u.name AS owner_name
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: BlogChanges,
    ) -> StoreResult<Option<BlogRecord>> {
        let author_given = changes.author.is_some();
        let record = sqlx::query_as::<_, BlogRecord>(
            r#"
            WITH updated AS (
                UPDATE blogs SET
                    title = COALESCE($3, title),
                    author = CASE WHEN $7 THEN $4 ELSE author END,
                    url = COALESCE($5, url),
                    likes = COALESCE($6, likes)
                WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)
                RETURNING id, title, author, url, likes, user_id, created_at
            )
            SELECT up.id, up.title, up.author, up.url, up.likes, up.user_id, up.created_at,
                   u.username AS owner_username, u.name AS owner_name
            FROM updated up
            JOIN users u ON u.id = up.user_id
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.author.flatten())
        .bind(changes.url)
        .bind(changes.likes)
        .bind(author_given)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM blogs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        db::health_check(&self.pool).await?;
        Ok(())
    }
}
