//! In-memory store
//!
//! Implements both repository ports over one lock, so a user's blogs and
//! the blogs' owners can never disagree. Each instance is isolated, which
//! lets tests run in parallel without sharing state.

use super::{
    BlogChanges, BlogRecord, BlogRepository, NewBlog, NewUser, StoreError, StoreResult,
    UserRecord, UserRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Stored blog without the joined owner fields
#[derive(Debug, Clone)]
struct StoredBlog {
    id: Uuid,
    title: String,
    author: Option<String>,
    url: String,
    likes: i64,
    user_id: Uuid,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Collections {
    users: Vec<UserRecord>,
    blogs: Vec<StoredBlog>,
}

impl Collections {
    fn join(&self, blog: &StoredBlog) -> Option<BlogRecord> {
        let owner = self.users.iter().find(|u| u.id == blog.user_id)?;
        Some(BlogRecord {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user_id: blog.user_id,
            created_at: blog.created_at,
            owner_username: owner.username.clone(),
            owner_name: owner.name.clone(),
        })
    }
}

/// Process-local store shared by cheap clones
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut data = self.inner.write().await;

        if data.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation { field: "username" });
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        data.users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.inner.read().await.users.clone())
    }
}

#[async_trait]
impl BlogRepository for InMemoryStore {
    async fn list(&self) -> StoreResult<Vec<BlogRecord>> {
        let data = self.inner.read().await;
        Ok(data.blogs.iter().filter_map(|b| data.join(b)).collect())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<BlogRecord>> {
        let data = self.inner.read().await;
        Ok(data
            .blogs
            .iter()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| data.join(b))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<BlogRecord>> {
        let data = self.inner.read().await;
        Ok(data
            .blogs
            .iter()
            .find(|b| b.id == id)
            .and_then(|b| data.join(b)))
    }

    async fn create(&self, blog: NewBlog) -> StoreResult<BlogRecord> {
        let mut data = self.inner.write().await;

        let stored = StoredBlog {
            id: Uuid::new_v4(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user_id: blog.user_id,
            created_at: Utc::now(),
        };
        let record = data
            .join(&stored)
            .ok_or(StoreError::MissingReference("user"))?;
        data.blogs.push(stored);
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: BlogChanges,
    ) -> StoreResult<Option<BlogRecord>> {
        let mut data = self.inner.write().await;

        let Some(blog) = data
            .blogs
            .iter_mut()
            .find(|b| b.id == id && owner.map_or(true, |o| b.user_id == o))
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            blog.title = title;
        }
        if let Some(author) = changes.author {
            blog.author = author;
        }
        if let Some(url) = changes.url {
            blog.url = url;
        }
        if let Some(likes) = changes.likes {
            blog.likes = likes;
        }

        let updated = blog.clone();
        Ok(data.join(&updated))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.blogs.len();
        data.blogs.retain(|b| !(b.id == id && b.user_id == owner));
        Ok(data.blogs.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            name: Some(format!("{username} name")),
            password_hash: "hash".to_string(),
        }
    }

    fn new_blog(title: &str, user_id: Uuid) -> NewBlog {
        NewBlog {
            title: title.to_string(),
            author: None,
            url: format!("https://example.com/{title}"),
            likes: 0,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryStore::new();
        UserRepository::create(&store, new_user("user1")).await.unwrap();

        let err = UserRepository::create(&store, new_user("user1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { field: "username" }));
        assert_eq!(UserRepository::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_admit_one() {
        let store = InMemoryStore::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { UserRepository::create(&store, new_user("racer")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_blog_joins_owner() {
        let store = InMemoryStore::new();
        let user = UserRepository::create(&store, new_user("owner")).await.unwrap();

        let blog = BlogRepository::create(&store, new_blog("T", user.id))
            .await
            .unwrap();
        assert_eq!(blog.owner_username, "owner");
        assert_eq!(blog.owner_name.as_deref(), Some("owner name"));
    }

    #[tokio::test]
    async fn test_blog_for_unknown_owner_rejected() {
        let store = InMemoryStore::new();
        let err = BlogRepository::create(&store, new_blog("T", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference("user")));
        assert!(BlogRepository::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let store = InMemoryStore::new();
        let alice = UserRepository::create(&store, new_user("alice")).await.unwrap();
        let bob = UserRepository::create(&store, new_user("bob")).await.unwrap();
        BlogRepository::create(&store, new_blog("a1", alice.id)).await.unwrap();
        BlogRepository::create(&store, new_blog("b1", bob.id)).await.unwrap();
        BlogRepository::create(&store, new_blog("a2", alice.id)).await.unwrap();

        let titles: Vec<_> = store
            .list_by_owner(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_update_respects_owner_guard() {
        let store = InMemoryStore::new();
        let alice = UserRepository::create(&store, new_user("alice")).await.unwrap();
        let blog = BlogRepository::create(&store, new_blog("T", alice.id))
            .await
            .unwrap();
        let changes = BlogChanges {
            likes: Some(9),
            ..Default::default()
        };

        let denied = store
            .update(blog.id, Some(Uuid::new_v4()), changes.clone())
            .await
            .unwrap();
        assert!(denied.is_none());

        let updated = store
            .update(blog.id, Some(alice.id), changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.likes, 9);
        assert_eq!(updated.title, "T");
    }

    #[tokio::test]
    async fn test_delete_owned_only_removes_own_blog() {
        let store = InMemoryStore::new();
        let alice = UserRepository::create(&store, new_user("alice")).await.unwrap();
        let blog = BlogRepository::create(&store, new_blog("T", alice.id))
            .await
            .unwrap();

        assert!(!store.delete_owned(blog.id, Uuid::new_v4()).await.unwrap());
        assert!(BlogRepository::find_by_id(&store, blog.id).await.unwrap().is_some());

        assert!(store.delete_owned(blog.id, alice.id).await.unwrap());
        assert!(BlogRepository::find_by_id(&store, blog.id).await.unwrap().is_none());
        assert!(store.list_by_owner(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_and_clears_author() {
        let store = InMemoryStore::new();
        let alice = UserRepository::create(&store, new_user("alice")).await.unwrap();
        let blog = BlogRepository::create(&store, new_blog("T", alice.id))
            .await
            .unwrap();

        let named = BlogChanges {
            author: Some(Some("Byline".to_string())),
            ..Default::default()
        };
        let updated = store.update(blog.id, None, named).await.unwrap().unwrap();
        assert_eq!(updated.author.as_deref(), Some("Byline"));

        let untouched = store
            .update(blog.id, None, BlogChanges::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.author.as_deref(), Some("Byline"));

        let cleared = BlogChanges {
            author: Some(None),
            ..Default::default()
        };
        let updated = store.update(blog.id, None, cleared).await.unwrap().unwrap();
        assert_eq!(updated.author, None);
    }
}
