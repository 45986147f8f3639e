//! User service for registration, credential checks and login
//!
//! Password hashing and verification run on the blocking thread pool; the
//! token service is passed by reference (pre-computed keys).

use crate::auth::{PasswordService, TokenService};
use crate::error::ApiError;
use crate::repositories::{BlogRecord, BlogRepository, NewUser, UserRecord, UserRepository};
use crate::services::blog::parse_id;
use bloglist_shared::validation::validate_registration;
use bloglist_shared::{AuthError, LoginRequest, LoginResponse, RegisterRequest, UserBlog, UserResponse};
use metrics::counter;
use secrecy::SecretString;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// Username uniqueness is left to the store so two concurrent
    /// registrations cannot both succeed.
    pub async fn register(
        users: &dyn UserRepository,
        req: RegisterRequest,
    ) -> Result<UserResponse, ApiError> {
        validate_registration(&req)?;

        let password = SecretString::new(req.password.unwrap_or_default());
        let password_hash = PasswordService::hash_async(password)
            .await
            .map_err(ApiError::Internal)?;

        let user = users
            .create(NewUser {
                username: req.username,
                name: req.name,
                password_hash,
            })
            .await?;

        counter!("bloglist_users_registered_total").increment(1);
        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(to_user_response(user, Vec::new()))
    }

    /// Check a username/password pair
    ///
    /// An unknown username and a wrong password produce the same error, and
    /// both cost one hash verification.
    pub async fn verify_credentials(
        users: &dyn UserRepository,
        username: &str,
        password: SecretString,
    ) -> Result<UserRecord, ApiError> {
        let Some(user) = users.find_by_username(username).await? else {
            PasswordService::verify_dummy(password).await;
            return Err(AuthError::InvalidCredentials.into());
        };

        let valid = PasswordService::verify_async(password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user)
    }

    /// Log in and issue a bearer token
    pub async fn login(
        users: &dyn UserRepository,
        tokens: &TokenService,
        req: LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        let password = SecretString::new(req.password);
        let user = match Self::verify_credentials(users, &req.username, password).await {
            Ok(user) => user,
            Err(err) => {
                counter!("bloglist_logins_total", "outcome" => "rejected").increment(1);
                warn!(username = %req.username, "Login rejected");
                return Err(err);
            }
        };

        let token = tokens
            .issue(user.id, &user.username)
            .map_err(ApiError::Internal)?;

        counter!("bloglist_logins_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            username: user.username,
            name: user.name,
        })
    }

    /// Look up one user, with their blogs
    pub async fn find_by_id(
        users: &dyn UserRepository,
        blogs: &dyn BlogRepository,
        id: &str,
    ) -> Result<UserResponse, ApiError> {
        let id = parse_id(id)?;
        let user = users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
        let owned = blogs.list_by_owner(id).await?;

        Ok(to_user_response(user, owned))
    }

    /// Every user with their blogs, in creation order
    pub async fn list(
        users: &dyn UserRepository,
        blogs: &dyn BlogRepository,
    ) -> Result<Vec<UserResponse>, ApiError> {
        let all_users = users.list().await?;

        let mut by_owner: HashMap<Uuid, Vec<BlogRecord>> = HashMap::new();
        for blog in blogs.list().await? {
            by_owner.entry(blog.user_id).or_default().push(blog);
        }

        Ok(all_users
            .into_iter()
            .map(|user| {
                let owned = by_owner.remove(&user.id).unwrap_or_default();
                to_user_response(user, owned)
            })
            .collect())
    }
}

fn to_user_response(user: UserRecord, blogs: Vec<BlogRecord>) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        name: user.name,
        blogs: blogs
            .into_iter()
            .map(|blog| UserBlog {
                id: blog.id,
                title: blog.title,
                author: blog.author,
                url: blog.url,
                likes: blog.likes,
            })
            .collect(),
    }
}
