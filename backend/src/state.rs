//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction. Everything in it
//! is built once at startup and read-only afterwards.

use crate::auth::TokenService;
use crate::config::{AppConfig, StorageBackend};
use crate::repositories::{
    BlogRepository, InMemoryStore, PgBlogRepository, PgUserRepository, UserRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Storage adapters behind the repository ports
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub blogs: Arc<dyn BlogRepository>,
}

impl Stores {
    /// Postgres-backed stores sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            blogs: Arc::new(PgBlogRepository::new(pool)),
        }
    }

    /// A fresh, empty process-local store
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            blogs: Arc::new(store),
        }
    }

    /// Which backend a config asks for; `pool` is only used for Postgres
    pub fn for_backend(backend: StorageBackend, pool: Option<PgPool>) -> anyhow::Result<Self> {
        match (backend, pool) {
            (StorageBackend::Memory, _) => Ok(Self::in_memory()),
            (StorageBackend::Postgres, Some(pool)) => Ok(Self::postgres(pool)),
            (StorageBackend::Postgres, None) => {
                anyhow::bail!("Postgres storage selected but no database pool was created")
            }
        }
    }
}

/// Shared application state
///
/// All fields are cheap to clone (`Arc` or `Arc`-backed).
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token service with pre-computed keys
    pub tokens: TokenService,
    /// Renders `/metrics`; absent when no recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the signing keys from the configured secret, so call this
    /// once at startup.
    pub fn new(stores: Stores, config: AppConfig) -> Self {
        let tokens = TokenService::new(&config.jwt.secret, config.jwt.token_expiry_secs);

        Self {
            stores,
            config: Arc::new(config),
            tokens,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn users(&self) -> &dyn UserRepository {
        self.stores.users.as_ref()
    }

    #[inline]
    pub fn blogs(&self) -> &dyn BlogRepository {
        self.stores.blogs.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
