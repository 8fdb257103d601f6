//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::PostRepository;
use blog_infra::database::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use blog_infra::database::{DatabaseConnections, PostgresPostRepository};

/// Which store backs the post repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub store: StoreKind,
    /// Owner of the database pool, kept so it can be closed at shutdown.
    #[cfg(feature = "postgres")]
    pool: Option<Arc<PostgresPostRepository>>,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// the database cannot be reached.
    pub async fn new(db_config: &DatabaseConfig) -> Self {
        #[cfg(feature = "postgres")]
        let state = match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                Self::postgres(Arc::new(PostgresPostRepository::from(connections)))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory(Arc::new(InMemoryPostRepository::new()))
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            tracing::info!(
                url = %db_config.url,
                "Running without postgres feature - using in-memory repository"
            );
            Self::in_memory(Arc::new(InMemoryPostRepository::new()))
        };

        tracing::info!(store = state.store.as_str(), "Application state initialized");
        state
    }

    /// State over a PostgreSQL repository that owns its pool.
    #[cfg(feature = "postgres")]
    pub fn postgres(repo: Arc<PostgresPostRepository>) -> Self {
        Self {
            posts: repo.clone(),
            store: StoreKind::Postgres,
            pool: Some(repo),
        }
    }

    /// State over an in-memory store owned by the caller.
    pub fn in_memory(repo: Arc<InMemoryPostRepository>) -> Self {
        Self {
            posts: repo,
            store: StoreKind::Memory,
            #[cfg(feature = "postgres")]
            pool: None,
        }
    }

    /// Release the database pool. Call once, after the server has stopped
    /// and every other handle on the repository has been dropped.
    pub async fn close(self) {
        #[cfg(feature = "postgres")]
        {
            let AppState { posts, pool, .. } = self;
            drop(posts);

            let Some(pool) = pool else {
                return;
            };

            match Arc::try_unwrap(pool) {
                Ok(repo) => {
                    if let Err(e) = repo.close().await {
                        tracing::error!("Failed to close database connection: {}", e);
                    }
                }
                Err(_) => tracing::warn!("Database still in use at shutdown; leaving pool to drop"),
            }
        }

        #[cfg(not(feature = "postgres"))]
        drop(self);
    }
}
