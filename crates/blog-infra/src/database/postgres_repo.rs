//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use blog_core::domain::{NewPost, Post, PostChanges};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

use super::connections::DatabaseConnections;
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

impl From<DatabaseConnections> for PostgresPostRepository {
    fn from(connections: DatabaseConnections) -> Self {
        Self::new(connections.main)
    }
}

impl PostgresPostRepository {
    /// Remove every post. Used to reset an isolated test database.
    pub async fn clear(&self) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        tracing::warn!(rows = result.rows_affected, "Cleared posts table");
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Created)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, fields: NewPost) -> Result<Post, RepoError> {
        let post = Post::new(fields)?;
        tracing::debug!(post_id = %post.id, "Inserting post");

        self.save(post).await
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        changes.validate()?;

        if changes.is_empty() {
            tracing::debug!(post_id = %id, "Empty update, returning stored post");
            return self.find_by_id(id).await;
        }

        let mut update = PostEntity::update_many().filter(post::Column::Id.eq(id));
        if let Some(title) = changes.title {
            update = update.col_expr(post::Column::Title, Expr::value(title));
        }
        if let Some(content) = changes.content {
            update = update.col_expr(post::Column::Content, Expr::value(content));
        }
        if let Some(author) = changes.author {
            if let Some(first_name) = author.first_name {
                update = update.col_expr(post::Column::AuthorFirstName, Expr::value(first_name));
            }
            if let Some(last_name) = author.last_name {
                update = update.col_expr(post::Column::AuthorLastName, Expr::value(last_name));
            }
        }

        let updated = update
            .exec_with_returning(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }
}
