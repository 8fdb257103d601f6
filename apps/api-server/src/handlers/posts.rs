//! Post endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::domain::{NewPost, PartialAuthor, Post, PostChanges, PostView};
use blog_core::ports::{BaseRepository, PostRepository};
use blog_shared::dto::{AuthorPayload, CreatePostRequest, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn partial_author(payload: AuthorPayload) -> PartialAuthor {
    PartialAuthor {
        first_name: payload.first_name,
        last_name: payload.last_name,
    }
}

/// Creation fields as received. Presence is checked by [`Post::new`].
fn new_post(req: CreatePostRequest) -> NewPost {
    NewPost {
        title: req.title,
        author: req.author.map(partial_author),
        content: req.content,
        created: None,
    }
}

fn post_changes(req: UpdatePostRequest) -> PostChanges {
    PostChanges {
        title: req.title,
        author: req.author.map(partial_author),
        content: req.content,
    }
}

fn not_found(id: Uuid) -> AppError {
    DomainError::NotFound {
        entity_type: "Post",
        id,
    }
    .into()
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all().await?;
    let body: Vec<PostView> = posts.iter().map(Post::serialize).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

    Ok(HttpResponse::Ok().json(post.serialize()))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.insert(new_post(body.into_inner())).await?;
    tracing::info!(post_id = %post.id, "Post created");

    Ok(HttpResponse::Created().json(post.serialize()))
}

/// PUT /posts/{id}
///
/// The body must repeat the path id. Only the fields present in the body are
/// changed.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let body_id = req.id.as_deref().and_then(|s| Uuid::parse_str(s).ok());
    if body_id != Some(id) {
        let message = format!(
            "Request path id ({}) and request body id ({}) must match",
            id,
            req.id.as_deref().unwrap_or("missing")
        );
        tracing::warn!("{}", message);
        return Err(AppError::BadRequest(message));
    }

    state
        .posts
        .update_by_id(id, post_changes(req))
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(post_id = %id, "Post updated");

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete_by_id(id).await?;
    tracing::info!(post_id = %id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}
