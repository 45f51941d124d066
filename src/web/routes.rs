use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Form;
use axum::Router;
use serde::Deserialize;

use super::templates;
use super::AppState;
use crate::db::{
    get_category_by_slug, get_comments_for_post, get_cool_user, get_cool_user_by_username,
    get_post, insert_comment, list_authors, list_categories, list_posts_by_author,
    list_posts_by_category, list_published_posts, list_recent_posts, post_activity, Comment,
    CommentStatus, NewComment,
};
use crate::stats;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/posts", get(posts_list))
        .route("/posts/:id", get(post_detail))
        .route("/posts/:id/comments", post(add_comment))
        .route("/trending", get(trending_posts))
        .route("/authors", get(authors_list))
        .route("/authors/:username", get(author_detail))
        .route("/categories/:slug", get(category_detail))
        .route("/healthz", get(health))
}

async fn home(State(state): State<AppState>) -> Response {
    let categories = match list_categories(state.db.pool()).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to fetch categories: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };
    let posts = match list_recent_posts(state.db.pool(), 5).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to fetch recent posts: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    Html(templates::render_home(&categories, &posts)).into_response()
}

async fn posts_list(State(state): State<AppState>) -> Response {
    match list_published_posts(state.db.pool(), 20).await {
        Ok(posts) => Html(templates::render_posts_list("Posts", &posts)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch posts: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

async fn post_detail(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let post = match get_post(state.db.pool(), id).await {
        Ok(Some(p)) => p,
        Ok(None) => return (StatusCode::NOT_FOUND, "Post not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch post: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let author = match get_cool_user(state.db.pool(), post.author_id).await {
        Ok(Some(a)) => a,
        Ok(None) => return (StatusCode::NOT_FOUND, "Author not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch author: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let category = match crate::db::get_category(state.db.pool(), post.category_id).await {
        Ok(Some(c)) => c,
        Ok(None) => return (StatusCode::NOT_FOUND, "Category not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch category: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let comments = match get_comments_for_post(state.db.pool(), id, Some(CommentStatus::Published))
        .await
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to fetch comments: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let analyzer = stats::analyze(&comments);
    let top: Vec<(Comment, i64)> = analyzer
        .top(state.config.top_comments)
        .map(|(c, s)| (c.clone(), s))
        .collect();

    Html(templates::render_post_detail(
        &post, &author, &category, &comments, &top,
    ))
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    username: String,
    body: String,
    votes: Option<i64>,
}

async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Response {
    let post = match get_post(state.db.pool(), id).await {
        Ok(Some(p)) => p,
        Ok(None) => return (StatusCode::NOT_FOUND, "Post not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch post: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    if form.body.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Comment body cannot be empty").into_response();
    }

    let author = match get_cool_user_by_username(state.db.pool(), form.username.trim()).await {
        Ok(Some(a)) => a,
        Ok(None) => return (StatusCode::BAD_REQUEST, "Unknown username").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch author: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let new_comment = NewComment {
        body: form.body,
        status: CommentStatus::Published,
        votes: form.votes.unwrap_or(10),
        author_id: Some(author.id),
        post_id: post.id,
    };

    if let Err(e) = insert_comment(state.db.pool(), &new_comment).await {
        tracing::error!("Failed to insert comment: {e}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
    }

    Redirect::to(&format!("/posts/{id}")).into_response()
}

async fn trending_posts(State(state): State<AppState>) -> Response {
    let rows = match post_activity(state.db.pool()).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch post activity: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let ranked = stats::trending(
        rows,
        state.config.trending_threshold,
        state.config.trending_limit,
    );

    Html(templates::render_trending(&ranked)).into_response()
}

async fn authors_list(State(state): State<AppState>) -> Response {
    match list_authors(state.db.pool()).await {
        Ok(authors) => Html(templates::render_authors(&authors)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch authors: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

async fn author_detail(State(state): State<AppState>, Path(username): Path<String>) -> Response {
    let author = match get_cool_user_by_username(state.db.pool(), &username).await {
        Ok(Some(a)) => a,
        Ok(None) => return (StatusCode::NOT_FOUND, "Author not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch author: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let posts = match list_posts_by_author(state.db.pool(), author.id, 20).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to fetch author posts: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    Html(templates::render_author_detail(&author, &posts)).into_response()
}

async fn category_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let category = match get_category_by_slug(state.db.pool(), &slug).await {
        Ok(Some(c)) => c,
        Ok(None) => return (StatusCode::NOT_FOUND, "Category not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch category: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    let posts = match list_posts_by_category(state.db.pool(), category.id, 20).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to fetch category posts: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    };

    Html(templates::render_posts_list(&category.label, &posts)).into_response()
}

async fn health() -> &'static str {
    "OK"
}
