use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{
    AuthorDisplay, Category, CategoryDisplay, Comment, CommentStatus, CoolUser, NewCategory,
    NewComment, NewCoolUser, NewPost, Post, PostActivity, PostStatus,
};

// ========== Cool Users ==========

/// Get an author by id.
pub async fn get_cool_user(pool: &SqlitePool, id: i64) -> Result<Option<CoolUser>> {
    sqlx::query_as("SELECT * FROM cool_users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch cool user by id")
}

/// Get an author by username.
pub async fn get_cool_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<CoolUser>> {
    sqlx::query_as("SELECT * FROM cool_users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch cool user by username")
}

/// Insert a new author, returning their ID.
pub async fn insert_cool_user(pool: &SqlitePool, user: &NewCoolUser) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO cool_users (username, email, first_name, last_name, github_profile)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.github_profile)
    .execute(pool)
    .await
    .context("Failed to insert cool user")?;

    Ok(result.last_insert_rowid())
}

/// Update an author's account and enrichment fields, refreshing `last_update`.
pub async fn update_cool_user(pool: &SqlitePool, user: &CoolUser) -> Result<()> {
    sqlx::query(
        r"
        UPDATE cool_users
        SET email = ?, first_name = ?, last_name = ?,
            gravatar_link = ?, gravatar_updated_at = ?,
            github_profile = ?, github_repos = ?, github_stars = ?,
            last_github_check = ?, last_update = datetime('now')
        WHERE id = ?
        ",
    )
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.gravatar_link)
    .bind(&user.gravatar_updated_at)
    .bind(&user.github_profile)
    .bind(user.github_repos)
    .bind(user.github_stars)
    .bind(&user.last_github_check)
    .bind(user.id)
    .execute(pool)
    .await
    .context("Failed to update cool user")?;

    Ok(())
}

/// List all authors with their post counts.
pub async fn list_authors(pool: &SqlitePool) -> Result<Vec<AuthorDisplay>> {
    sqlx::query_as(
        r"
        SELECT u.*, COUNT(p.id) AS post_count
        FROM cool_users u
        LEFT JOIN posts p ON p.author_id = u.id
        GROUP BY u.id
        ORDER BY u.username
        ",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list authors")
}

/// Delete an author. Their posts cascade; their comments are orphaned.
pub async fn delete_cool_user(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM cool_users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete cool user")?;

    Ok(())
}

// ========== Categories ==========

/// Get a category by id.
pub async fn get_category(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
    sqlx::query_as("SELECT * FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch category by id")
}

/// Get a category by slug.
pub async fn get_category_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Category>> {
    sqlx::query_as("SELECT * FROM categories WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch category by slug")
}

/// Insert a new category, returning its ID.
pub async fn insert_category(pool: &SqlitePool, category: &NewCategory) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO categories (label, slug, created_by)
        VALUES (?, ?, ?)
        ",
    )
    .bind(&category.label)
    .bind(&category.slug)
    .bind(category.created_by)
    .execute(pool)
    .await
    .context("Failed to insert category")?;

    Ok(result.last_insert_rowid())
}

/// List all categories with their post counts.
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<CategoryDisplay>> {
    sqlx::query_as(
        r"
        SELECT c.*, COUNT(p.id) AS post_count
        FROM categories c
        LEFT JOIN posts p ON p.category_id = c.id
        GROUP BY c.id
        ORDER BY c.label
        ",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list categories")
}

/// Delete a category. Its posts (and their comments) cascade.
pub async fn delete_category(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?;

    Ok(())
}

// ========== Posts ==========

/// Get a post by id.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    sqlx::query_as("SELECT * FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post by id")
}

/// Insert a new post, returning its ID.
pub async fn insert_post(pool: &SqlitePool, post: &NewPost) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO posts (title, body, image_link, status, author_id, category_id, publish_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(&post.title)
    .bind(&post.body)
    .bind(&post.image_link)
    .bind(post.status.as_str())
    .bind(post.author_id)
    .bind(post.category_id)
    .bind(&post.publish_date)
    .execute(pool)
    .await
    .context("Failed to insert post")?;

    Ok(result.last_insert_rowid())
}

/// Update an existing post's content, refreshing `last_update`.
pub async fn update_post(pool: &SqlitePool, id: i64, post: &NewPost) -> Result<()> {
    sqlx::query(
        r"
        UPDATE posts
        SET title = ?, body = ?, image_link = ?, status = ?,
            author_id = ?, category_id = ?, publish_date = ?,
            last_update = datetime('now')
        WHERE id = ?
        ",
    )
    .bind(&post.title)
    .bind(&post.body)
    .bind(&post.image_link)
    .bind(post.status.as_str())
    .bind(post.author_id)
    .bind(post.category_id)
    .bind(&post.publish_date)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(())
}

/// List the most recent posts regardless of status.
pub async fn list_recent_posts(pool: &SqlitePool, limit: i64) -> Result<Vec<Post>> {
    sqlx::query_as("SELECT * FROM posts ORDER BY creation_date DESC, id DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to list recent posts")
}

/// List published posts, most recently updated first.
pub async fn list_published_posts(pool: &SqlitePool, limit: i64) -> Result<Vec<Post>> {
    sqlx::query_as(
        r"
        SELECT * FROM posts
        WHERE status = ?
        ORDER BY last_update DESC, id DESC
        LIMIT ?
        ",
    )
    .bind(PostStatus::Published.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to list published posts")
}

/// List an author's published posts, newest first.
pub async fn list_posts_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: i64,
) -> Result<Vec<Post>> {
    sqlx::query_as(
        r"
        SELECT * FROM posts
        WHERE author_id = ? AND status = ?
        ORDER BY last_update DESC, id DESC
        LIMIT ?
        ",
    )
    .bind(author_id)
    .bind(PostStatus::Published.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to list posts by author")
}

/// List a category's published posts, newest first.
pub async fn list_posts_by_category(
    pool: &SqlitePool,
    category_id: i64,
    limit: i64,
) -> Result<Vec<Post>> {
    sqlx::query_as(
        r"
        SELECT * FROM posts
        WHERE category_id = ? AND status = ?
        ORDER BY last_update DESC, id DESC
        LIMIT ?
        ",
    )
    .bind(category_id)
    .bind(PostStatus::Published.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to list posts by category")
}

/// Fetch dedup candidates: posts sharing an exact title.
///
/// Externally-sourced posts are compared field-by-field with
/// [`NewPost::content_equals`] after this narrowing query.
pub async fn find_posts_by_title(pool: &SqlitePool, title: &str) -> Result<Vec<Post>> {
    sqlx::query_as("SELECT * FROM posts WHERE title = ?")
        .bind(title)
        .fetch_all(pool)
        .await
        .context("Failed to fetch posts by title")
}

/// Delete a post. Its comments cascade.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(())
}

/// Count all posts.
pub async fn count_posts(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;

    Ok(row.0)
}

// ========== Comments ==========

/// Insert a new comment, returning its ID.
pub async fn insert_comment(pool: &SqlitePool, comment: &NewComment) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO comments (body, status, votes, author_id, post_id)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(&comment.body)
    .bind(comment.status.as_str())
    .bind(comment.votes)
    .bind(comment.author_id)
    .bind(comment.post_id)
    .execute(pool)
    .await
    .context("Failed to insert comment")?;

    Ok(result.last_insert_rowid())
}

/// Get a post's comments, newest first, optionally filtered by status.
pub async fn get_comments_for_post(
    pool: &SqlitePool,
    post_id: i64,
    status: Option<CommentStatus>,
) -> Result<Vec<Comment>> {
    match status {
        Some(status) => sqlx::query_as(
            r"
            SELECT * FROM comments
            WHERE post_id = ? AND status = ?
            ORDER BY creation_date DESC, id DESC
            ",
        )
        .bind(post_id)
        .bind(status.as_str())
        .fetch_all(pool)
        .await
        .context("Failed to fetch comments for post"),
        None => sqlx::query_as(
            r"
            SELECT * FROM comments
            WHERE post_id = ?
            ORDER BY creation_date DESC, id DESC
            ",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
        .context("Failed to fetch comments for post"),
    }
}

/// Count a post's comments regardless of status.
pub async fn count_comments_for_post(pool: &SqlitePool, post_id: i64) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .context("Failed to count comments for post")?;

    Ok(row.0)
}

// ========== Trending ==========

/// Load comment-activity rows for the trending ranker.
///
/// The count covers comments of every status while read paths elsewhere
/// filter to published ones. The reference behaves this way; keep the
/// asymmetry until product intent says otherwise.
pub async fn post_activity(pool: &SqlitePool) -> Result<Vec<PostActivity>> {
    sqlx::query_as(
        r"
        SELECT
            p.*,
            COUNT(c.id) AS comment_count,
            MAX(c.creation_date) AS latest_comment_at
        FROM posts p
        LEFT JOIN comments c ON c.post_id = p.id
        GROUP BY p.id
        ",
    )
    .fetch_all(pool)
    .await
    .context("Failed to fetch post activity")
}
