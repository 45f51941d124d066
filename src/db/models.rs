use serde::{Deserialize, Serialize};

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

/// Moderation state of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Published,
    NonPublished,
}

impl CommentStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::NonPublished => "non_published",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "published" => Some(Self::Published),
            "non_published" => Some(Self::NonPublished),
            _ => None,
        }
    }
}

/// An author account with enrichment metadata.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CoolUser {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gravatar_link: Option<String>,
    pub gravatar_updated_at: Option<String>,
    pub github_profile: Option<String>,
    pub github_repos: Option<i64>,
    pub github_stars: Option<i64>,
    pub last_github_check: Option<String>,
    pub created_at: String,
    pub last_update: String,
}

/// A post category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub label: String,
    pub slug: String,
    pub created_by: Option<i64>,
    pub created_at: String,
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: Option<String>,
    pub image_link: Option<String>,
    pub status: String,
    pub author_id: i64,
    pub category_id: i64,
    pub publish_date: Option<String>,
    pub creation_date: String,
    pub last_update: String,
}

impl Post {
    #[must_use]
    pub fn status_enum(&self) -> Option<PostStatus> {
        PostStatus::from_str(&self.status)
    }

    /// Structural comparison ignoring identity and server-assigned timestamps.
    ///
    /// Two posts are considered the same content iff every field except
    /// `id`, `creation_date` and `last_update` matches. Used for dedup
    /// checks against externally-sourced data, where database identity and
    /// mutable timestamps cannot participate.
    #[must_use]
    pub fn content_equals(&self, other: &Post) -> bool {
        self.title == other.title
            && self.body == other.body
            && self.image_link == other.image_link
            && self.status == other.status
            && self.author_id == other.author_id
            && self.category_id == other.category_id
            && self.publish_date == other.publish_date
    }
}

/// A reader comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub status: String,
    pub votes: i64,
    pub author_id: Option<i64>,
    pub post_id: i64,
    pub creation_date: String,
    pub last_update: String,
}

impl Comment {
    #[must_use]
    pub fn status_enum(&self) -> Option<CommentStatus> {
        CommentStatus::from_str(&self.status)
    }
}

/// Data for inserting a new author.
#[derive(Debug, Clone, Default)]
pub struct NewCoolUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub github_profile: Option<String>,
}

/// Data for inserting a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub label: String,
    pub slug: String,
    pub created_by: Option<i64>,
}

/// Data for inserting a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: Option<String>,
    pub image_link: Option<String>,
    pub status: PostStatus,
    pub author_id: i64,
    pub category_id: i64,
    pub publish_date: Option<String>,
}

impl NewPost {
    /// Same partial structural comparison as [`Post::content_equals`], for
    /// checking a candidate insert against an already-persisted row.
    #[must_use]
    pub fn content_equals(&self, other: &Post) -> bool {
        self.title == other.title
            && self.body == other.body
            && self.image_link == other.image_link
            && self.status.as_str() == other.status
            && self.author_id == other.author_id
            && self.category_id == other.category_id
            && self.publish_date == other.publish_date
    }
}

/// Data for inserting a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub body: String,
    pub status: CommentStatus,
    pub votes: i64,
    pub author_id: Option<i64>,
    pub post_id: i64,
}

/// An author together with their post count, for the authors listing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorDisplay {
    #[sqlx(flatten)]
    pub user: CoolUser,
    pub post_count: i64,
}

/// A category together with its post count, for the home page.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryDisplay {
    #[sqlx(flatten)]
    pub category: Category,
    pub post_count: i64,
}

/// A post together with its comment-activity signals, input to the
/// trending ranker.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostActivity {
    #[sqlx(flatten)]
    pub post: Post,
    pub comment_count: i64,
    pub latest_comment_at: Option<String>,
}
