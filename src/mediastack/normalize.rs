use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{NewPost, PostStatus};

/// An article record as returned by the news aggregation API.
///
/// The wire shape is exactly these fields; `published_at` is an ISO-8601
/// timestamp string with an explicit UTC offset. Most fields are nullable
/// upstream, so everything optional stays optional here and validation
/// happens in [`normalize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalArticle {
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid url '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid published_at timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Internal author identity derived from an article's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorIdentity {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Internal category identity derived from an article's category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIdentity {
    pub slug: String,
    pub label: String,
}

/// An article mapped into the internal post schema, with author and
/// category still unresolved (identities, not row ids).
#[derive(Debug, Clone)]
pub struct NormalizedPost {
    pub title: String,
    pub body: String,
    pub image_link: Option<String>,
    pub status: PostStatus,
    pub publish_date: Option<DateTime<Utc>>,
    pub author: AuthorIdentity,
    pub category: CategoryIdentity,
}

impl NormalizedPost {
    /// Convert into an insertable row once author and category resolved.
    #[must_use]
    pub fn into_new_post(self, author_id: i64, category_id: i64) -> NewPost {
        NewPost {
            title: self.title,
            body: Some(self.body),
            image_link: self.image_link,
            status: self.status,
            author_id,
            category_id,
            publish_date: self
                .publish_date
                .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Map an external article into the internal post schema.
///
/// Pure: no lookups, no persistence. External content is considered
/// pre-vetted, so the resulting status is always published.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingField`] when `title` or `url` is absent
/// or blank, [`NormalizeError::InvalidUrl`] when `url` does not parse, and
/// [`NormalizeError::InvalidTimestamp`] when `published_at` is present but
/// malformed.
pub fn normalize(article: &ExternalArticle) -> Result<NormalizedPost, NormalizeError> {
    let title = required_field(article.title.as_deref(), "title")?;
    let url = required_field(article.url.as_deref(), "url")?;

    url::Url::parse(url).map_err(|source| NormalizeError::InvalidUrl {
        value: url.to_string(),
        source,
    })?;

    let description = article.description.as_deref().unwrap_or_default();
    let body = format!("{description}\nsee more at: {url}");

    let publish_date = match article.published_at.as_deref() {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|source| NormalizeError::InvalidTimestamp {
                    value: raw.to_string(),
                    source,
                })?,
        ),
        None => None,
    };

    Ok(NormalizedPost {
        title: title.to_string(),
        body,
        image_link: article.image.clone(),
        status: PostStatus::Published,
        publish_date,
        author: author_identity(article),
        category: category_identity(article.category.as_deref()),
    })
}

fn required_field<'a>(
    value: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, NormalizeError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(NormalizeError::MissingField(name))
}

/// Derive a stable internal identity from an article's author display name.
///
/// Falls back to the source name when the author is absent; the account
/// identifier is the slugified display name, and the name splits on the
/// first whitespace run.
fn author_identity(article: &ExternalArticle) -> AuthorIdentity {
    let display = article
        .author
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            article
                .source
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .unwrap_or("unknown");

    let (first_name, last_name) = match display.split_once(char::is_whitespace) {
        Some((first, rest)) => (Some(first.to_string()), Some(rest.trim().to_string())),
        None => (Some(display.to_string()), None),
    };

    AuthorIdentity {
        username: slugify(display),
        first_name,
        last_name,
    }
}

fn category_identity(category: Option<&str>) -> CategoryIdentity {
    let raw = category
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("general");

    CategoryIdentity {
        slug: raw.to_lowercase(),
        label: capitalize(raw),
    }
}

/// Lowercased alphanumerics only, suitable as an account identifier.
fn slugify(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
