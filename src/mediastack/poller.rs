use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::{
    find_posts_by_title, get_category_by_slug, get_cool_user, get_cool_user_by_username,
    insert_category, insert_cool_user, insert_post, Database, NewCategory, NewCoolUser,
};
use crate::enrichment::{self, EnrichmentConfig, HttpProfileFetcher, ProfileFetcher};

use super::client::{MediastackClient, SearchParams};
use super::normalize::{normalize, AuthorIdentity, CategoryIdentity, NormalizedPost};

/// Run the ingestion loop forever.
///
/// Does nothing (and says so) when no API access key is configured.
pub async fn ingest_loop(config: Config, db: Database) {
    let Some(access_key) = config.mediastack_access_key.clone() else {
        info!("No news API access key configured, ingestion disabled");
        return;
    };

    let client = match MediastackClient::new(&config.mediastack_api_url, &access_key, config.fetch_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build news API client: {e:#}");
            return;
        }
    };
    let fetcher = match HttpProfileFetcher::new(config.fetch_timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to build profile fetcher: {e:#}");
            return;
        }
    };

    loop {
        match ingest_once(&client, &fetcher, &config, &db).await {
            Ok(new_count) if new_count > 0 => {
                info!(new_posts = new_count, "Ingested new posts");
            }
            Ok(_) => debug!("No new posts from ingestion"),
            Err(e) => error!("Ingestion error: {e:#}"),
        }

        tokio::time::sleep(config.ingest_interval).await;
    }
}

/// Fetch one batch of articles and store whatever is new.
///
/// A record that fails normalization is logged and skipped; the batch
/// continues. Returns the number of newly created posts.
///
/// # Errors
///
/// Returns an error if the news API request itself fails.
pub async fn ingest_once(
    client: &MediastackClient,
    fetcher: &dyn ProfileFetcher,
    config: &Config,
    db: &Database,
) -> Result<usize> {
    let params = SearchParams {
        sources: config.ingest_sources.clone(),
        languages: config.ingest_languages.clone(),
        categories: config.ingest_categories.clone(),
        countries: config.ingest_countries.clone(),
        ..SearchParams::default()
    };

    let articles = client.search(&params).await?;
    debug!(count = articles.len(), "Fetched articles");

    let mut new_count = 0;
    for article in articles {
        let normalized = match normalize(&article) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!(url = ?article.url, "Skipping article: {e}");
                continue;
            }
        };

        match store_article(db, fetcher, config, normalized).await {
            Ok(true) => new_count += 1,
            Ok(false) => {}
            Err(e) => warn!("Failed to store article: {e:#}"),
        }
    }

    Ok(new_count)
}

/// Resolve references and insert the post unless an equal one exists.
async fn store_article(
    db: &Database,
    fetcher: &dyn ProfileFetcher,
    config: &Config,
    normalized: NormalizedPost,
) -> Result<bool> {
    let author_id = resolve_author(db, fetcher, config, &normalized.author).await?;
    let category_id = resolve_category(db, &normalized.category).await?;

    let new_post = normalized.into_new_post(author_id, category_id);

    // Idempotence: repeated ingestion of the same article must not create a
    // second post. Identity and server timestamps cannot participate, so
    // candidates narrowed by title are compared structurally.
    let candidates = find_posts_by_title(db.pool(), &new_post.title).await?;
    if candidates.iter().any(|p| new_post.content_equals(p)) {
        debug!(title = %new_post.title, "Post already ingested");
        return Ok(false);
    }

    insert_post(db.pool(), &new_post).await?;
    Ok(true)
}

/// Find or create the author for an external identity.
///
/// Creation happens only on first encounter; a new author immediately goes
/// through the enrichment save path.
async fn resolve_author(
    db: &Database,
    fetcher: &dyn ProfileFetcher,
    config: &Config,
    identity: &AuthorIdentity,
) -> Result<i64> {
    if let Some(existing) = get_cool_user_by_username(db.pool(), &identity.username).await? {
        return Ok(existing.id);
    }

    debug!(username = %identity.username, "Creating author for external identity");
    let id = insert_cool_user(
        db.pool(),
        &NewCoolUser {
            username: identity.username.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            ..NewCoolUser::default()
        },
    )
    .await?;

    let mut user = get_cool_user(db.pool(), id)
        .await?
        .context("Author vanished right after insert")?;
    let enrichment_cfg = EnrichmentConfig::from_config(config);
    if let Err(e) = enrichment::save_cool_user(db.pool(), &mut user, fetcher, &enrichment_cfg).await
    {
        warn!(username = %user.username, "Failed to save enriched author: {e:#}");
    }

    Ok(id)
}

/// Find or create the category for an external identity.
async fn resolve_category(db: &Database, identity: &CategoryIdentity) -> Result<i64> {
    if let Some(existing) = get_category_by_slug(db.pool(), &identity.slug).await? {
        return Ok(existing.id);
    }

    debug!(slug = %identity.slug, "Creating category for external identity");
    insert_category(
        db.pool(),
        &NewCategory {
            label: identity.label.clone(),
            slug: identity.slug.clone(),
            created_by: None,
        },
    )
    .await
}
