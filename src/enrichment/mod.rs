//! Best-effort author profile enrichment.
//!
//! Derives an avatar link from the account email and scrapes repository and
//! star counts from a code-hosting profile page. All network I/O goes
//! through the [`ProfileFetcher`] seam so tests can substitute a stub. A
//! failed fetch means "no enrichment this cycle" and never propagates.

pub mod github;
pub mod gravatar;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::config::Config;
use crate::db::{self, CoolUser};

/// A fetched page: status plus body, no transport detail.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability for fetching external profile pages.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Fetch a URL, returning the response status and body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure (callers treat this the same
    /// as a non-success status).
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// HTTP-backed fetcher used outside tests.
#[derive(Debug, Clone)]
pub struct HttpProfileFetcher {
    client: reqwest::Client,
}

impl HttpProfileFetcher {
    /// Build a fetcher with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("coolpress/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ProfileFetcher for HttpProfileFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(FetchedPage { status, body })
    }
}

/// Service endpoints for enrichment lookups.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub gravatar_base_url: String,
    pub github_base_url: String,
}

impl EnrichmentConfig {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            gravatar_base_url: config.gravatar_base_url.clone(),
            github_base_url: config.github_base_url.clone(),
        }
    }
}

/// Enrich an author in place. Returns whether any field changed.
///
/// Explicitly invokable and side-effect free except for the fetches: the
/// caller decides when to persist the updated entity.
pub async fn enrich(
    user: &mut CoolUser,
    fetcher: &dyn ProfileFetcher,
    cfg: &EnrichmentConfig,
) -> bool {
    let gravatar_changed = refresh_gravatar(user, fetcher, cfg).await;
    let github_changed = refresh_github(user, fetcher, cfg).await;
    gravatar_changed || github_changed
}

/// Run enrichment, then persist the author. The explicit save path: every
/// create/update of an author flows through here.
///
/// # Errors
///
/// Returns an error only if the database update fails; enrichment failures
/// are absorbed.
pub async fn save_cool_user(
    pool: &SqlitePool,
    user: &mut CoolUser,
    fetcher: &dyn ProfileFetcher,
    cfg: &EnrichmentConfig,
) -> Result<()> {
    enrich(user, fetcher, cfg).await;
    db::update_cool_user(pool, user).await
}

/// Refresh the derived avatar link. Runs on every save: the derivation is
/// cheap and deterministic, so there is no throttling. The link only
/// changes on a successful probe; the refresh timestamp advances on every
/// attempt.
async fn refresh_gravatar(
    user: &mut CoolUser,
    fetcher: &dyn ProfileFetcher,
    cfg: &EnrichmentConfig,
) -> bool {
    let Some(email) = user.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        return false;
    };

    let probe = gravatar::profile_url(&cfg.gravatar_base_url, email);
    match fetcher.fetch(&probe).await {
        Ok(page) if page.is_success() => {
            user.gravatar_link = Some(gravatar::derive_image_link(&cfg.gravatar_base_url, email));
        }
        Ok(page) => {
            debug!(status = page.status, "Avatar profile lookup unsuccessful");
        }
        Err(e) => {
            debug!("Avatar profile lookup failed: {e:#}");
        }
    }

    user.gravatar_updated_at = Some(now_timestamp());
    true
}

/// Refresh repository and star counts, at most once per UTC calendar day.
/// Only a successful extraction advances the check date, so a fetch or
/// markup failure leaves the profile stale and the next save retries.
async fn refresh_github(
    user: &mut CoolUser,
    fetcher: &dyn ProfileFetcher,
    cfg: &EnrichmentConfig,
) -> bool {
    let Some(profile) = user.github_profile.as_deref().filter(|p| !p.trim().is_empty()) else {
        return false;
    };

    let today = today_utc();
    if user.last_github_check.as_deref() == Some(today.as_str()) {
        return false;
    }

    let url = github::profile_page_url(&cfg.github_base_url, profile);
    let page = match fetcher.fetch(&url).await {
        Ok(page) if page.is_success() => page,
        Ok(page) => {
            debug!(status = page.status, url = %url, "Profile page fetch unsuccessful");
            return false;
        }
        Err(e) => {
            debug!(url = %url, "Profile page fetch failed: {e:#}");
            return false;
        }
    };

    let counts = github::parse_profile_counts(&page.body);
    if counts.is_empty() {
        debug!(url = %url, "Profile page had no recognizable counters");
        return false;
    }

    if let Some(repos) = counts.repos {
        user.github_repos = Some(repos);
    }
    if let Some(stars) = counts.stars {
        user.github_stars = Some(stars);
    }
    user.last_github_check = Some(today);

    true
}

/// Current instant formatted like SQLite's `datetime('now')`.
fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current UTC calendar day, the granularity of the profile re-check gate.
fn today_utc() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
