use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// Fixed structural paths into the profile page's navigation bar. Brittle
// against markup changes; a missing counter is the common case, not an
// error.
static REPOS_COUNTER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".UnderlineNav-body a:nth-child(2) .Counter").unwrap()
});
static STARS_COUNTER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".UnderlineNav-body a:nth-child(5) .Counter").unwrap()
});

/// Counts scraped from a code-hosting profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileCounts {
    pub repos: Option<i64>,
    pub stars: Option<i64>,
}

impl ProfileCounts {
    /// Whether anything usable was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repos.is_none() && self.stars.is_none()
    }
}

/// URL of the profile page for a handle. Accepts either a bare handle or a
/// full profile URL (only the trailing path segment is kept).
#[must_use]
pub fn profile_page_url(base_url: &str, profile: &str) -> String {
    let trimmed = profile.trim().trim_end_matches('/');
    let handle = trimmed.rsplit('/').next().unwrap_or(trimmed);
    format!("{}/{}", base_url.trim_end_matches('/'), handle)
}

/// Extract repository and star counts from a profile page.
#[must_use]
pub fn parse_profile_counts(html: &str) -> ProfileCounts {
    let document = Html::parse_document(html);

    ProfileCounts {
        repos: select_counter(&document, &REPOS_COUNTER),
        stars: select_counter(&document, &STARS_COUNTER),
    }
}

fn select_counter(document: &Html, selector: &Selector) -> Option<i64> {
    let element = document.select(selector).next()?;
    parse_counter_text(&element.text().collect::<String>())
}

/// Parse counter text such as "128" or "1,024". Abbreviated values
/// ("3.4k") and anything else non-numeric read as absent.
#[must_use]
pub fn parse_counter_text(text: &str) -> Option<i64> {
    text.trim().replace(',', "").parse().ok()
}
