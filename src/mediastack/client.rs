use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use super::normalize::ExternalArticle;

/// Search filters for the news API. Empty lists are omitted from the query.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub sources: Vec<String>,
    pub date: Option<NaiveDate>,
    pub languages: Vec<String>,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub keywords: Vec<String>,
}

/// Response envelope around the article list.
#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Vec<ExternalArticle>,
}

/// Client for the mediastack-shaped news aggregation API.
///
/// Owns transport concerns (query parameters, authentication, timeouts);
/// the normalizer downstream only ever sees [`ExternalArticle`] values.
#[derive(Debug, Clone)]
pub struct MediastackClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl MediastackClient {
    /// Create a client against the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, access_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("coolpress/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        })
    }

    /// Fetch live news articles matching the given filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the response body does not parse.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<ExternalArticle>> {
        let mut query: Vec<(&str, String)> = vec![("access_key", self.access_key.clone())];

        push_list(&mut query, "sources", &params.sources);
        push_list(&mut query, "languages", &params.languages);
        push_list(&mut query, "categories", &params.categories);
        push_list(&mut query, "countries", &params.countries);
        push_list(&mut query, "keywords", &params.keywords);
        if let Some(date) = params.date {
            query.push(("date", date.format("%Y-%m-%d").to_string()));
        }

        let response = self
            .http
            .get(format!("{}/v1/news", self.base_url))
            .query(&query)
            .send()
            .await
            .context("Failed to fetch news articles")?;

        if !response.status().is_success() {
            anyhow::bail!("news API request failed with status {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("Failed to read news API response")?;
        let envelope: SearchEnvelope =
            serde_json::from_str(&body).context("Failed to parse news API response")?;

        Ok(envelope.data)
    }
}

fn push_list(query: &mut Vec<(&'static str, String)>, name: &'static str, values: &[String]) {
    if !values.is_empty() {
        query.push((name, values.join(",")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_list_skips_empty() {
        let mut query: Vec<(&str, String)> = Vec::new();
        push_list(&mut query, "sources", &[]);
        assert!(query.is_empty());

        push_list(
            &mut query,
            "sources",
            &["cnn".to_string(), "bbc".to_string()],
        );
        assert_eq!(query, vec![("sources", "cnn,bbc".to_string())]);
    }
}
