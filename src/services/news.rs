//! newsapi.org top-headlines feed.
//!
//! `GET {base}/top-headlines?country={cc}&pageSize=5&apiKey={key}`

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use crate::core::config::ResolvedNews;
use crate::services::feed::{FeedSource, ServiceError, api_error};

const PAGE_SIZE: &str = "5";

#[derive(Deserialize, Debug)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize, Debug)]
struct Article {
    title: Option<String>,
}

pub struct NewsClient {
    api_key: Option<String>,
    base_url: String,
    country: String,
    client: reqwest::Client,
}

impl NewsClient {
    pub fn new(api_key: Option<String>, base_url: String, country: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            // newsapi.org rejects requests without a User-Agent
            .user_agent(concat!("zelda/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build news HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            country,
            client,
        }
    }

    pub fn from_config(config: &ResolvedNews) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.country.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// All non-empty headlines from the current page.
    pub async fn headlines(&self) -> Result<Vec<String>, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Config("NEWS_API_KEY is not set".to_string()))?;

        info!("Fetching top headlines for country={}", self.country);
        let response = self
            .client
            .get(format!("{}/top-headlines", self.base_url))
            .query(&[
                ("country", self.country.as_str()),
                ("pageSize", PAGE_SIZE),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        debug!("News response status: {}", response.status());
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        let parsed: HeadlinesResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(parsed
            .articles
            .into_iter()
            .filter_map(|a| a.title)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect())
    }
}

#[async_trait]
impl FeedSource for NewsClient {
    fn name(&self) -> &str {
        "news"
    }

    async fn fetch(&self) -> Result<String, ServiceError> {
        let headlines = self.headlines().await?;
        let first = headlines
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Parse("no articles in response".to_string()))?;
        Ok(format!("📰 News: {first}"))
    }

    fn fallback(&self) -> String {
        "📰 News: N/A".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = NewsClient::new(
            None,
            "http://127.0.0.1:1".to_string(),
            "us".to_string(),
            Duration::from_millis(100),
        );
        assert!(matches!(client.fetch().await, Err(ServiceError::Config(_))));
    }
}
