//! OpenWeatherMap current-conditions feed.
//!
//! `GET {base}/weather?q={city}&appid={key}&units=metric`

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use crate::core::config::ResolvedWeather;
use crate::services::feed::{FeedSource, ServiceError, api_error};

#[derive(Deserialize, Debug)]
struct WeatherResponse {
    name: Option<String>,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Deserialize, Debug)]
struct MainReadings {
    temp: f64,
}

#[derive(Deserialize, Debug)]
struct Condition {
    description: String,
}

/// Capitalize the first letter ("clear sky" → "Clear sky").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct WeatherClient {
    api_key: Option<String>,
    base_url: String,
    city: String,
    client: reqwest::Client,
}

impl WeatherClient {
    pub fn new(api_key: Option<String>, base_url: String, city: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build weather HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            city,
            client,
        }
    }

    pub fn from_config(config: &ResolvedWeather) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.city.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl FeedSource for WeatherClient {
    fn name(&self) -> &str {
        "weather"
    }

    async fn fetch(&self) -> Result<String, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Config("WEATHER_API_KEY is not set".to_string()))?;

        info!("Fetching weather for {}", self.city);
        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[("q", self.city.as_str()), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;

        debug!("Weather response status: {}", response.status());
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        let parsed: WeatherResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))?;

        let description = parsed
            .weather
            .first()
            .map(|c| capitalize(&c.description))
            .unwrap_or_else(|| "Unknown".to_string());
        let place = parsed.name.unwrap_or_else(|| self.city.clone());

        Ok(format!(
            "🌤️ Weather: {:.0}°C, {} ({})",
            parsed.main.temp, description, place
        ))
    }

    fn fallback(&self) -> String {
        "🌤️ Weather: N/A".to_string()
    }
}
