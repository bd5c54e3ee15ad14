//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::services::mail::Unconfigured;
use crate::services::{FeedSource, MailService, ServiceError};

/// A feed that returns a fixed line without touching the network.
pub struct StaticFeed(pub &'static str);

#[async_trait]
impl FeedSource for StaticFeed {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<String, ServiceError> {
        Ok(self.0.to_string())
    }

    fn fallback(&self) -> String {
        "N/A".to_string()
    }
}

/// Creates a test App with static feeds and no mail transport.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        "tester".to_string(),
        Arc::new(StaticFeed("Weather: test")),
        Arc::new(StaticFeed("News: test")),
        MailService::new(Arc::new(Unconfigured), "tester@localhost".to_string()),
    )
}
