use crate::errors::AppError;
use crate::models::SiteConfig;
use moka::future::Cache;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

/// Page-lifetime cache of the site configuration.
///
/// The first `load` fetches `site.config.json`; every later call (and every
/// caller racing the first one) gets the same value without another request.
/// Failures never surface: they resolve to [`SiteConfig::fallback`], which is
/// then cached like a fetched value.
#[derive(Clone)]
pub struct SiteConfigCache {
    client: Client,
    url: String,
    cache: Cache<(), Arc<SiteConfig>>,
}

impl SiteConfigCache {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            cache: Cache::builder().max_capacity(1).build(),
        }
    }

    /// Returns the cached configuration, fetching it on first use.
    pub async fn load(&self) -> Arc<SiteConfig> {
        self.cache
            .get_with((), async {
                let config = match self.fetch().await {
                    Ok(config) => {
                        tracing::info!("Site config loaded from {}", self.url);
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Using fallback site config: {}", e);
                        SiteConfig::fallback()
                    }
                };
                Arc::new(config)
            })
            .await
    }

    /// Whether a configuration is cached for this page load.
    pub fn is_loaded(&self) -> bool {
        self.cache.contains_key(&())
    }

    /// Drops the cached configuration; the next `load` fetches again.
    pub async fn reset(&self) {
        self.cache.invalidate(&()).await;
    }

    async fn fetch(&self) -> Result<SiteConfig, AppError> {
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Config(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| AppError::Config(format!("Failed to parse site config: {}", e)))?;

        Ok(SiteConfig::fallback().overlay(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_config_falls_back() {
        // Nothing listens on port 9 (discard) locally.
        let cache = SiteConfigCache::new(Client::new(), "http://127.0.0.1:9/site.config.json");

        assert!(!cache.is_loaded());
        let config = cache.load().await;
        assert_eq!(*config, SiteConfig::fallback());
    }

    #[tokio::test]
    async fn test_reset_clears_cached_value() {
        let cache = SiteConfigCache::new(Client::new(), "http://127.0.0.1:9/site.config.json");
        cache.load().await;
        assert!(cache.is_loaded());
        cache.reset().await;
        assert!(!cache.is_loaded());
    }
}
