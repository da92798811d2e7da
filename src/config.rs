use std::time::Duration;
use url::Url;

/// Intake endpoint (Apps Script web app) that receives leads.
pub const DEFAULT_LEAD_ENDPOINT: &str =
    "https://script.google.com/macros/s/AKfycbyGL5Y4gBm9-2V_bBsT8QOmRwiJ1-sHOjnCOfYfzHeEXh-_FmeMsqISHJGEhrE1-8sV/exec";

/// Page the landing is served from when no `PAGE_URL` is given.
pub const DEFAULT_PAGE_URL: &str = "https://xn----7sbabjp5bepdj.xn--p1ai/";

/// Relative location of the site configuration document.
pub const SITE_CONFIG_PATH: &str = "site.config.json";

/// Hard limit for one lead submission.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone)]
pub struct Config {
    pub lead_endpoint: String,
    pub page_url: Url,
    pub site_config_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Configuration for a page served at `page_url`, everything else default.
    pub fn for_page(page_url: Url) -> Self {
        let site_config_url = page_url
            .join(SITE_CONFIG_PATH)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| SITE_CONFIG_PATH.to_string());

        Self {
            lead_endpoint: DEFAULT_LEAD_ENDPOINT.to_string(),
            page_url,
            site_config_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let page_url = std::env::var("PAGE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAGE_URL.to_string());
        let page_url = Url::parse(page_url.trim())
            .map_err(|e| anyhow::anyhow!("PAGE_URL must be an absolute URL: {}", e))?;

        let config = Self {
            lead_endpoint: {
                let url = std::env::var("LEAD_ENDPOINT_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LEAD_ENDPOINT.to_string());
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("LEAD_ENDPOINT_URL must start with http:// or https://");
                }
                url
            },
            site_config_url: match std::env::var("SITE_CONFIG_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
            {
                Some(url) => url,
                None => page_url
                    .join(SITE_CONFIG_PATH)
                    .map_err(|e| anyhow::anyhow!("Cannot resolve site config URL: {}", e))?
                    .to_string(),
            },
            request_timeout: std::env::var("LEAD_REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT.as_millis().to_string())
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("LEAD_REQUEST_TIMEOUT_MS must be a number"))
                .and_then(|ms| {
                    if ms == 0 {
                        anyhow::bail!("LEAD_REQUEST_TIMEOUT_MS must be greater than zero");
                    }
                    Ok(Duration::from_millis(ms))
                })?,
            page_url,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Lead endpoint: {}", config.lead_endpoint);
        tracing::debug!("Page URL: {}", config.page_url);
        tracing::debug!("Site config URL: {}", config.site_config_url);
        tracing::debug!(
            "Request timeout: {} ms",
            config.request_timeout.as_millis()
        );

        Ok(config)
    }
}
