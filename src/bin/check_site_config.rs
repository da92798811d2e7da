//! Prints the site configuration the landing would use.

use volna_landing::config::Config;
use volna_landing::lead_client::LeadSubmitter;
use volna_landing::models::SiteConfig;
use volna_landing::normalize::resolve_site_url;

/// Loads `site.config.json` the same way a submission does and reports the
/// effective values, including whether the fallback was used.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volna_landing=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let submitter = LeadSubmitter::new(&config)?;
    let site = submitter.site_config().load().await;

    println!("Source:   {}", config.site_config_url);
    if *site == SiteConfig::fallback() {
        println!("(fallback values)");
    }
    println!("siteId:   {}", site.site_id);
    println!("siteUrl:  {}", site.site_url);
    println!("chatId:   {}", site.chat_id);
    println!("effective siteUrl: {}", resolve_site_url(&site, submitter.page()));

    Ok(())
}
