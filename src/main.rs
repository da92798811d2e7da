use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use volna_landing::config::Config;
use volna_landing::lead_client::LeadSubmitter;
use volna_landing::models::LeadPayload;

/// Submits one lead read from stdin.
///
/// Reads a JSON `LeadPayload` from standard input, sends it to the configured
/// intake endpoint and prints the acknowledgement as JSON.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok when the endpoint accepted the lead.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volna_landing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let payload: LeadPayload = serde_json::from_str(&input)
        .map_err(|e| anyhow::anyhow!("stdin is not a lead payload: {}", e))?;

    let submitter = LeadSubmitter::new(&config)?;
    let ack = submitter.submit(&payload).await?;

    println!("{}", serde_json::to_string(&ack)?);
    Ok(())
}
