//! Shows what would be sent for a lead without sending it.

use std::io::Read;
use volna_landing::config::Config;
use volna_landing::lead_client::LeadSubmitter;
use volna_landing::models::LeadPayload;

/// Reads a JSON `LeadPayload` from stdin and prints the normalized record
/// followed by the form-encoded request body.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volna_landing=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let payload: LeadPayload = serde_json::from_str(&input)?;

    let submitter = LeadSubmitter::new(&config)?;
    let request = submitter.prepare(&payload).await;

    println!("{}", serde_json::to_string_pretty(&request)?);
    println!();
    println!("{}", request.to_form_body());

    Ok(())
}
