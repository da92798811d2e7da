use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{FlatLeadRequest, LeadAck, LeadPayload};
use crate::normalize::build_flat_request;
use crate::page::PageContext;
use crate::site_config::SiteConfigCache;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Longest response-body excerpt kept in an HTTP failure.
const ERROR_BODY_SNIPPET: usize = 300;

/// Anything that can take a lead off the form's hands.
pub trait LeadSink {
    /// Delivers one lead; a single attempt, no retries.
    fn send_lead(
        &self,
        payload: LeadPayload,
    ) -> impl Future<Output = Result<LeadAck, AppError>> + Send;
}

/// Client for the lead intake endpoint.
#[derive(Clone)]
pub struct LeadSubmitter {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    page: PageContext,
    site_config: SiteConfigCache,
}

impl LeadSubmitter {
    /// Creates a new `LeadSubmitter`.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, page location and timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create lead client")?;
        let site_config = SiteConfigCache::new(client.clone(), config.site_config_url.clone());

        Ok(Self {
            client,
            endpoint: config.lead_endpoint.clone(),
            timeout: config.request_timeout,
            page: PageContext::new(config.page_url.clone()),
            site_config,
        })
    }

    /// The site configuration cache shared by every submission.
    pub fn site_config(&self) -> &SiteConfigCache {
        &self.site_config
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Normalizes a payload against the (cached) site configuration.
    pub async fn prepare(&self, payload: &LeadPayload) -> FlatLeadRequest {
        let site_config = self.site_config.load().await;
        build_flat_request(payload, &site_config, &self.page)
    }

    /// Sends a lead to the intake endpoint.
    ///
    /// The request and the body read share one deadline; when it passes, the
    /// in-flight request is dropped and `AppError::Timeout` is returned.
    ///
    /// # Returns
    ///
    /// * `Result<LeadAck, AppError>` - Acknowledgement or the failure.
    pub async fn submit(&self, payload: &LeadPayload) -> Result<LeadAck, AppError> {
        let request = self.prepare(payload).await;
        tracing::info!(
            "Sending lead from '{}' to {} (quiz: {})",
            request.source,
            self.endpoint,
            request.quiz.is_some()
        );
        tracing::debug!("Lead payload: {:?}", request);

        let body = request.to_form_body();
        match tokio::time::timeout(self.timeout, self.post(body)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Lead request aborted after {} ms",
                    self.timeout.as_millis()
                );
                Err(AppError::Timeout(self.timeout))
            }
        }
    }

    async fn post(&self, body: String) -> Result<LeadAck, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .context("Lead request failed")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let snippet: String = error_text.chars().take(ERROR_BODY_SNIPPET).collect();
            tracing::error!("Intake endpoint returned {}: {}", status, snippet);
            return Err(AppError::HttpStatus {
                status,
                body: snippet,
            });
        }

        tracing::info!("✓ Lead accepted by intake endpoint");
        Ok(LeadAck::accepted())
    }
}

impl LeadSink for LeadSubmitter {
    fn send_lead(
        &self,
        payload: LeadPayload,
    ) -> impl Future<Output = Result<LeadAck, AppError>> + Send {
        async move { self.submit(&payload).await }
    }
}
