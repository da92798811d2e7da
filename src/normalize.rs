//! Lead normalization: everything between a raw payload and the wire record.
//!
//! 1. Clamp every value to its [`FIELD_LIMITS`] entry (truncate, never reject)
//! 2. Resolve UTM tags by precedence (payload > nested `utm` > query string)
//! 3. Flatten quiz answers to text
//! 4. Pick a safe site URL

use crate::models::{FlatLeadRequest, LeadPayload, SiteConfig, UtmParams, FIELD_LIMITS};
use crate::page::PageContext;
use serde_json::Value;

/// Trims `value` and keeps at most `max_chars` characters.
pub fn clean(value: Option<&str>, max_chars: usize) -> String {
    value
        .unwrap_or_default()
        .trim()
        .chars()
        .take(max_chars)
        .collect()
}

/// First candidate that is present and non-empty.
fn first_filled<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.is_empty())
}

/// Resolves the five UTM tags for a payload.
pub fn normalize_utm(payload: &LeadPayload, page: &PageContext) -> UtmParams {
    let nested = payload.utm.clone().unwrap_or_default();

    let resolve = |direct: &Option<String>, nested: &Option<String>, query_key: &str| {
        let from_query = page.query_param(query_key);
        let value = first_filled(&[
            direct.as_deref(),
            nested.as_deref(),
            Some(from_query.as_str()),
        ]);
        Some(clean(value, FIELD_LIMITS.utm))
    };

    let direct = &payload.utm_fields;
    UtmParams {
        utm_source: resolve(&direct.utm_source, &nested.utm_source, "utm_source"),
        utm_medium: resolve(&direct.utm_medium, &nested.utm_medium, "utm_medium"),
        utm_campaign: resolve(&direct.utm_campaign, &nested.utm_campaign, "utm_campaign"),
        utm_content: resolve(&direct.utm_content, &nested.utm_content, "utm_content"),
        utm_term: resolve(&direct.utm_term, &nested.utm_term, "utm_term"),
    }
}

/// Quiz answers as clamped text; empty when there is nothing to send.
pub fn normalize_quiz(quiz: Option<&Value>) -> String {
    let Some(quiz) = quiz else {
        return String::new();
    };

    match quiz {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::String(text) => clean(Some(text), FIELD_LIMITS.quiz),
        other => match serde_json::to_string(other) {
            Ok(text) => clean(Some(&text), FIELD_LIMITS.quiz),
            Err(e) => {
                tracing::debug!("Dropping quiz that failed to serialize: {}", e);
                String::new()
            }
        },
    }
}

/// Configured site URL unless it is empty or looks like injected markup.
pub fn resolve_site_url(config: &SiteConfig, page: &PageContext) -> String {
    let configured = config.site_url.trim();
    if !configured.is_empty() && !configured.contains('<') && !configured.contains('>') {
        configured.to_string()
    } else {
        page.origin()
    }
}

/// Builds the record transmitted to the intake endpoint.
pub fn build_flat_request(
    payload: &LeadPayload,
    config: &SiteConfig,
    page: &PageContext,
) -> FlatLeadRequest {
    let utm = normalize_utm(payload, page);
    let quiz = normalize_quiz(payload.quiz.as_ref());
    let site_url = resolve_site_url(config, page);
    let href = page.href();
    let hostname = page.hostname();

    FlatLeadRequest {
        site_id: clean(Some(&config.site_id), FIELD_LIMITS.site_id),
        site_url: clean(Some(&site_url), FIELD_LIMITS.site_url),
        chat_id: clean(Some(&config.chat_id), FIELD_LIMITS.chat_id),
        name: clean(payload.name.as_deref(), FIELD_LIMITS.name),
        phone: clean(payload.phone.as_deref(), FIELD_LIMITS.phone),
        email: clean(payload.email.as_deref(), FIELD_LIMITS.email),
        source: clean(
            first_filled(&[payload.source.as_deref(), Some("lead")]),
            FIELD_LIMITS.source,
        ),
        message: clean(payload.message.as_deref(), FIELD_LIMITS.message),
        hp: clean(payload.hp.as_deref(), FIELD_LIMITS.hp),
        page_url: clean(
            first_filled(&[payload.page_url.as_deref(), Some(href.as_str())]),
            FIELD_LIMITS.page_url,
        ),
        site_host: clean(
            first_filled(&[payload.site_host.as_deref(), Some(hostname.as_str())]),
            FIELD_LIMITS.site_host,
        ),
        utm_source: utm.utm_source.unwrap_or_default(),
        utm_medium: utm.utm_medium.unwrap_or_default(),
        utm_campaign: utm.utm_campaign.unwrap_or_default(),
        utm_content: utm.utm_content.unwrap_or_default(),
        utm_term: utm.utm_term.unwrap_or_default(),
        quiz: (!quiz.is_empty()).then_some(quiz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> PageContext {
        PageContext::parse("https://landing.example.com/offer?utm_source=C&utm_medium=cpc").unwrap()
    }

    #[test]
    fn test_clean_trims_then_truncates_by_chars() {
        assert_eq!(clean(Some("  Добрый день  "), 6), "Добрый");
        assert_eq!(clean(None, 10), "");
        assert_eq!(clean(Some("   "), 10), "");
    }

    #[test]
    fn test_utm_precedence() {
        let mut payload = LeadPayload::default();
        payload.utm_fields.utm_source = Some("A".to_string());
        payload.utm = Some(UtmParams {
            utm_source: Some("B".to_string()),
            ..UtmParams::default()
        });
        assert_eq!(normalize_utm(&payload, &page()).utm_source.as_deref(), Some("A"));

        payload.utm_fields.utm_source = None;
        assert_eq!(normalize_utm(&payload, &page()).utm_source.as_deref(), Some("B"));

        payload.utm = None;
        assert_eq!(normalize_utm(&payload, &page()).utm_source.as_deref(), Some("C"));

        assert_eq!(normalize_utm(&payload, &page()).utm_term.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_direct_utm_falls_through() {
        let mut payload = LeadPayload::default();
        payload.utm_fields.utm_medium = Some(String::new());
        assert_eq!(normalize_utm(&payload, &page()).utm_medium.as_deref(), Some("cpc"));
    }

    #[test]
    fn test_quiz_normalization() {
        assert_eq!(normalize_quiz(None), "");
        assert_eq!(normalize_quiz(Some(&json!(null))), "");
        assert_eq!(normalize_quiz(Some(&json!(false))), "");
        assert_eq!(normalize_quiz(Some(&json!(0))), "");
        assert_eq!(normalize_quiz(Some(&json!(""))), "");
        assert_eq!(normalize_quiz(Some(&json!("  3 ночи "))), "3 ночи");
        assert_eq!(normalize_quiz(Some(&json!({"nights": 3}))), r#"{"nights":3}"#);
        assert_eq!(normalize_quiz(Some(&json!([]))), "[]");
        assert_eq!(normalize_quiz(Some(&json!(true))), "true");
    }

    #[test]
    fn test_site_url_rejects_markup() {
        let mut config = SiteConfig::fallback();
        assert_eq!(resolve_site_url(&config, &page()), config.site_url);

        config.site_url = "<script>alert(1)</script>".to_string();
        assert_eq!(resolve_site_url(&config, &page()), "https://landing.example.com");

        config.site_url = "   ".to_string();
        assert_eq!(resolve_site_url(&config, &page()), "https://landing.example.com");
    }

    #[test]
    fn test_flat_request_defaults() {
        let payload = LeadPayload::new(" Ольга ", " 8 900 123-45-67 ");
        let request = build_flat_request(&payload, &SiteConfig::fallback(), &page());

        assert_eq!(request.site_id, "volna-alean");
        assert_eq!(request.name, "Ольга");
        assert_eq!(request.phone, "8 900 123-45-67");
        assert_eq!(request.source, "lead");
        assert_eq!(request.page_url, page().href());
        assert_eq!(request.site_host, "landing.example.com");
        assert_eq!(request.utm_source, "C");
        assert_eq!(request.quiz, None);
    }

    #[test]
    fn test_flat_request_clamps_long_fields() {
        let mut payload = LeadPayload::new("n".repeat(500), "7".repeat(100));
        payload.message = Some("m".repeat(5000));
        payload.quiz = Some(json!("q".repeat(20000)));

        let request = build_flat_request(&payload, &SiteConfig::fallback(), &page());

        assert_eq!(request.name.chars().count(), FIELD_LIMITS.name);
        assert_eq!(request.phone.chars().count(), FIELD_LIMITS.phone);
        assert_eq!(request.message.chars().count(), FIELD_LIMITS.message);
        assert_eq!(request.quiz.map(|q| q.chars().count()), Some(FIELD_LIMITS.quiz));
    }
}
