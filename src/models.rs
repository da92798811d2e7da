use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============ Site Configuration ============

/// Per-site routing data attached to every lead.
///
/// Loaded from `site.config.json` and overlaid onto [`SiteConfig::fallback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Site identifier understood by the intake script.
    pub site_id: String,
    /// Public site URL echoed into the lead.
    pub site_url: String,
    /// Chat the intake script forwards leads to.
    pub chat_id: String,
}

impl SiteConfig {
    /// Values used when `site.config.json` is missing or unreadable.
    pub fn fallback() -> Self {
        Self {
            site_id: "volna-alean".to_string(),
            site_url: "https://xn----7sbabjp5bepdj.xn--p1ai".to_string(),
            chat_id: "-1003736835402".to_string(),
        }
    }

    /// Overlays the keys present in a fetched document; fetched values win.
    ///
    /// Anything other than a JSON object leaves the configuration untouched.
    pub fn overlay(mut self, document: &Value) -> Self {
        let Some(fields) = document.as_object() else {
            return self;
        };

        if let Some(value) = fields.get("siteId") {
            self.site_id = value_text(value);
        }
        if let Some(value) = fields.get("siteUrl") {
            self.site_url = value_text(value);
        }
        if let Some(value) = fields.get("chatId") {
            self.chat_id = value_text(value);
        }
        self
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Text form of a loosely typed config value (`null` becomes empty).
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts any JSON value for a text field; numbers and booleans keep their
/// JSON spelling.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(value_text(&value)))
}

// ============ Lead Payload ============

/// UTM tags; an empty string counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_source: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_medium: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_campaign: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_content: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_term: Option<String>,
}

/// Lead as handed over by a form or any other caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub email: Option<String>,
    /// Form identifier; `"lead"` when missing.
    #[serde(default, deserialize_with = "loose_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub message: Option<String>,
    /// Honeypot value; bots fill it, people don't.
    #[serde(default, deserialize_with = "loose_text")]
    pub hp: Option<String>,
    /// Quiz answers, either preformatted text or any JSON structure.
    #[serde(default)]
    pub quiz: Option<Value>,
    #[serde(default, deserialize_with = "loose_text")]
    pub page_url: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub site_host: Option<String>,
    /// Nested UTM object, second in precedence.
    #[serde(default)]
    pub utm: Option<UtmParams>,
    /// Top-level `utm_*` fields, first in precedence.
    #[serde(flatten)]
    pub utm_fields: UtmParams,
}

impl LeadPayload {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_honeypot(mut self, hp: impl Into<String>) -> Self {
        self.hp = Some(hp.into());
        self
    }
}

// ============ Wire Format ============

/// Maximum length, in characters, of every transmitted field.
#[derive(Debug, Clone, Copy)]
pub struct FieldLimits {
    pub site_id: usize,
    pub site_url: usize,
    pub chat_id: usize,
    pub name: usize,
    pub phone: usize,
    pub email: usize,
    pub source: usize,
    pub message: usize,
    pub quiz: usize,
    pub page_url: usize,
    pub site_host: usize,
    pub hp: usize,
    /// Shared by all five UTM fields.
    pub utm: usize,
}

pub const FIELD_LIMITS: FieldLimits = FieldLimits {
    site_id: 80,
    site_url: 255,
    chat_id: 80,
    name: 100,
    phone: 30,
    email: 120,
    source: 80,
    message: 4000,
    quiz: 12000,
    page_url: 1500,
    site_host: 255,
    hp: 255,
    utm: 120,
};

/// Normalized record sent to the intake endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatLeadRequest {
    #[serde(rename = "siteId")]
    pub site_id: String,
    #[serde(rename = "siteUrl")]
    pub site_url: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub source: String,
    pub message: String,
    pub hp: String,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    #[serde(rename = "siteHost")]
    pub site_host: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub utm_content: String,
    pub utm_term: String,
    /// Omitted from the wire when there is no quiz.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<String>,
}

impl FlatLeadRequest {
    /// Wire field names and values in transmission order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("siteId", self.site_id.as_str()),
            ("siteUrl", self.site_url.as_str()),
            ("chatId", self.chat_id.as_str()),
            ("name", self.name.as_str()),
            ("phone", self.phone.as_str()),
            ("email", self.email.as_str()),
            ("source", self.source.as_str()),
            ("message", self.message.as_str()),
            ("hp", self.hp.as_str()),
            ("pageUrl", self.page_url.as_str()),
            ("siteHost", self.site_host.as_str()),
            ("utm_source", self.utm_source.as_str()),
            ("utm_medium", self.utm_medium.as_str()),
            ("utm_campaign", self.utm_campaign.as_str()),
            ("utm_content", self.utm_content.as_str()),
            ("utm_term", self.utm_term.as_str()),
        ];
        if let Some(quiz) = &self.quiz {
            pairs.push(("quiz", quiz.as_str()));
        }
        pairs
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

/// Acknowledgement of an accepted lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadAck {
    pub ok: bool,
}

impl LeadAck {
    pub fn accepted() -> Self {
        Self { ok: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overlay_keeps_missing_keys() {
        let config = SiteConfig::fallback().overlay(&json!({ "siteId": "other-site" }));

        assert_eq!(config.site_id, "other-site");
        assert_eq!(config.site_url, SiteConfig::fallback().site_url);
        assert_eq!(config.chat_id, SiteConfig::fallback().chat_id);
    }

    #[test]
    fn test_overlay_coerces_loose_values() {
        let config = SiteConfig::fallback().overlay(&json!({ "chatId": -100500, "siteUrl": null }));

        assert_eq!(config.chat_id, "-100500");
        assert_eq!(config.site_url, "");
    }

    #[test]
    fn test_overlay_ignores_non_objects() {
        let config = SiteConfig::fallback().overlay(&json!(["siteId", "x"]));
        assert_eq!(config, SiteConfig::fallback());
    }

    #[test]
    fn test_payload_accepts_both_utm_shapes() {
        let payload: LeadPayload = serde_json::from_value(json!({
            "name": "Анна",
            "phone": "+7 900 000-00-00",
            "pageUrl": "https://example.com/a",
            "utm_source": "direct",
            "utm": { "utm_source": "nested", "utm_term": "отдых" },
            "quiz": { "guests": 3 }
        }))
        .unwrap();

        assert_eq!(payload.utm_fields.utm_source.as_deref(), Some("direct"));
        assert_eq!(
            payload.utm.as_ref().and_then(|u| u.utm_term.as_deref()),
            Some("отдых")
        );
        assert_eq!(payload.page_url.as_deref(), Some("https://example.com/a"));
        assert_eq!(payload.quiz, Some(json!({ "guests": 3 })));
    }

    #[test]
    fn test_payload_accepts_non_string_fields() {
        let payload: LeadPayload = serde_json::from_value(json!({
            "name": "a",
            "phone": 79001234567u64,
            "hp": null,
            "utm_content": 42,
            "utm": { "utm_term": true }
        }))
        .unwrap();

        assert_eq!(payload.phone.as_deref(), Some("79001234567"));
        assert_eq!(payload.hp.as_deref(), Some(""));
        assert_eq!(payload.utm_fields.utm_content.as_deref(), Some("42"));
        assert_eq!(
            payload.utm.as_ref().and_then(|u| u.utm_term.as_deref()),
            Some("true")
        );
        assert_eq!(payload.email, None);
    }

    #[test]
    fn test_form_body_encodes_spaces_and_omits_empty_quiz() {
        let request = FlatLeadRequest {
            site_id: "s".to_string(),
            site_url: "https://example.com".to_string(),
            chat_id: "1".to_string(),
            name: "Иван Петров".to_string(),
            phone: "+7 900".to_string(),
            email: String::new(),
            source: "lead".to_string(),
            message: "a&b".to_string(),
            hp: String::new(),
            page_url: "https://example.com/".to_string(),
            site_host: "example.com".to_string(),
            utm_source: String::new(),
            utm_medium: String::new(),
            utm_campaign: String::new(),
            utm_content: String::new(),
            utm_term: String::new(),
            quiz: None,
        };

        let body = request.to_form_body();
        assert!(body.starts_with("siteId=s&siteUrl=https%3A%2F%2Fexample.com&chatId=1&name="));
        assert!(body.contains("phone=%2B7+900"));
        assert!(body.contains("message=a%26b"));
        assert!(body.ends_with("utm_term="));
        assert!(!body.contains("quiz"));
    }
}
