use url::Url;

/// Location of the page the lead is captured on.
///
/// Stands in for `window.location`: provides the origin used as a site URL
/// fallback, the href and hostname defaults for a lead, and the query-string
/// UTM parameters.
#[derive(Debug, Clone)]
pub struct PageContext {
    url: Url,
}

impl PageContext {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Full page address, including query and fragment.
    pub fn href(&self) -> String {
        self.url.to_string()
    }

    /// `scheme://host[:port]`, or `null` for opaque origins.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    pub fn hostname(&self) -> String {
        self.url.host_str().unwrap_or_default().to_string()
    }

    /// First value of a query parameter; empty string when absent.
    pub fn query_param(&self, name: &str) -> String {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    }
}
