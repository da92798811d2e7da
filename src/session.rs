use std::collections::HashMap;

/// Key of the flag that suppresses the auto-popup for the rest of the session.
pub const POPUP_SHOWN_KEY: &str = "popupShown";

/// Session-scoped string storage (`sessionStorage` semantics).
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);

    /// Presence check; any stored string counts.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// In-memory session storage; lives as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session where the auto-popup was already shown.
    pub fn with_popup_shown() -> Self {
        let mut session = Self::new();
        session.set(POPUP_SHOWN_KEY, "true");
        session
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_only_flag() {
        let mut session = MemorySession::new();
        assert!(!session.has(POPUP_SHOWN_KEY));

        session.set(POPUP_SHOWN_KEY, "1");
        assert!(session.has(POPUP_SHOWN_KEY));
        assert!(MemorySession::with_popup_shown().has(POPUP_SHOWN_KEY));
    }
}
