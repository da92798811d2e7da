use std::collections::BTreeSet;

/// Everything that can cover the page: mobile menu, modals, lightbox.
///
/// The body scroll lock is derived from this aggregate, never toggled on its
/// own, so closing one overlay cannot unlock scrolling while another one is
/// still open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    menu_open: bool,
    active_modals: BTreeSet<String>,
    lightbox_open: bool,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn lightbox_open(&self) -> bool {
        self.lightbox_open
    }

    pub fn is_modal_open(&self, id: &str) -> bool {
        self.active_modals.contains(id)
    }

    pub fn any_modal_open(&self) -> bool {
        !self.active_modals.is_empty()
    }

    pub fn set_menu(&mut self, open: bool) {
        self.menu_open = open;
    }

    pub fn open_modal(&mut self, id: &str) {
        self.active_modals.insert(id.to_string());
    }

    /// Closes every modal and returns the ids that were open.
    pub fn close_modals(&mut self) -> Vec<String> {
        std::mem::take(&mut self.active_modals).into_iter().collect()
    }

    pub fn set_lightbox(&mut self, open: bool) {
        self.lightbox_open = open;
    }

    /// Menu, any modal or the lightbox is open.
    pub fn scroll_locked(&self) -> bool {
        self.menu_open || self.any_modal_open() || self.lightbox_open
    }

    /// Nothing covers the page.
    pub fn is_idle(&self) -> bool {
        !self.scroll_locked()
    }
}
