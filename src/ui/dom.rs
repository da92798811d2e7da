//! The DOM surface the controller works against.

use std::fmt;

/// Identifier of the callback modal opened by CTA buttons and the auto-popup.
pub const CALLBACK_MODAL: &str = "callbackModal";

/// A lead form (`form.lead-form`), keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(pub String);

impl FormId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Elements the controller touches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    /// `<html>`, carrier of CSS custom properties.
    Root,
    Body,
    /// `.loader`
    Loader,
    /// `.site-header`
    Header,
    /// `.burger-menu`
    Burger,
    /// `.mobile-menu`
    MobileMenu,
    /// `.modal-overlay` with the given id.
    Modal(String),
    /// `#lightbox`
    Lightbox,
    /// `.lightbox-img`
    LightboxImage,
    /// n-th `.reveal-up, .reveal-img` element in document order.
    Reveal(usize),
    /// `button[type=submit]` of a lead form.
    SubmitButton(FormId),
    /// `.form-error` of a lead form.
    FormError(FormId),
}

/// Hidden input appended to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenInput {
    pub name: String,
    pub tab_index: i32,
    pub autocomplete: String,
    pub aria_hidden: bool,
    pub display_none: bool,
}

impl HiddenInput {
    /// Off-screen text input that only bots fill in.
    pub fn honeypot(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tab_index: -1,
            autocomplete: "off".to_string(),
            aria_hidden: true,
            display_none: true,
        }
    }
}

/// Visibility watcher configuration (`IntersectionObserver` options).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Bottom root margin in px; negative shrinks the viewport.
    pub root_margin_bottom: f64,
}

impl ObserverOptions {
    /// `rootMargin` in CSS shorthand.
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", self.root_margin_bottom)
    }
}

/// Browser document as seen by the controller.
///
/// Missing elements are tolerated everywhere: writes to an element that does
/// not exist are ignored and reads return neutral values.
pub trait Dom {
    fn exists(&self, element: &Element) -> bool;

    fn has_class(&self, element: &Element, class: &str) -> bool;
    /// Adds (`on`) or removes a class.
    fn set_class(&mut self, element: &Element, class: &str, on: bool);
    fn set_attribute(&mut self, element: &Element, name: &str, value: &str);
    /// Sets an inline style property; an empty value removes it.
    fn set_style(&mut self, element: &Element, property: &str, value: &str);
    fn text(&self, element: &Element) -> String;
    fn set_text(&mut self, element: &Element, text: &str);
    fn set_disabled(&mut self, element: &Element, disabled: bool);
    /// Detaches the element for good.
    fn remove(&mut self, element: &Element);

    /// Rendered height in px (`getBoundingClientRect().height`).
    fn bounding_height(&self, element: &Element) -> f64;
    /// Vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;

    fn reveal_targets(&self) -> Vec<Element>;
    fn observe(&mut self, element: &Element, options: &ObserverOptions);
    fn unobserve(&mut self, element: &Element);

    fn lead_forms(&self) -> Vec<FormId>;
    fn has_input(&self, form: &FormId, name: &str) -> bool;
    /// Current value of a named input, if the input exists.
    fn input_value(&self, form: &FormId, name: &str) -> Option<String>;
    /// Value of the first input, in document order, named any of `names`.
    fn first_input_value(&self, form: &FormId, names: &[&str]) -> Option<String>;
    fn is_checked(&self, form: &FormId, name: &str) -> bool;
    /// `data-*` attribute of the form.
    fn dataset(&self, form: &FormId, key: &str) -> Option<String>;
    fn append_input(&mut self, form: &FormId, input: HiddenInput);
    /// Native constraint validation (`form.checkValidity()`).
    fn check_validity(&self, form: &FormId) -> bool;
    /// Shows the browser's validation UI (`form.reportValidity()`).
    fn report_validity(&mut self, form: &FormId);
    /// Restores every input to its default (`form.reset()`).
    fn reset_form(&mut self, form: &FormId);
}
