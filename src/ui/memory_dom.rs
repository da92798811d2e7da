use crate::ui::dom::{Dom, Element, FormId, HiddenInput, ObserverOptions, CALLBACK_MODAL};
use std::collections::{BTreeMap, BTreeSet};

/// State of one element.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub disabled: bool,
    pub height: f64,
}

/// One form control.
#[derive(Debug, Clone)]
pub struct Input {
    pub name: String,
    pub value: String,
    pub checked: bool,
    pub checkbox: bool,
    pub required: bool,
    pub hidden: Option<HiddenInput>,
    default_value: String,
    default_checked: bool,
}

impl Input {
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            checked: false,
            checkbox: false,
            required: false,
            hidden: None,
            default_value: String::new(),
            default_checked: false,
        }
    }

    pub fn checkbox(name: &str) -> Self {
        Self {
            checkbox: true,
            ..Self::text(name)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn is_valid(&self) -> bool {
        if !self.required {
            return true;
        }
        if self.checkbox {
            self.checked
        } else {
            !self.value.is_empty()
        }
    }

    fn reset(&mut self) {
        self.value = self.default_value.clone();
        self.checked = self.default_checked;
    }
}

/// One `form.lead-form`.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    pub inputs: Vec<Input>,
    pub dataset: BTreeMap<String, String>,
    /// How often the browser validation UI was shown.
    pub validity_reports: usize,
    pub resets: usize,
}

impl MemoryForm {
    fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|input| input.name == name)
    }

    fn input_mut(&mut self, name: &str) -> Option<&mut Input> {
        self.inputs.iter_mut().find(|input| input.name == name)
    }
}

/// Headless document.
///
/// Holds just enough structure for the controller: element classes,
/// attributes, styles and texts, lead forms with their inputs, and the set of
/// elements under intersection observation.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    nodes: BTreeMap<Element, Node>,
    forms: BTreeMap<FormId, MemoryForm>,
    observed: BTreeMap<Element, ObserverOptions>,
    reveal_count: usize,
    scroll_y: f64,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// The landing page layout: loader, header, burger menu, callback modal
    /// with one lead form, lightbox and `reveal_count` reveal elements.
    pub fn landing_page(reveal_count: usize) -> Self {
        let mut dom = Self::new();
        dom.insert(Element::Root);
        dom.insert(Element::Body).classes.insert("loading".to_string());
        dom.insert(Element::Loader);
        dom.insert(Element::Header).height = 71.4;
        dom.insert(Element::Burger);
        dom.insert(Element::MobileMenu);
        dom.insert(Element::Modal(CALLBACK_MODAL.to_string()));
        dom.insert(Element::Lightbox);
        dom.insert(Element::LightboxImage);
        for index in 0..reveal_count {
            dom.insert(Element::Reveal(index));
        }
        dom.reveal_count = reveal_count;
        dom.add_lead_form(FormId::new("callback-form"), "callback", "Отправить");
        dom
    }

    /// Adds an element (or returns the existing one).
    pub fn insert(&mut self, element: Element) -> &mut Node {
        self.nodes.entry(element).or_default()
    }

    pub fn node(&self, element: &Element) -> Option<&Node> {
        self.nodes.get(element)
    }

    /// Adds a lead form with name, phone, consent checkboxes, a submit button
    /// and an error node; phone and personal-data consent are `required`.
    pub fn add_lead_form(&mut self, id: FormId, source: &str, button_label: &str) {
        let mut form = MemoryForm::default();
        form.inputs.push(Input::text("name"));
        form.inputs.push(Input::text("phone").required());
        form.inputs.push(Input::checkbox("consent_pd").required());
        form.inputs.push(Input::checkbox("consent_ads"));
        form.dataset.insert("source".to_string(), source.to_string());

        self.insert(Element::SubmitButton(id.clone())).text = button_label.to_string();
        self.insert(Element::FormError(id.clone()));
        self.forms.insert(id, form);
    }

    pub fn form(&self, id: &FormId) -> Option<&MemoryForm> {
        self.forms.get(id)
    }

    pub fn form_mut(&mut self, id: &FormId) -> Option<&mut MemoryForm> {
        self.forms.get_mut(id)
    }

    /// Types into a text input.
    pub fn fill(&mut self, form: &FormId, name: &str, value: &str) {
        if let Some(input) = self.forms.get_mut(form).and_then(|f| f.input_mut(name)) {
            input.value = value.to_string();
        }
    }

    pub fn check(&mut self, form: &FormId, name: &str, checked: bool) {
        if let Some(input) = self.forms.get_mut(form).and_then(|f| f.input_mut(name)) {
            input.checked = checked;
        }
    }

    /// Relaxes native validation so the controller's own checks are reached.
    pub fn drop_required(&mut self, form: &FormId) {
        if let Some(form) = self.forms.get_mut(form) {
            for input in &mut form.inputs {
                input.required = false;
            }
        }
    }

    pub fn set_scroll_y(&mut self, offset: f64) {
        self.scroll_y = offset;
    }

    pub fn set_height(&mut self, element: &Element, height: f64) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.height = height;
        }
    }

    pub fn attribute(&self, element: &Element, name: &str) -> Option<&str> {
        self.nodes
            .get(element)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    pub fn style(&self, element: &Element, property: &str) -> Option<&str> {
        self.nodes
            .get(element)
            .and_then(|node| node.style.get(property))
            .map(String::as_str)
    }

    pub fn is_disabled(&self, element: &Element) -> bool {
        self.nodes.get(element).is_some_and(|node| node.disabled)
    }

    pub fn is_observed(&self, element: &Element) -> bool {
        self.observed.contains_key(element)
    }
}

impl Dom for MemoryDom {
    fn exists(&self, element: &Element) -> bool {
        self.nodes.contains_key(element)
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|node| node.classes.contains(class))
    }

    fn set_class(&mut self, element: &Element, class: &str, on: bool) {
        if let Some(node) = self.nodes.get_mut(element) {
            if on {
                node.classes.insert(class.to_string());
            } else {
                node.classes.remove(class);
            }
        }
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn set_style(&mut self, element: &Element, property: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            if value.is_empty() {
                node.style.remove(property);
            } else {
                node.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn text(&self, element: &Element) -> String {
        self.nodes
            .get(element)
            .map(|node| node.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, element: &Element, text: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.text = text.to_string();
        }
    }

    fn set_disabled(&mut self, element: &Element, disabled: bool) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.disabled = disabled;
        }
    }

    fn remove(&mut self, element: &Element) {
        self.nodes.remove(element);
        self.observed.remove(element);
    }

    fn bounding_height(&self, element: &Element) -> f64 {
        self.nodes.get(element).map_or(0.0, |node| node.height)
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn reveal_targets(&self) -> Vec<Element> {
        (0..self.reveal_count)
            .map(Element::Reveal)
            .filter(|element| self.nodes.contains_key(element))
            .collect()
    }

    fn observe(&mut self, element: &Element, options: &ObserverOptions) {
        if self.nodes.contains_key(element) {
            self.observed.insert(element.clone(), *options);
        }
    }

    fn unobserve(&mut self, element: &Element) {
        self.observed.remove(element);
    }

    fn lead_forms(&self) -> Vec<FormId> {
        self.forms.keys().cloned().collect()
    }

    fn has_input(&self, form: &FormId, name: &str) -> bool {
        self.forms
            .get(form)
            .is_some_and(|f| f.input(name).is_some())
    }

    fn input_value(&self, form: &FormId, name: &str) -> Option<String> {
        self.forms
            .get(form)
            .and_then(|f| f.input(name))
            .map(|input| input.value.clone())
    }

    fn first_input_value(&self, form: &FormId, names: &[&str]) -> Option<String> {
        self.forms
            .get(form)?
            .inputs
            .iter()
            .find(|input| names.contains(&input.name.as_str()))
            .map(|input| input.value.clone())
    }

    fn is_checked(&self, form: &FormId, name: &str) -> bool {
        self.forms
            .get(form)
            .and_then(|f| f.input(name))
            .is_some_and(|input| input.checked)
    }

    fn dataset(&self, form: &FormId, key: &str) -> Option<String> {
        self.forms
            .get(form)
            .and_then(|f| f.dataset.get(key))
            .cloned()
    }

    fn append_input(&mut self, form: &FormId, input: HiddenInput) {
        if let Some(f) = self.forms.get_mut(form) {
            let mut control = Input::text(&input.name);
            control.hidden = Some(input);
            f.inputs.push(control);
        }
    }

    fn check_validity(&self, form: &FormId) -> bool {
        self.forms
            .get(form)
            .is_some_and(|f| f.inputs.iter().all(Input::is_valid))
    }

    fn report_validity(&mut self, form: &FormId) {
        if let Some(f) = self.forms.get_mut(form) {
            f.validity_reports += 1;
        }
    }

    fn reset_form(&mut self, form: &FormId) {
        if let Some(f) = self.forms.get_mut(form) {
            f.inputs.iter_mut().for_each(Input::reset);
            f.resets += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_elements_are_ignored() {
        let mut dom = MemoryDom::new();
        dom.set_class(&Element::Burger, "active", true);
        dom.set_text(&Element::Loader, "x");

        assert!(!dom.exists(&Element::Burger));
        assert!(!dom.has_class(&Element::Burger, "active"));
        assert_eq!(dom.text(&Element::Loader), "");
    }

    #[test]
    fn test_native_validity_and_reset() {
        let mut dom = MemoryDom::landing_page(0);
        let form = FormId::new("callback-form");
        assert!(!dom.check_validity(&form));

        dom.fill(&form, "phone", "+7 900 000 00 00");
        dom.check(&form, "consent_pd", true);
        assert!(dom.check_validity(&form));

        dom.reset_form(&form);
        assert_eq!(dom.input_value(&form, "phone").as_deref(), Some(""));
        assert!(!dom.is_checked(&form, "consent_pd"));
        assert_eq!(dom.form(&form).map(|f| f.resets), Some(1));
    }

    #[test]
    fn test_removed_element_stops_being_observed() {
        let mut dom = MemoryDom::landing_page(2);
        let options = ObserverOptions {
            threshold: 0.15,
            root_margin_bottom: -50.0,
        };
        dom.observe(&Element::Reveal(1), &options);
        dom.remove(&Element::Reveal(1));

        assert!(!dom.is_observed(&Element::Reveal(1)));
        assert_eq!(dom.reveal_targets(), vec![Element::Reveal(0)]);
    }
}
