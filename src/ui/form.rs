//! Lead form: honeypot, validation, and the submit button's look per phase.

use crate::errors::AppError;
use crate::models::LeadPayload;
use crate::ui::dom::{Dom, Element, FormId, HiddenInput};

/// Input names a honeypot has gone by; any one of them counts.
pub const HONEYPOT_ALIASES: [&str; 4] = ["hp", "website", "company", "hidden"];

pub const PHONE_REQUIRED: &str = "Укажите номер телефона.";
pub const CONSENT_REQUIRED: &str =
    "Для отправки необходимо согласие на обработку персональных данных.";
pub const SEND_FAILED: &str =
    "Ошибка отправки. Попробуйте еще раз или позвоните 8 (800) 550-51-20.";

pub const LABEL_SENDING: &str = "Отправка...";
pub const LABEL_SENT: &str = "Отправлено";
pub const LABEL_FAILED: &str = "Ошибка";

const SUCCESS_COLOR: &str = "#16a34a";
const ERROR_COLOR: &str = "#dc2626";
const CONTRAST_COLOR: &str = "#fff";

/// Submit button lifecycle; the button is disabled outside `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    /// Waiting for the intake endpoint. Holds the label to restore.
    Sending { label: String },
    Sent { label: String },
    Failed { label: String },
}

impl SubmitPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, SubmitPhase::Idle)
    }
}

/// Inserts a hidden `hp` input unless the form already carries a honeypot.
pub fn ensure_honeypot<D: Dom>(dom: &mut D, form: &FormId) {
    let present = HONEYPOT_ALIASES
        .iter()
        .any(|alias| dom.has_input(form, alias));
    if !present {
        dom.append_input(form, HiddenInput::honeypot("hp"));
    }
}

/// Value of the form's first honeypot input.
fn honeypot_value<D: Dom>(dom: &D, form: &FormId) -> String {
    dom.first_input_value(form, &HONEYPOT_ALIASES)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Writes (or clears, with `""`) the inline error of a form.
pub fn show_form_error<D: Dom>(dom: &mut D, form: &FormId, message: &str) {
    dom.set_text(&Element::FormError(form.clone()), message);
}

/// One-line summary of where the lead came from and what was consented to.
pub fn compose_message(source: &str, consent_pd: bool, consent_ads: bool) -> String {
    let yes_no = |flag: bool| if flag { "да" } else { "нет" };
    [
        format!("Форма: {}", source),
        format!("Согласие ПД: {}", yes_no(consent_pd)),
        format!("Согласие реклама: {}", yes_no(consent_ads)),
    ]
    .join(" | ")
}

/// Reads the form and checks phone and personal-data consent.
///
/// These checks repeat what `required` attributes already enforce natively.
pub fn read_lead<D: Dom>(dom: &D, form: &FormId) -> Result<LeadPayload, AppError> {
    let field = |name: &str| {
        dom.input_value(form, name)
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let source = dom
        .dataset(form, "source")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "lead".to_string());
    let name = field("name");
    let phone = field("phone");
    let consent_pd = dom.is_checked(form, "consent_pd");
    let consent_ads = dom.is_checked(form, "consent_ads");

    if phone.is_empty() {
        return Err(AppError::Validation(PHONE_REQUIRED.to_string()));
    }
    if !consent_pd {
        return Err(AppError::Validation(CONSENT_REQUIRED.to_string()));
    }

    let message = compose_message(&source, consent_pd, consent_ads);
    Ok(LeadPayload::new(name, phone)
        .with_source(source)
        .with_message(message)
        .with_honeypot(honeypot_value(dom, form)))
}

/// Paints the button in a result palette, or clears it with `None`.
pub fn paint_button<D: Dom>(dom: &mut D, button: &Element, color: Option<&str>) {
    let (background, text) = match color {
        Some(color) => (color, CONTRAST_COLOR),
        None => ("", ""),
    };
    dom.set_style(button, "background-color", background);
    dom.set_style(button, "border-color", background);
    dom.set_style(button, "color", text);
}

pub fn paint_success<D: Dom>(dom: &mut D, button: &Element) {
    dom.set_text(button, LABEL_SENT);
    paint_button(dom, button, Some(SUCCESS_COLOR));
}

pub fn paint_failure<D: Dom>(dom: &mut D, button: &Element) {
    dom.set_text(button, LABEL_FAILED);
    paint_button(dom, button, Some(ERROR_COLOR));
}

/// Back to the remembered label and default colours, enabled.
pub fn restore_button<D: Dom>(dom: &mut D, button: &Element, label: &str) {
    dom.set_disabled(button, false);
    dom.set_text(button, label);
    paint_button(dom, button, None);
}
