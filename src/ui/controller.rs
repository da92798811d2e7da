use crate::errors::AppError;
use crate::models::LeadAck;
use crate::session::{SessionStore, POPUP_SHOWN_KEY};
use crate::ui::dom::{Dom, Element, FormId, CALLBACK_MODAL};
use crate::ui::events::{Effect, Timer, UiEvent};
use crate::ui::form::{self, SubmitPhase};
use crate::ui::overlay::OverlayState;
use crate::ui::reveal::RevealObserver;
use std::collections::HashMap;
use std::time::Duration;

/// Scroll offset past which the header gets its compact look.
const HEADER_SCROLL_OFFSET: f64 = 24.0;

/// Delays of the page's timed behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// From `load` to hiding the preloader.
    pub preload_delay: Duration,
    /// Loader fade-out before it is detached.
    pub loader_fade: Duration,
    /// From preloader end to the unprompted callback modal.
    pub auto_popup_delay: Duration,
    /// How long a sent/failed button keeps its result look.
    pub submit_reset: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            preload_delay: Duration::from_millis(500),
            loader_fade: Duration::from_millis(500),
            auto_popup_delay: Duration::from_secs(18),
            submit_reset: Duration::from_millis(1800),
        }
    }
}

/// Page behaviour as a state machine over a [`Dom`].
///
/// `mount` does the one-time wiring; `dispatch` handles every later event and
/// returns the effects (timers, lead submissions) the host must carry out.
pub struct UiController<D, S> {
    dom: D,
    session: S,
    timings: Timings,
    overlay: OverlayState,
    reveal: RevealObserver,
    submits: HashMap<FormId, SubmitPhase>,
    popup_armed: bool,
}

impl<D: Dom, S: SessionStore> UiController<D, S> {
    pub fn new(dom: D, session: S) -> Self {
        Self::with_timings(dom, session, Timings::default())
    }

    pub fn with_timings(dom: D, session: S, timings: Timings) -> Self {
        Self {
            dom,
            session,
            timings,
            overlay: OverlayState::new(),
            reveal: RevealObserver::new(),
            submits: HashMap::new(),
            popup_armed: false,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn reveal(&self) -> &RevealObserver {
        &self.reveal
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn submit_phase(&self, form: &FormId) -> SubmitPhase {
        self.submits.get(form).cloned().unwrap_or_default()
    }

    /// DOM-ready wiring: header height, reveal observation, honeypots.
    pub fn mount(&mut self) {
        self.sync_header_height();
        self.reveal.observe_all(&mut self.dom);

        for form in self.dom.lead_forms() {
            form::ensure_honeypot(&mut self.dom, &form);
            self.submits.insert(form, SubmitPhase::Idle);
        }
        tracing::debug!("Mounted {} lead forms", self.submits.len());
    }

    /// Single entry point for every page event.
    pub fn dispatch(&mut self, event: UiEvent) -> Vec<Effect> {
        match event {
            UiEvent::Loaded => {
                return vec![self.schedule(self.timings.preload_delay, Timer::Preload)];
            }
            UiEvent::Scroll => {
                if self.dom.exists(&Element::Header) {
                    let scrolled = self.dom.scroll_y() > HEADER_SCROLL_OFFSET;
                    self.dom.set_class(&Element::Header, "scrolled", scrolled);
                    self.sync_header_height();
                }
            }
            UiEvent::Resize | UiEvent::OrientationChange => self.sync_header_height(),
            UiEvent::BurgerClick => {
                let open = !self.dom.has_class(&Element::Burger, "active");
                self.set_menu(open);
            }
            UiEvent::MobileLinkClick => self.set_menu(false),
            UiEvent::OpenModalClick => {
                self.set_menu(false);
                self.open_modal(CALLBACK_MODAL);
            }
            UiEvent::CloseModalClick | UiEvent::ModalBackdropClick(_) => self.close_modals(),
            UiEvent::LightboxTriggerClick { image_src } => self.open_lightbox(image_src),
            UiEvent::LightboxCloseClick | UiEvent::LightboxBackdropClick => {
                self.close_lightbox()
            }
            UiEvent::KeyDown(key) => {
                if key == "Escape" {
                    self.close_all_overlays();
                }
            }
            UiEvent::Intersection(entries) => self.reveal.handle(&mut self.dom, &entries),
            UiEvent::Submit(form) => return self.submit(form),
            UiEvent::LeadSettled { form, outcome } => return self.settle(form, outcome),
            UiEvent::Timer(timer) => return self.fire(timer),
            UiEvent::Unload => {}
        }
        Vec::new()
    }

    fn schedule(&self, after: Duration, timer: Timer) -> Effect {
        Effect::Schedule { after, timer }
    }

    fn fire(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::Preload => {
                let mut effects = Vec::new();
                self.dom.set_class(&Element::Body, "loading", false);
                if self.dom.exists(&Element::Loader) {
                    self.dom.set_style(&Element::Loader, "opacity", "0");
                    effects.push(self.schedule(self.timings.loader_fade, Timer::RemoveLoader));
                }
                effects.extend(self.arm_auto_popup());
                effects
            }
            Timer::RemoveLoader => {
                self.dom.remove(&Element::Loader);
                Vec::new()
            }
            Timer::AutoPopup => {
                if self.session.has(POPUP_SHOWN_KEY) || !self.overlay.is_idle() {
                    tracing::debug!("Auto-popup skipped");
                } else {
                    self.open_modal(CALLBACK_MODAL);
                    self.session.set(POPUP_SHOWN_KEY, "true");
                }
                Vec::new()
            }
            Timer::ResetSubmit(form) => {
                self.reset_submit(form);
                Vec::new()
            }
        }
    }

    fn arm_auto_popup(&mut self) -> Option<Effect> {
        if self.popup_armed || self.session.has(POPUP_SHOWN_KEY) {
            return None;
        }
        self.popup_armed = true;
        Some(self.schedule(self.timings.auto_popup_delay, Timer::AutoPopup))
    }

    // ---- header ----

    fn sync_header_height(&mut self) {
        if !self.dom.exists(&Element::Header) {
            return;
        }
        let height = self.dom.bounding_height(&Element::Header).ceil();
        self.dom
            .set_style(&Element::Root, "--header-height", &format!("{}px", height));
    }

    // ---- overlays ----

    fn apply_scroll_lock(&mut self) {
        let locked = self.overlay.scroll_locked();
        self.dom.set_class(&Element::Body, "no-scroll", locked);
    }

    fn set_menu(&mut self, open: bool) {
        if !self.dom.exists(&Element::Burger) || !self.dom.exists(&Element::MobileMenu) {
            return;
        }
        self.sync_header_height();
        self.overlay.set_menu(open);
        self.dom.set_class(&Element::Burger, "active", open);
        self.dom.set_class(&Element::MobileMenu, "active", open);
        self.dom
            .set_attribute(&Element::Burger, "aria-expanded", &open.to_string());
        self.dom
            .set_attribute(&Element::MobileMenu, "aria-hidden", &(!open).to_string());
        self.apply_scroll_lock();
    }

    fn open_modal(&mut self, id: &str) {
        let modal = Element::Modal(id.to_string());
        if !self.dom.exists(&modal) {
            return;
        }
        self.overlay.open_modal(id);
        self.dom.set_class(&modal, "active", true);
        self.dom.set_attribute(&modal, "aria-hidden", "false");
        self.apply_scroll_lock();
    }

    fn close_modals(&mut self) {
        for id in self.overlay.close_modals() {
            let modal = Element::Modal(id);
            self.dom.set_class(&modal, "active", false);
            self.dom.set_attribute(&modal, "aria-hidden", "true");
        }
        self.apply_scroll_lock();
    }

    fn open_lightbox(&mut self, image_src: Option<String>) {
        if !self.dom.exists(&Element::Lightbox) || !self.dom.exists(&Element::LightboxImage) {
            return;
        }
        let Some(src) = image_src else {
            return;
        };
        self.dom.set_attribute(&Element::LightboxImage, "src", &src);
        self.overlay.set_lightbox(true);
        self.dom.set_class(&Element::Lightbox, "active", true);
        self.dom.set_attribute(&Element::Lightbox, "aria-hidden", "false");
        self.apply_scroll_lock();
    }

    fn close_lightbox(&mut self) {
        if !self.dom.exists(&Element::Lightbox) {
            return;
        }
        self.overlay.set_lightbox(false);
        self.dom.set_class(&Element::Lightbox, "active", false);
        self.dom.set_attribute(&Element::Lightbox, "aria-hidden", "true");
        self.apply_scroll_lock();
    }

    fn close_all_overlays(&mut self) {
        self.close_modals();
        self.close_lightbox();
        self.set_menu(false);
    }

    // ---- lead forms ----

    fn submit(&mut self, form: FormId) -> Vec<Effect> {
        form::show_form_error(&mut self.dom, &form, "");

        let button = Element::SubmitButton(form.clone());
        if !self.dom.exists(&button) {
            return Vec::new();
        }
        if !self.submit_phase(&form).is_idle() {
            tracing::debug!("Ignoring submit of busy form {}", form);
            return Vec::new();
        }

        if !self.dom.check_validity(&form) {
            self.dom.report_validity(&form);
            return Vec::new();
        }

        let payload = match form::read_lead(&self.dom, &form) {
            Ok(payload) => payload,
            Err(AppError::Validation(message)) => {
                form::show_form_error(&mut self.dom, &form, &message);
                return Vec::new();
            }
            Err(e) => {
                tracing::error!("Cannot read form {}: {}", form, e);
                return Vec::new();
            }
        };

        let label = self.dom.text(&button);
        self.dom.set_disabled(&button, true);
        self.dom.set_text(&button, form::LABEL_SENDING);
        self.submits
            .insert(form.clone(), SubmitPhase::Sending { label });

        tracing::info!("Submitting lead from form {}", form);
        vec![Effect::SendLead { form, payload }]
    }

    fn settle(&mut self, form: FormId, outcome: Result<LeadAck, AppError>) -> Vec<Effect> {
        let SubmitPhase::Sending { label } = self.submit_phase(&form) else {
            tracing::warn!("Lead result for form {} that is not sending", form);
            return Vec::new();
        };
        let button = Element::SubmitButton(form.clone());

        let phase = match outcome {
            Ok(_) => {
                form::paint_success(&mut self.dom, &button);
                self.session.set(POPUP_SHOWN_KEY, "true");
                SubmitPhase::Sent { label }
            }
            Err(e) => {
                tracing::error!("Lead submit failed: {}", e);
                form::show_form_error(&mut self.dom, &form, form::SEND_FAILED);
                form::paint_failure(&mut self.dom, &button);
                SubmitPhase::Failed { label }
            }
        };
        self.submits.insert(form.clone(), phase);

        vec![self.schedule(self.timings.submit_reset, Timer::ResetSubmit(form))]
    }

    fn reset_submit(&mut self, form: FormId) {
        let button = Element::SubmitButton(form.clone());
        match self.submit_phase(&form) {
            SubmitPhase::Sent { label } => {
                form::restore_button(&mut self.dom, &button, &label);
                self.dom.reset_form(&form);
                self.close_modals();
            }
            SubmitPhase::Failed { label } => {
                form::restore_button(&mut self.dom, &button, &label);
            }
            SubmitPhase::Idle | SubmitPhase::Sending { .. } => return,
        }
        self.submits.insert(form, SubmitPhase::Idle);
    }
}
