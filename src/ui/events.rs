use crate::errors::AppError;
use crate::models::{LeadAck, LeadPayload};
use crate::ui::dom::FormId;
use crate::ui::reveal::IntersectionEntry;
use std::time::Duration;

/// Everything the page reacts to.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// `window.load`: all resources are in.
    Loaded,
    Scroll,
    Resize,
    OrientationChange,
    BurgerClick,
    MobileLinkClick,
    /// Click on any `.open-modal` call to action.
    OpenModalClick,
    /// Click on any `.close-modal` button.
    CloseModalClick,
    /// Click that landed on the modal overlay itself, not its content.
    ModalBackdropClick(String),
    /// Click on a `.lightbox-trigger`; carries the `src` of its image, if any.
    LightboxTriggerClick { image_src: Option<String> },
    LightboxCloseClick,
    LightboxBackdropClick,
    KeyDown(String),
    Intersection(Vec<IntersectionEntry>),
    Submit(FormId),
    /// Outcome of the lead submission started for a form.
    LeadSettled {
        form: FormId,
        outcome: Result<LeadAck, AppError>,
    },
    Timer(Timer),
    /// Page is going away; the runtime stops.
    Unload,
}

/// Deferred work scheduled by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    /// Hide the preloader.
    Preload,
    /// Detach the faded-out loader.
    RemoveLoader,
    /// Show the callback modal unprompted.
    AutoPopup,
    /// Return the form's submit button to its idle look.
    ResetSubmit(FormId),
}

/// Side effects the runtime carries out for the controller.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Deliver `Timer` back as an event once `after` has elapsed.
    Schedule { after: Duration, timer: Timer },
    /// Hand the lead to the sink; report back with `UiEvent::LeadSettled`.
    SendLead { form: FormId, payload: LeadPayload },
}
