//! Landing page behaviour: overlays, header, reveal animations, lead forms.

pub mod controller;
pub mod dom;
pub mod events;
pub mod form;
pub mod memory_dom;
pub mod overlay;
pub mod reveal;
pub mod runtime;

pub use controller::{Timings, UiController};
pub use dom::{Dom, Element, FormId, CALLBACK_MODAL};
pub use events::{Effect, Timer, UiEvent};
pub use form::SubmitPhase;
pub use memory_dom::MemoryDom;
pub use overlay::OverlayState;
pub use reveal::IntersectionEntry;
pub use runtime::{UiHandle, UiRuntime};
