use crate::lead_client::LeadSink;
use crate::session::SessionStore;
use crate::ui::controller::UiController;
use crate::ui::dom::Dom;
use crate::ui::events::{Effect, UiEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sender side of the page's event loop.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl UiHandle {
    /// Queues an event; returns `false` once the loop has stopped.
    pub fn send(&self, event: UiEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Event loop around a [`UiController`].
///
/// Events are handled one at a time, in arrival order. Timers and lead
/// submissions run as separate tasks that report back through the same queue,
/// so the controller is never touched concurrently.
pub struct UiRuntime<D, S, K> {
    controller: UiController<D, S>,
    sink: Arc<K>,
    tx: mpsc::UnboundedSender<UiEvent>,
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl<D, S, K> UiRuntime<D, S, K>
where
    D: Dom,
    S: SessionStore,
    K: LeadSink + Send + Sync + 'static,
{
    /// Mounts the controller and returns the loop with a handle to feed it.
    pub fn new(mut controller: UiController<D, S>, sink: Arc<K>) -> (Self, UiHandle) {
        controller.mount();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = UiHandle { tx: tx.clone() };
        (
            Self {
                controller,
                sink,
                tx,
                rx,
            },
            handle,
        )
    }

    /// Runs until `UiEvent::Unload` and hands the controller back.
    pub async fn run(mut self) -> UiController<D, S> {
        while let Some(event) = self.rx.recv().await {
            if matches!(event, UiEvent::Unload) {
                tracing::debug!("Page unloaded, stopping event loop");
                break;
            }
            for effect in self.controller.dispatch(event) {
                self.execute(effect);
            }
        }
        self.controller
    }

    fn execute(&self, effect: Effect) {
        let tx = self.tx.clone();
        match effect {
            Effect::Schedule { after, timer } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(UiEvent::Timer(timer));
                });
            }
            Effect::SendLead { form, payload } => {
                let sink = Arc::clone(&self.sink);
                tokio::spawn(async move {
                    let outcome = sink.send_lead(payload).await;
                    let _ = tx.send(UiEvent::LeadSettled { form, outcome });
                });
            }
        }
    }
}
