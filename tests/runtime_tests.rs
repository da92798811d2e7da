/// Event loop tests
/// Drives `UiRuntime` on a paused tokio clock with a stub lead sink
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use volna_landing::errors::AppError;
use volna_landing::lead_client::LeadSink;
use volna_landing::models::{LeadAck, LeadPayload};
use volna_landing::session::{MemorySession, SessionStore, POPUP_SHOWN_KEY};
use volna_landing::ui::form::{LABEL_SENT, SEND_FAILED};
use volna_landing::ui::{
    Dom, Element, FormId, MemoryDom, SubmitPhase, UiController, UiEvent, UiHandle, UiRuntime,
    CALLBACK_MODAL,
};

/// Records every lead and answers with a fixed outcome.
struct StubSink {
    fail: bool,
    calls: AtomicUsize,
    last: Mutex<Option<LeadPayload>>,
}

impl StubSink {
    fn accepting() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LeadSink for StubSink {
    fn send_lead(
        &self,
        payload: LeadPayload,
    ) -> impl Future<Output = Result<LeadAck, AppError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(payload);
        let fail = self.fail;
        async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            if fail {
                Err(AppError::Timeout(Duration::from_secs(10)))
            } else {
                Ok(LeadAck::accepted())
            }
        }
    }
}

type Page = UiController<MemoryDom, MemorySession>;

fn form() -> FormId {
    FormId::new("callback-form")
}

fn page(session: MemorySession) -> Page {
    UiController::new(MemoryDom::landing_page(2), session)
}

fn page_fresh() -> Page {
    page(MemorySession::new())
}

/// Starts the loop, lets `script` feed it, then unloads and returns the page.
async fn run_page<F, Fut>(page: Page, sink: Arc<StubSink>, script: F) -> Page
where
    F: FnOnce(UiHandle) -> Fut,
    Fut: Future<Output = UiHandle>,
{
    let (runtime, handle) = UiRuntime::new(page, sink);
    let task = tokio::spawn(runtime.run());
    let handle = script(handle).await;
    assert!(handle.send(UiEvent::Unload));
    task.await.unwrap()
}

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn test_preloader_cleared_and_removed() {
    let page = run_page(page_fresh(), StubSink::accepting(), |h| async move {
        h.send(UiEvent::Loaded);
        wait(600).await;
        h
    })
    .await;
    assert!(!page.dom().has_class(&Element::Body, "loading"));
    assert!(page.dom().exists(&Element::Loader));

    let page = run_page(page_fresh(), StubSink::accepting(), |h| async move {
        h.send(UiEvent::Loaded);
        wait(1100).await;
        h
    })
    .await;
    assert!(!page.dom().exists(&Element::Loader));
}

#[tokio::test(start_paused = true)]
async fn test_auto_popup_fires_after_delay() {
    let early = run_page(page_fresh(), StubSink::accepting(), |h| async move {
        h.send(UiEvent::Loaded);
        wait(18_400).await;
        h
    })
    .await;
    assert!(!early.overlay().is_modal_open(CALLBACK_MODAL));

    let late = run_page(page_fresh(), StubSink::accepting(), |h| async move {
        h.send(UiEvent::Loaded);
        wait(18_600).await;
        h
    })
    .await;
    assert!(late.overlay().is_modal_open(CALLBACK_MODAL));
    assert!(late.dom().has_class(&Element::Body, "no-scroll"));
    assert!(late.session().has(POPUP_SHOWN_KEY));
}

#[tokio::test(start_paused = true)]
async fn test_no_auto_popup_when_already_shown() {
    let page = run_page(
        page(MemorySession::with_popup_shown()),
        StubSink::accepting(),
        |h| async move {
            h.send(UiEvent::Loaded);
            wait(30_000).await;
            h
        },
    )
    .await;
    assert!(!page.overlay().is_modal_open(CALLBACK_MODAL));
}

#[tokio::test(start_paused = true)]
async fn test_no_auto_popup_while_menu_open() {
    let page = run_page(page_fresh(), StubSink::accepting(), |h| async move {
        h.send(UiEvent::Loaded);
        wait(5_000).await;
        h.send(UiEvent::BurgerClick);
        wait(20_000).await;
        h
    })
    .await;
    assert!(page.overlay().menu_open());
    assert!(!page.overlay().is_modal_open(CALLBACK_MODAL));
    assert!(!page.session().has(POPUP_SHOWN_KEY));
}

#[tokio::test(start_paused = true)]
async fn test_submit_round_trip_success() {
    let sink = StubSink::accepting();
    let mut ui = page_fresh();
    ui.dom_mut().fill(&form(), "name", "Олег");
    ui.dom_mut().fill(&form(), "phone", "89001112233");
    ui.dom_mut().check(&form(), "consent_pd", true);
    ui.dom_mut().check(&form(), "consent_ads", true);

    // stop while the button still shows the result
    let mid = run_page(ui, Arc::clone(&sink), |h| async move {
        h.send(UiEvent::OpenModalClick);
        h.send(UiEvent::Submit(form()));
        h.send(UiEvent::Submit(form()));
        wait(1_000).await;
        h
    })
    .await;
    assert_eq!(sink.calls(), 1);
    assert_eq!(mid.dom().text(&Element::SubmitButton(form())), LABEL_SENT);
    assert!(matches!(mid.submit_phase(&form()), SubmitPhase::Sent { .. }));
    assert!(mid.session().has(POPUP_SHOWN_KEY));

    let sent = sink.last.lock().unwrap().clone().unwrap();
    assert_eq!(sent.phone.as_deref(), Some("89001112233"));
    assert_eq!(
        sent.message.as_deref(),
        Some("Форма: callback | Согласие ПД: да | Согласие реклама: да")
    );
}

#[tokio::test(start_paused = true)]
async fn test_submit_success_resets_form_and_closes_modal() {
    let sink = StubSink::accepting();
    let mut ui = page_fresh();
    ui.dom_mut().fill(&form(), "phone", "89001112233");
    ui.dom_mut().check(&form(), "consent_pd", true);

    let done = run_page(ui, Arc::clone(&sink), |h| async move {
        h.send(UiEvent::OpenModalClick);
        h.send(UiEvent::Submit(form()));
        wait(2_500).await;
        h
    })
    .await;
    assert_eq!(done.submit_phase(&form()), SubmitPhase::Idle);
    assert_eq!(done.dom().text(&Element::SubmitButton(form())), "Отправить");
    assert_eq!(done.dom().input_value(&form(), "phone").as_deref(), Some(""));
    assert!(!done.overlay().is_modal_open(CALLBACK_MODAL));
    assert!(!done.dom().has_class(&Element::Body, "no-scroll"));
}

#[tokio::test(start_paused = true)]
async fn test_submit_failure_keeps_modal_open() {
    let sink = StubSink::failing();
    let mut ui = page_fresh();
    ui.dom_mut().fill(&form(), "phone", "89001112233");
    ui.dom_mut().check(&form(), "consent_pd", true);

    let done = run_page(ui, Arc::clone(&sink), |h| async move {
        h.send(UiEvent::OpenModalClick);
        h.send(UiEvent::Submit(form()));
        wait(2_500).await;
        h
    })
    .await;
    assert_eq!(sink.calls(), 1);
    assert_eq!(done.submit_phase(&form()), SubmitPhase::Idle);
    assert_eq!(done.dom().text(&Element::FormError(form())), SEND_FAILED);
    assert_eq!(
        done.dom().input_value(&form(), "phone").as_deref(),
        Some("89001112233")
    );
    assert!(done.overlay().is_modal_open(CALLBACK_MODAL));
    assert!(!done.session().has(POPUP_SHOWN_KEY));
}

#[tokio::test(start_paused = true)]
async fn test_handle_reports_stopped_loop() {
    let (runtime, handle) = UiRuntime::new(page_fresh(), StubSink::accepting());
    let task = tokio::spawn(runtime.run());
    assert!(handle.send(UiEvent::Unload));
    let page = task.await.unwrap();

    // mount ran before the loop started
    assert!(page.dom().has_input(&form(), "hp"));
    assert!(!handle.send(UiEvent::Scroll));
}
