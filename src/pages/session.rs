use std::rc::Rc;

use leptos::logging::warn;
use leptos::prelude::*;
use punto_inicio_core::capability::{Navigator, NotificationLevel, Notifier};
use punto_inicio_core::detail::{DisplayState, SessionView};
use punto_inicio_core::error::{Fault, SessionError};
use punto_inicio_core::guard::{check_entry, EntrySurface};
use punto_inicio_core::route::{session_id_value, Route};
use punto_inicio_core::rpc::OdooClient;
use punto_inicio_core::session::Session;
use wasm_bindgen_futures::spawn_local;

use crate::components::status_badge::StatusBadge;
use crate::components::toast::ToastNotifier;
use crate::platform::{self, BrowserConfirmer, BrowserNavigator};

type BrowserSessionView = SessionView<OdooClient, ToastNotifier, BrowserConfirmer, BrowserNavigator>;

#[component]
pub fn SessionPage() -> impl IntoView {
    let notifier = expect_context::<ToastNotifier>();
    let (display, set_display) = signal(DisplayState::Loading);
    let (closing, set_closing) = signal(false);
    let session_view = StoredValue::new_local(None::<Rc<BrowserSessionView>>);

    // Check the session, then hand it to the view
    Effect::new(move |_| {
        let raw_id = session_id_value(&platform::location_search());
        spawn_local(async move {
            let client = match platform::connect() {
                Ok(client) => client,
                Err(e) => {
                    notifier.notify(&e, NotificationLevel::Danger);
                    set_display.set(DisplayState::Errored(Fault::new(e).into()));
                    return;
                }
            };

            let session = match check_entry(&client, raw_id.as_deref(), EntrySurface::Ui).await {
                Ok(session) => session,
                Err(e) => {
                    notifier.notify(&e.to_string(), NotificationLevel::Danger);
                    set_display.set(DisplayState::Errored(e));
                    return;
                }
            };

            let view = Rc::new(SessionView::new(
                client,
                notifier,
                BrowserConfirmer,
                BrowserNavigator,
            ));
            set_display.set(view.adopt(session));
            session_view.set_value(Some(view));
        });
    });

    let close_session = move |_: leptos::ev::MouseEvent| {
        let Some(view) = session_view.get_value() else {
            return;
        };
        set_closing.set(true);
        spawn_local(async move {
            if let Err(e) = view.close_session().await {
                warn!("Closing session failed: {}", e);
            }
            set_closing.set(false);
            set_display.set(view.state());
        });
    };

    let back_to_dashboard = move |_: leptos::ev::MouseEvent| {
        match session_view.get_value() {
            Some(view) => view.back_to_dashboard(),
            None => BrowserNavigator.navigate_to(&Route::Dashboard),
        }
    };

    view! {
        <div class="page session-page">
            {move || match display.get() {
                DisplayState::Loading => view! {
                    <p class="page-description">"Loading session..."</p>
                }.into_any(),
                DisplayState::Errored(e) => view! {
                    <div class="entry-error">
                        <span class="status-text status-error">{error_text(&e)}</span>
                    </div>
                }.into_any(),
                DisplayState::Loaded(session) => view! {
                    <SessionDetails session=session />
                }.into_any(),
            }}

            <div class="page-actions">
                <Show when=move || display.with(|d| d.session().is_some())>
                    <button
                        class="btn btn-danger"
                        on:click=close_session
                        disabled=move || closing.get()
                    >
                        {move || if closing.get() { "Closing..." } else { "Close Session" }}
                    </button>
                </Show>
                <button class="btn btn-secondary" on:click=back_to_dashboard>
                    "Back to Dashboard"
                </button>
            </div>
        </div>
    }
}

#[component]
fn SessionDetails(session: Session) -> impl IntoView {
    view! {
        <div class="session-details">
            <h2>{session.name.clone()}</h2>
            <StatusBadge state=session.state detail=session.config_name().to_string() />
            <div class="preview-row">
                <span class="preview-label">"Started"</span>
                <span class="preview-value">{session.start_at_display()}</span>
            </div>
            <div class="preview-row">
                <span class="preview-label">"Opening cash"</span>
                <span class="preview-value">{format!("{:.2}", session.cash_register_balance_start)}</span>
            </div>
        </div>
    }
}

fn error_text(err: &SessionError) -> String {
    match err {
        SessionError::ServiceFailure(fault) => format!("Failed to load the session: {}", fault),
        other => other.to_string(),
    }
}
