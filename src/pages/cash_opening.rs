use std::rc::Rc;

use leptos::prelude::*;
use punto_inicio_core::capability::{Navigator, NotificationLevel, Notifier};
use punto_inicio_core::guard::{check_entry, EntrySurface};
use punto_inicio_core::opening::OpeningFlow;
use punto_inicio_core::route::{session_id_value, Route};
use punto_inicio_core::session::Session;
use wasm_bindgen_futures::spawn_local;

use crate::components::cash_opening_popup::{BrowserOpeningFlow, CashOpeningPopup, OpeningFlowHandle};
use crate::components::toast::ToastNotifier;
use crate::platform::{self, BrowserNavigator};

#[component]
pub fn CashOpeningPage() -> impl IntoView {
    let notifier = expect_context::<ToastNotifier>();
    let (entry, set_entry) = signal::<Option<Result<Session, String>>>(None);
    let flow: OpeningFlowHandle = StoredValue::new_local(None::<Rc<BrowserOpeningFlow>>);

    // Check the session and build the flow on mount
    Effect::new(move |_| {
        let raw_id = session_id_value(&platform::location_search());
        spawn_local(async move {
            let client = match platform::connect() {
                Ok(client) => client,
                Err(e) => {
                    set_entry.set(Some(Err(e)));
                    return;
                }
            };

            match check_entry(&client, raw_id.as_deref(), EntrySurface::CashOpening).await {
                Ok(session) => {
                    let close: Box<dyn Fn()> =
                        Box::new(|| BrowserNavigator.navigate_to(&Route::Dashboard));
                    let opening =
                        OpeningFlow::new(session.id, client, notifier, BrowserNavigator, close);
                    flow.set_value(Some(Rc::new(opening)));
                    set_entry.set(Some(Ok(session)));
                }
                Err(e) => {
                    notifier.notify(&e.to_string(), NotificationLevel::Danger);
                    set_entry.set(Some(Err(e.to_string())));
                }
            }
        });
    });

    view! {
        <div class="page cash-opening-page">
            {move || match entry.get() {
                None => view! {
                    <p class="page-description">"Checking session..."</p>
                }.into_any(),
                Some(Err(e)) => view! {
                    <div class="entry-error">
                        <span class="status-text status-error">{e}</span>
                        <a class="btn btn-secondary" href=Route::Dashboard.to_url()>"Back to Dashboard"</a>
                    </div>
                }.into_any(),
                Some(Ok(session)) => view! {
                    <CashOpeningPopup session=session flow=flow />
                }.into_any(),
            }}
        </div>
    }
}
