use std::rc::Rc;

use leptos::logging::warn;
use leptos::prelude::*;
use punto_inicio_core::opening::OpeningFlow;
use punto_inicio_core::rpc::OdooClient;
use punto_inicio_core::session::Session;
use wasm_bindgen_futures::spawn_local;

use crate::components::toast::ToastNotifier;
use crate::platform::BrowserNavigator;

pub type BrowserOpeningFlow = OpeningFlow<OdooClient, ToastNotifier, BrowserNavigator, Box<dyn Fn()>>;

/// Handle to the flow owned by the hosting page. Empty until the entry check
/// has passed.
pub type OpeningFlowHandle = StoredValue<Option<Rc<BrowserOpeningFlow>>, LocalStorage>;

#[component]
pub fn CashOpeningPopup(session: Session, flow: OpeningFlowHandle) -> impl IntoView {
    let (cash_text, set_cash_text) = signal(String::new());
    let (cash_amount, set_cash_amount) = signal(0.0_f64);
    let (notes, set_notes) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_cash_input = move |ev: leptos::ev::Event| {
        let raw = event_target_value(&ev);
        let amount = flow
            .with_value(|f| f.as_ref().map(|f| f.on_cash_amount_change(&raw)))
            .unwrap_or(0.0);
        set_cash_text.set(raw);
        set_cash_amount.set(amount);
    };

    let on_notes_input = move |ev: leptos::ev::Event| {
        let raw = event_target_value(&ev);
        flow.with_value(|f| {
            if let Some(f) = f {
                f.on_notes_change(&raw);
            }
        });
        set_notes.set(raw);
    };

    let on_confirm = move |_: leptos::ev::MouseEvent| {
        let Some(flow) = flow.get_value() else {
            return;
        };
        set_submitting.set(true);
        spawn_local(async move {
            // Success and failure are both reported through the toasts.
            if let Err(e) = flow.confirm().await {
                warn!("Cash opening failed: {}", e);
            }
            set_submitting.set(flow.is_submitting());
        });
    };

    let on_cancel = move |_: leptos::ev::MouseEvent| {
        flow.with_value(|f| {
            if let Some(f) = f {
                f.cancel();
            }
        });
        set_cash_text.set(String::new());
        set_cash_amount.set(0.0);
        set_notes.set(String::new());
    };

    let register = session.config_name().to_string();

    view! {
        <div class="modal-backdrop">
            <div class="modal cash-opening-popup">
                <h3 class="modal-title">"Opening Cash Control"</h3>
                <p class="modal-subtitle">{session.name.clone()} " \u{00b7} " {register}</p>

                <div class="form-group">
                    <label for="cash-amount">"Opening cash"</label>
                    <input
                        id="cash-amount"
                        type="text"
                        inputmode="decimal"
                        placeholder="0.00"
                        class="input"
                        prop:value=move || cash_text.get()
                        on:input=on_cash_input
                        disabled=move || submitting.get()
                    />
                    <span class="input-hint">{move || format!("{:.2}", cash_amount.get())}</span>
                </div>

                <div class="form-group">
                    <label for="opening-notes">"Notes"</label>
                    <textarea
                        id="opening-notes"
                        class="input"
                        rows="3"
                        prop:value=move || notes.get()
                        on:input=on_notes_input
                        disabled=move || submitting.get()
                    ></textarea>
                </div>

                <div class="modal-actions">
                    <button
                        class="btn btn-primary"
                        on:click=on_confirm
                        disabled=move || submitting.get()
                    >
                        {move || if submitting.get() { "Opening..." } else { "Open Session" }}
                    </button>
                    <button
                        class="btn btn-secondary"
                        on:click=on_cancel
                        disabled=move || submitting.get()
                    >
                        "Cancel"
                    </button>
                </div>
            </div>
        </div>
    }
}
