use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::toast::{ToastList, ToastNotifier};
use crate::pages::cash_opening::CashOpeningPage;
use crate::pages::session::SessionPage;

#[component]
pub fn App() -> impl IntoView {
    let notifier = ToastNotifier::new();
    provide_context(notifier);

    view! {
        <Router>
            <div class="app-layout">
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/punto_inicio/cash_opening") view=CashOpeningPage />
                        <Route path=path!("/punto_inicio/ui") view=SessionPage />
                    </Routes>
                </main>
                <ToastList notifier=notifier />
            </div>
        </Router>
    }
}
