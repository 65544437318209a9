use leptos::prelude::*;
use punto_inicio_core::session::SessionState;

#[component]
pub fn StatusBadge(
    /// Lifecycle state of the session
    state: SessionState,
    /// Optional detail text, e.g. the register name
    #[prop(optional, into)]
    detail: Option<String>,
) -> impl IntoView {
    let (icon, class) = match state {
        SessionState::OpeningControl => ("\u{25cb}", "status-badge status-unknown"),
        SessionState::Opened => ("\u{2713}", "status-badge status-pass"),
        SessionState::ClosingControl => ("\u{25d0}", "status-badge status-partial"),
        SessionState::Closed => ("\u{2717}", "status-badge status-fail"),
    };

    view! {
        <div class="session-state">
            <span class=class>{icon}</span>
            <span class="session-state-label">{state.label()}</span>
            <span class="session-state-detail">{detail.unwrap_or_default()}</span>
        </div>
    }
}
