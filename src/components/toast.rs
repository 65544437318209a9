use std::time::Duration;

use leptos::prelude::*;
use punto_inicio_core::capability::{NotificationLevel, Notifier};

/// How long a toast stays on screen.
const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
}

/// Notifier that pushes toasts onto a reactive list. Provided as context by
/// the app shell.
#[derive(Clone, Copy)]
pub struct ToastNotifier {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn toasts(&self) -> ReadSignal<Vec<Toast>> {
        self.toasts.read_only()
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        let mut id = 0;
        self.next_id.update_value(|n| {
            *n += 1;
            id = *n;
        });
        self.toasts.update(|list| {
            list.push(Toast {
                id,
                message: message.to_string(),
                level,
            })
        });

        let notifier = *self;
        set_timeout(move || notifier.dismiss(id), TOAST_LIFETIME);
    }
}

#[component]
pub fn ToastList(notifier: ToastNotifier) -> impl IntoView {
    let toasts = notifier.toasts();

    view! {
        <div class="toast-list">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast toast-{}", toast.level.as_str())>
                            <span class="toast-message">{toast.message}</span>
                            <button class="toast-close" on:click=move |_| notifier.dismiss(id)>
                                "\u{00d7}"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
