//! Collaborators the components are handed at construction time.
//!
//! Every host (browser, terminal, tests) supplies its own implementations.

use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Danger,
}

impl NotificationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Danger => "danger",
        }
    }
}

/// Fire-and-forget user notification.
pub trait Notifier {
    fn notify(&self, message: &str, level: NotificationLevel);
}

/// Blocking yes/no question to the user.
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

pub trait Navigator {
    fn navigate_to(&self, target: &Route);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, message: &str, level: NotificationLevel) {
        (**self).notify(message, level)
    }
}

impl<T: Confirmer + ?Sized> Confirmer for &T {
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn navigate_to(&self, target: &Route) {
        (**self).navigate_to(target)
    }
}

/// Navigator that remembers where it was sent instead of going there.
///
/// Used by hosts that follow navigation themselves, and by tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: std::cell::RefCell<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes.borrow().last().copied()
    }

    /// Take the pending route, leaving the history empty.
    pub fn take_last(&self) -> Option<Route> {
        self.routes.borrow_mut().drain(..).last()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, target: &Route) {
        self.routes.borrow_mut().push(*target);
    }
}
