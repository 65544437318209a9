//! Cash opening flow: collect the starting cash and notes for a session in
//! opening control, then move it to `opened`.

use std::cell::RefCell;

use tracing::{debug, error, info};

use crate::capability::{Navigator, NotificationLevel, Notifier};
use crate::error::{Fault, SessionError};
use crate::route::Route;
use crate::session::{SessionId, SessionService};

/// In-progress opening form. Has no identity beyond the form itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpeningDraft {
    pub cash_amount: f64,
    pub notes: String,
    pub is_submitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Both calls succeeded and the detail view was requested.
    Opened,
    /// A submission is already in flight; nothing was sent.
    AlreadySubmitting,
}

/// Parse a cash amount typed by the cashier.
///
/// Reads the longest leading decimal number (`"12.5abc"` is 12.5). Anything
/// unparsable, negative or non-finite is 0.
pub fn parse_cash_amount(raw: &str) -> f64 {
    match numeric_prefix(raw.trim_start()).parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            mantissa_digits += j - frac_start;
            end = j;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    &s[..end]
}

/// Opening flow for one session.
///
/// The draft lives in a `RefCell` so the flow can be shared with event
/// handlers; no borrow is held across an `.await`.
pub struct OpeningFlow<S, N, V, F> {
    session_id: SessionId,
    service: S,
    notifier: N,
    navigator: V,
    close: F,
    draft: RefCell<OpeningDraft>,
}

impl<S, N, V, F> OpeningFlow<S, N, V, F>
where
    S: SessionService,
    N: Notifier,
    V: Navigator,
    F: Fn(),
{
    pub fn new(session_id: SessionId, service: S, notifier: N, navigator: V, close: F) -> Self {
        Self {
            session_id,
            service,
            notifier,
            navigator,
            close,
            draft: RefCell::new(OpeningDraft::default()),
        }
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> OpeningDraft {
        self.draft.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.draft.borrow().is_submitting
    }

    /// Returns the amount that was stored.
    pub fn on_cash_amount_change(&self, raw: &str) -> f64 {
        let amount = parse_cash_amount(raw);
        self.draft.borrow_mut().cash_amount = amount;
        amount
    }

    pub fn on_notes_change(&self, raw: &str) {
        self.draft.borrow_mut().notes = raw.to_string();
    }

    /// Record the opening cash, open the session and go to its detail view.
    ///
    /// Failures are reported through the notifier and leave the draft intact
    /// for a manual retry. The two remote calls are not atomic: if the second
    /// one fails the balance stays recorded while the session remains in
    /// opening control.
    pub async fn confirm(&self) -> Result<ConfirmOutcome, SessionError> {
        let (cash_amount, notes) = {
            let mut draft = self.draft.borrow_mut();
            if draft.is_submitting {
                debug!("Session {} opening already in flight", self.session_id);
                return Ok(ConfirmOutcome::AlreadySubmitting);
            }
            draft.is_submitting = true;
            (draft.cash_amount, draft.notes.clone())
        };

        info!(
            "Opening session {} with cashbox start {:.2}",
            self.session_id, cash_amount
        );

        match self.submit(cash_amount, &notes).await {
            Ok(()) => {
                info!("Session {} opened", self.session_id);
                self.notifier
                    .notify("Session opened successfully", NotificationLevel::Success);
                self.navigator
                    .navigate_to(&Route::SessionDetail(self.session_id));
                Ok(ConfirmOutcome::Opened)
            }
            Err(fault) => {
                error!("Failed to open session {}: {}", self.session_id, fault);
                self.notifier.notify(
                    &format!("Failed to open the session: {}", fault),
                    NotificationLevel::Danger,
                );
                self.draft.borrow_mut().is_submitting = false;
                Err(SessionError::ServiceFailure(fault))
            }
        }
    }

    async fn submit(&self, cash_amount: f64, notes: &str) -> Result<(), Fault> {
        self.service
            .set_cashbox_opening(self.session_id, cash_amount, notes)
            .await?;
        self.service.open_session(self.session_id).await
    }

    /// Dismiss the flow without touching the server. The draft is discarded.
    pub fn cancel(&self) {
        debug!("Cash opening for session {} cancelled", self.session_id);
        *self.draft.borrow_mut() = OpeningDraft::default();
        (self.close)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cash_amount_plain_values() {
        assert_eq!(parse_cash_amount("12.5"), 12.5);
        assert_eq!(parse_cash_amount("100"), 100.0);
        assert_eq!(parse_cash_amount("  7.25"), 7.25);
        assert_eq!(parse_cash_amount(".5"), 0.5);
        assert_eq!(parse_cash_amount("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_cash_amount_falls_back_to_zero() {
        for raw in ["abc", "", "   ", ".", "-", "e5", "NaN", "inf", "1e999", "-5", "-0"] {
            assert_eq!(
                parse_cash_amount(raw),
                0.0,
                "Input '{}' should fall back to 0",
                raw
            );
        }
    }

    #[test]
    fn test_parse_cash_amount_reads_leading_number() {
        assert_eq!(parse_cash_amount("12.5abc"), 12.5);
        assert_eq!(parse_cash_amount("12."), 12.0);
        assert_eq!(parse_cash_amount("12,50"), 12.0);
        assert_eq!(parse_cash_amount("3e"), 3.0);
        assert_eq!(parse_cash_amount("+8"), 8.0);
    }

    #[test]
    fn test_parse_cash_amount_is_idempotent() {
        for raw in ["12.5", "abc", "99.99 EUR"] {
            assert_eq!(parse_cash_amount(raw), parse_cash_amount(raw));
        }
    }
}
