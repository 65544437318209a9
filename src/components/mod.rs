pub mod cash_opening_popup;
pub mod status_badge;
pub mod toast;
