pub mod cash_opening;
pub mod session;
