use crate::dashboard::next_route;
use crate::session::Session;

/// Multi-line summary of one session for the detail view.
pub fn session_details(session: &Session) -> String {
    format!(
        "Session:        {}\n\
         Register:       {}\n\
         Started:        {}\n\
         State:          {}\n\
         Opening cash:   {:.2}",
        session.name,
        session.config_name(),
        session.start_at_display(),
        session.state.label(),
        session.cash_register_balance_start
    )
}

/// One dashboard row per session.
pub fn session_table(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "No sessions found".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<14} {:<20} {:<16} {}",
        "ID", "NAME", "REGISTER", "STATE", "NEXT"
    );
    for session in sessions {
        let next = next_route(session)
            .map(|r| r.to_url())
            .unwrap_or_else(|| "-".to_string());
        out.push('\n');
        out.push_str(&format!(
            "{:>6}  {:<14} {:<20} {:<16} {}",
            session.id,
            session.name,
            session.config_name(),
            session.state.label(),
            next
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::testing::sample_session;

    #[test]
    fn test_session_details_lists_fields() {
        let mut session = sample_session(42, SessionState::Opened);
        session.cash_register_balance_start = 100.0;
        let text = session_details(&session);
        assert!(text.contains("PI/00042"), "Missing name in: {}", text);
        assert!(text.contains("Front Counter"), "Missing register in: {}", text);
        assert!(text.contains("In Progress"), "Missing state in: {}", text);
        assert!(text.contains("100.00"), "Missing balance in: {}", text);
        assert!(text.contains("Not started"), "Missing start in: {}", text);
    }

    #[test]
    fn test_session_table_rows() {
        let sessions = vec![
            sample_session(1, SessionState::OpeningControl),
            sample_session(2, SessionState::Closed),
        ];
        let table = session_table(&sessions);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("/punto_inicio/cash_opening?session_id=1"));
        assert!(lines[2].trim_end().ends_with('-'));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(session_table(&[]), "No sessions found");
    }
}
