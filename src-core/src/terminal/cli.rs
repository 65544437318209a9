use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use url::form_urlencoded;

use super::render::{session_details, session_table};
use super::{PromptConfirmer, TerminalNotifier};
use crate::capability::{Confirmer, Navigator, RecordingNavigator};
use crate::config::ClientConfig;
use crate::dashboard::list_sessions;
use crate::detail::{CloseOutcome, DisplayState, SessionView};
use crate::guard::{check_entry, EntrySurface};
use crate::opening::{ConfirmOutcome, OpeningFlow};
use crate::route::{Route, SESSION_ID_PARAM};
use crate::rpc::OdooClient;
use crate::session::SessionId;

#[derive(Debug, Parser)]
#[command(name = "punto-inicio", version, about = "Open and close Punto de Inicio register sessions")]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List Punto de Inicio sessions
    Sessions {
        /// Include closed sessions
        #[arg(long)]
        all: bool,
    },
    /// Record the opening cash and open a session
    Open {
        session_id: String,
        /// Starting cash in the drawer
        #[arg(long, default_value = "0")]
        cash: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Do not ask before submitting
        #[arg(long)]
        yes: bool,
    },
    /// Show a session, optionally starting closing control
    Show {
        session_id: String,
        #[arg(long)]
        close: bool,
        /// Do not ask before closing
        #[arg(long)]
        yes: bool,
    },
}

pub fn load_config(path: Option<PathBuf>) -> Result<ClientConfig> {
    let path = match path.or_else(ClientConfig::default_path) {
        Some(path) => path,
        None => return Ok(ClientConfig::default().with_env()),
    };
    let config = ClientConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    Ok(config.with_env())
}

async fn connect(config: &ClientConfig) -> Result<OdooClient> {
    let password = config.resolve_password()?;
    let client = OdooClient::login(
        config.server_url()?,
        config.database()?,
        config.login()?,
        &password,
        config.timeout(),
    )
    .await?;
    Ok(client)
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config)?;
    let client = connect(&config).await?;

    match cli.command {
        Command::Sessions { all } => {
            let sessions = list_sessions(&client, all).await?;
            println!("{}", session_table(&sessions));
            Ok(())
        }
        Command::Open {
            session_id,
            cash,
            notes,
            yes,
        } => open(&client, &session_id, &cash, &notes, yes).await,
        Command::Show {
            session_id,
            close,
            yes,
        } => show(&client, &session_id, close, yes).await,
    }
}

async fn open(client: &OdooClient, raw_id: &str, cash: &str, notes: &str, yes: bool) -> Result<()> {
    let session = check_entry(client, Some(raw_id), EntrySurface::CashOpening).await?;
    let navigator = RecordingNavigator::new();
    let notifier = TerminalNotifier;
    let flow = OpeningFlow::new(session.id, client, notifier, &navigator, || {
        info!("Cash opening dismissed");
        navigator.navigate_to(&Route::Dashboard);
    });

    let amount = flow.on_cash_amount_change(cash);
    flow.on_notes_change(notes);

    let prompt = format!("Open {} with {:.2} in the drawer?", session.name, amount);
    if !PromptConfirmer::new(yes).confirm(&prompt) {
        flow.cancel();
        return follow(client, navigator.take_last()).await;
    }

    match flow.confirm().await? {
        ConfirmOutcome::Opened => follow(client, navigator.take_last()).await,
        ConfirmOutcome::AlreadySubmitting => Ok(()),
    }
}

async fn show(client: &OdooClient, raw_id: &str, close: bool, yes: bool) -> Result<()> {
    let session = check_entry(client, Some(raw_id), EntrySurface::Ui).await?;
    let navigator = RecordingNavigator::new();
    let view = SessionView::new(client, TerminalNotifier, PromptConfirmer::new(yes), &navigator);

    match view.adopt(session) {
        DisplayState::Loaded(session) => println!("{}", session_details(&session)),
        DisplayState::Errored(err) => bail!(err),
        DisplayState::Loading => bail!("Session {} did not load", raw_id),
    }

    if close {
        match view.close_session().await? {
            CloseOutcome::Closed => return follow(client, navigator.take_last()).await,
            CloseOutcome::Declined | CloseOutcome::Unavailable => {}
        }
    }
    Ok(())
}

/// Act on the route a component navigated to.
async fn follow(client: &OdooClient, route: Option<Route>) -> Result<()> {
    match route {
        Some(Route::SessionDetail(id)) => {
            let navigator = RecordingNavigator::new();
            let view = SessionView::new(client, TerminalNotifier, PromptConfirmer::new(false), &navigator);
            if let DisplayState::Loaded(session) = view.mount(&session_query(id)).await {
                println!("{}", session_details(&session));
            }
            Ok(())
        }
        Some(Route::Dashboard) => {
            let sessions = list_sessions(client, false).await?;
            println!("{}", session_table(&sessions));
            Ok(())
        }
        Some(route @ Route::CashOpening(_)) => {
            println!("Next: {}", route);
            Ok(())
        }
        None => Ok(()),
    }
}

fn session_query(id: SessionId) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(SESSION_ID_PARAM, &id.to_string())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_command() {
        let cli = Cli::try_parse_from([
            "punto-inicio",
            "open",
            "42",
            "--cash",
            "100.0",
            "--notes",
            "initial",
            "--yes",
        ])
        .unwrap();
        match cli.command {
            Command::Open {
                session_id,
                cash,
                notes,
                yes,
            } => {
                assert_eq!(session_id, "42");
                assert_eq!(cash, "100.0");
                assert_eq!(notes, "initial");
                assert!(yes);
            }
            other => panic!("Expected open command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_with_global_config() {
        let cli = Cli::try_parse_from([
            "punto-inicio",
            "show",
            "7",
            "--close",
            "--config",
            "/tmp/pi.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pi.toml")));
        assert!(matches!(
            cli.command,
            Command::Show { close: true, yes: false, .. }
        ));
    }

    #[test]
    fn test_session_query() {
        assert_eq!(session_query(SessionId::new(42).unwrap()), "session_id=42");
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(Some(dir.path().join("none.toml"))).unwrap();
        assert_eq!(config.timeout_secs, 30);
    }
}
