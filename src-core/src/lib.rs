pub mod capability;
pub mod config;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod guard;
pub mod opening;
pub mod route;
pub mod rpc;
pub mod session;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use capability::{Confirmer, Navigator, NotificationLevel, Notifier};
pub use detail::{CloseOutcome, DisplayState, SessionView};
pub use error::{ErrorKind, Fault, SessionError};
pub use opening::{ConfirmOutcome, OpeningDraft, OpeningFlow};
pub use route::Route;
pub use session::{Session, SessionId, SessionService, SessionState};

/// Entry point of the `punto-inicio` terminal front-end.
#[cfg(not(target_arch = "wasm32"))]
pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = terminal::cli::Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(terminal::cli::dispatch(cli))
}
