//! Terminal host: runs the components from a shell against a live server.

pub mod cli;
pub mod render;

use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use crate::capability::{Confirmer, NotificationLevel, Notifier};

/// Prints notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        match level {
            NotificationLevel::Success => {
                info!("{}", message);
                eprintln!("\u{2713} {}", message);
            }
            NotificationLevel::Danger => {
                warn!("{}", message);
                eprintln!("\u{2717} {}", message);
            }
        }
    }
}

/// Asks on stdin, or answers yes without asking.
#[derive(Debug, Clone, Copy)]
pub struct PromptConfirmer {
    assume_yes: bool,
}

impl PromptConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmer for PromptConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
