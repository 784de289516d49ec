//! askcmd - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The binary wires [`askcmd_tui`] (capture overlay) to [`askcmd_providers`]
//! (suggestion lookup):
//!
//! ```text
//! main() -> TerminalSession::new() -> InputSession::run() -> SessionOutcome
//!                                                                 |
//!                                       Committed -> SuggestionResolver::resolve()
//!                                                                 |
//!                                                  suggested command on stdout
//! ```
//!
//! The overlay draws on stderr so stdout carries nothing but the suggested
//! command; a shell widget can capture it with `$(askcmd)` or a keybinding.
//!
//! # Exit codes
//!
//! - `0` - a command was delivered, or the description was blank
//! - `1` - cancelled with Escape or Ctrl+C, or the terminal went away
//! - `2` - the suggestion lookup failed

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, size as terminal_size},
};
use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, Write, stderr},
    path::PathBuf,
    process::ExitCode,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use askcmd_providers::SuggestionResolver;
use askcmd_tui::{InputSession, TerminalEvents};
use askcmd_types::{ApiKey, SessionOutcome, sanitize_text};

const USAGE: &str = "\
askcmd - describe a command, get a suggestion

Usage: askcmd [--help]

Opens an interactive prompt, reads one line of natural language, and prints
a suggested shell command on stdout. The prompt itself is drawn on stderr.

Environment:
  GEMINI_API_KEY   API key used for suggestion requests (required)
  RUST_LOG         log filter, e.g. info or askcmd=debug

Exit codes:
  0  command delivered, or empty description
  1  cancelled with Escape or Ctrl+C
  2  suggestion lookup failed";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_askcmd_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the
    // overlay by writing to stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_askcmd_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let candidates = askcmd_log_file_candidates();
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn askcmd_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.askcmd/logs/askcmd.log
    if let Ok(home) = env::var("HOME")
        && !home.is_empty()
    {
        candidates.push(
            PathBuf::from(home)
                .join(".askcmd")
                .join("logs")
                .join("askcmd.log"),
        );
    }

    // Fallback: ./.askcmd/logs/askcmd.log (useful in constrained environments)
    candidates.push(PathBuf::from(".askcmd").join("logs").join("askcmd.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode hands the session every keystroke unbuffered; bracketed paste
/// makes pasted text arrive as one event. Both are torn down on drop so the
/// shell gets its terminal back even after panics or early returns.
struct TerminalSession;

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(stderr(), EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stderr(), DisableBracketedPaste);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Some(code) = handle_args() {
        return code;
    }

    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "askcmd failed");
            eprintln!("Error: {err:?}");
            ExitCode::from(2)
        }
    }
}

fn handle_args() -> Option<ExitCode> {
    let first = env::args().nth(1)?;
    match first.as_str() {
        "--help" | "-h" => {
            println!("{USAGE}");
            Some(ExitCode::SUCCESS)
        }
        other => {
            eprintln!("askcmd: unexpected argument '{other}'");
            eprintln!("{USAGE}");
            Some(ExitCode::from(2))
        }
    }
}

async fn run() -> Result<ExitCode> {
    let api_key = env::var(ApiKey::ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
        .map(ApiKey::new);
    let resolver = SuggestionResolver::new(api_key)?;

    let description = match capture_description()? {
        SessionOutcome::Cancelled => {
            tracing::info!("capture cancelled");
            return Ok(ExitCode::from(1));
        }
        SessionOutcome::Committed(text) => text,
    };

    let description = description.trim();
    if description.is_empty() {
        tracing::info!("empty description, nothing to resolve");
        return Ok(ExitCode::SUCCESS);
    }

    match resolver.resolve(description).await {
        Ok(command) => {
            deliver_command(&command)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(error = %err, "suggestion lookup failed");
            eprintln!("Error: {err}");
            Ok(ExitCode::from(2))
        }
    }
}

/// Runs the capture overlay and restores the terminal before returning.
fn capture_description() -> Result<SessionOutcome> {
    let session = TerminalSession::new()?;
    let (cols, _) = terminal_size()?;
    let outcome = InputSession::new(TerminalEvents, stderr(), cols).run()?;
    drop(session);
    Ok(outcome)
}

/// Prints the suggested command on stdout, newline terminated.
///
/// A closed stdout is not an error: the shell that asked for the suggestion
/// is gone, so there is nobody left to deliver to.
fn deliver_command(command: &str) -> io::Result<()> {
    let clean = sanitize_text(command);
    let mut out = io::stdout();
    let result = writeln!(out, "{clean}").and_then(|()| out.flush());
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed before delivery");
            Ok(())
        }
        other => other,
    }
}
