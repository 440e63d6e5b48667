//! Terminal host - keyboard input, slash commands and capture workers

use std::io::BufRead;
use std::thread;

use crate::error::Error;
use crate::persona::UserId;
use crate::session::{CaptureDisposition, CaptureOutcome, Session};
use crate::ui;

/// Keyboard commands understood by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    User(String),
    Listen,
    Stop,
    Status,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a `/command`, or `None` if the line is plain text
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;
    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };

    let command = match cmd.to_lowercase().as_str() {
        "user" | "u" => SlashCommand::User(arg.to_string()),
        "listen" | "l" => SlashCommand::Listen,
        "stop" => SlashCommand::Stop,
        "status" => SlashCommand::Status,
        "help" | "commands" => SlashCommand::Help,
        "quit" | "exit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(cmd.to_string()),
    };
    Some(command)
}

fn help() -> String {
    let users: Vec<&str> = UserId::ALL.iter().map(|u| u.display_name()).collect();
    format!(
        "\
Commands:
  /user <name> - Switch user ({})
  /listen      - Capture one spoken command
  /stop        - Cancel listening
  /status      - Show current status
  /help        - Show this help
  /quit        - Exit

Anything else is sent to the active persona.",
        users.join(", ")
    )
}

fn status(session: &Session) -> String {
    let listening = match session.listening_unavailable() {
        Some(_) => "unavailable".to_string(),
        None => session.state().to_string(),
    };
    format!(
        "User: {}, Persona: {}, Listening: {}",
        session.active_user(),
        session.active_persona().name(),
        listening
    )
}

/// Report a failed operation and keep the loop alive
fn report(error: &Error) {
    tracing::debug!(%error, "operation failed");
    ui::show_warning(&error.to_string());
}

enum Flow {
    Continue,
    Quit,
}

fn handle_line(
    line: &str,
    session: &mut Session,
    capture_tx: &flume::Sender<CaptureOutcome>,
) -> Flow {
    let Some(command) = parse_slash_command(line) else {
        if let Err(e) = session.on_command_submitted(line) {
            report(&e);
        }
        return Flow::Continue;
    };

    match command {
        SlashCommand::User(name) => match session.on_user_selected(&name) {
            Ok(()) => ui::show_notice(&format!(
                "{} -> {}",
                session.active_user(),
                session.active_persona().name()
            )),
            Err(e) => report(&e),
        },
        SlashCommand::Listen => match session.on_listen_toggle(true) {
            Ok(Some(request)) => {
                ui::show_listening();
                let tx = capture_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let _ = tx.send(request.run());
                });
            }
            Ok(None) if session.is_listening() => ui::show_notice("Already listening"),
            Ok(None) => ui::show_notice("Previous capture still finishing, try again shortly"),
            Err(e) => report(&e),
        },
        SlashCommand::Stop => {
            if session.stop_listening() {
                ui::show_notice("Stopped listening");
            }
        }
        SlashCommand::Status => ui::show_notice(&status(session)),
        SlashCommand::Help => ui::show_notice(&help()),
        SlashCommand::Quit => return Flow::Quit,
        SlashCommand::Unknown(cmd) => ui::show_warning(&format!("Unknown command: /{}", cmd)),
    }
    Flow::Continue
}

fn handle_capture(outcome: CaptureOutcome, session: &mut Session) {
    if let Ok(text) = &outcome.result {
        if session.state().is_current(outcome.ticket) {
            ui::show_heard(text);
        }
    }
    match session.on_capture_complete(outcome) {
        Ok(CaptureDisposition::Discarded) => {}
        Ok(disposition) => tracing::debug!(?disposition, "capture handled"),
        Err(e) => report(&e),
    }
}

/// Drive the session from the terminal until `/quit`, EOF or Ctrl-C
pub async fn run(mut session: Session) -> anyhow::Result<()> {
    if let Some(reason) = session.listening_unavailable() {
        ui::show_warning(&format!("Listening unavailable: {}", reason));
    }

    let (quit_tx, quit_rx) = flume::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = quit_tx.try_send(());
    })?;

    let (input_tx, input_rx) = flume::unbounded::<String>();
    let (capture_tx, capture_rx) = flume::unbounded::<CaptureOutcome>();

    // Input thread
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    if let Err(e) = session.greet() {
        report(&e);
    }
    ui::prompt(session.active_user().display_name());

    loop {
        tokio::select! {
            biased;

            _ = quit_rx.recv_async() => break,

            Ok(outcome) = capture_rx.recv_async() => {
                handle_capture(outcome, &mut session);
            }

            line = input_rx.recv_async() => {
                let Ok(line) = line else { break };
                if let Flow::Quit = handle_line(&line, &mut session, &capture_tx) {
                    break;
                }
            }
        }
        ui::prompt(session.active_user().display_name());
    }

    session.stop_listening();
    println!();
    Ok(())
}
