//! Speech capabilities - text-to-speech output and single-utterance capture
//!
//! The core only sees the [`Speaker`] and [`Listener`] traits. The engines
//! here are thin process-backed implementations so the shell can drive any
//! TTS or recognizer binary installed on the machine.

use std::process::Command;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{ListenerConfig, SpeakerConfig};
use crate::error::{Error, Result};
use crate::ui;

/// Speech output. `speak` blocks until the utterance is done.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<()>;
}

/// Expected ways a capture can end without text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecognitionFailure {
    #[error("no speech detected")]
    NoSpeechDetected,
    #[error("recognition service unavailable")]
    ServiceUnavailable,
}

/// Audio input. `capture` blocks for one utterance.
pub trait Listener: Send + Sync {
    fn capture(&self) -> std::result::Result<String, RecognitionFailure>;
}

// ============================================================================
// Speakers
// ============================================================================

/// Prints utterances to the terminal
pub struct ConsoleSpeaker {
    name: String,
}

impl ConsoleSpeaker {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Speaker for ConsoleSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        ui::show_speech(&self.name, text);
        Ok(())
    }
}

/// Runs an external TTS program once per utterance
pub struct CommandSpeaker {
    name: String,
    program: String,
    args: Vec<String>,
    voice: String,
    echo: bool,
}

impl CommandSpeaker {
    pub fn new(name: &str, program: &str, args: &[String], voice: Option<&str>, echo: bool) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.to_vec(),
            voice: voice.unwrap_or_default().to_string(),
            echo,
        }
    }

    fn render_args(&self, text: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{voice}", &self.voice).replace("{text}", text))
            .collect()
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        if self.echo {
            ui::show_speech(&self.name, text);
        }
        let status = Command::new(&self.program)
            .args(self.render_args(text))
            .status()
            .map_err(|e| Error::SpeechEngine(format!("{}: {}", self.program, e)))?;
        if !status.success() {
            return Err(Error::SpeechEngine(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// Build the speaker for one persona
pub fn build_speaker(config: &SpeakerConfig, name: &str, voice: Option<&str>) -> Box<dyn Speaker> {
    match config {
        SpeakerConfig::Console => Box::new(ConsoleSpeaker::new(name)),
        SpeakerConfig::Command {
            program,
            args,
            echo,
        } => Box::new(CommandSpeaker::new(name, program, args, voice, *echo)),
    }
}

// ============================================================================
// Listeners
// ============================================================================

/// Runs an external recognizer per capture
///
/// Exit status 0 with text on stdout is a recognized utterance, exit status
/// 0 with empty stdout means nothing was heard, anything else means the
/// recognizer could not be reached.
pub struct CommandListener {
    program: String,
    args: Vec<String>,
}

impl CommandListener {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

impl Listener for CommandListener {
    fn capture(&self) -> std::result::Result<String, RecognitionFailure> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| {
                tracing::debug!(program = %self.program, error = %e, "recognizer failed to run");
                RecognitionFailure::ServiceUnavailable
            })?;
        if !output.status.success() {
            tracing::debug!(program = %self.program, status = %output.status, "recognizer failed");
            return Err(RecognitionFailure::ServiceUnavailable);
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(RecognitionFailure::NoSpeechDetected);
        }
        Ok(text)
    }
}

/// Try to acquire audio input for the session
pub fn acquire_listener(config: &ListenerConfig) -> Result<Arc<dyn Listener>> {
    match config {
        ListenerConfig::None => Err(Error::DeviceUnavailable(
            "no listener configured".into(),
        )),
        ListenerConfig::Command { program, args } => {
            which::which(program)
                .map_err(|e| Error::DeviceUnavailable(format!("{}: {}", program, e)))?;
            Ok(Arc::new(CommandListener::new(program, args)))
        }
    }
}
