use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Display name of the user selected at startup
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default)]
    pub personas: PersonasConfig,
    #[serde(default = "default_secrets")]
    pub secrets: Vec<SecretCommand>,
    #[serde(default)]
    pub phrases: Phrases,
    #[serde(default)]
    pub speaker: SpeakerConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            personas: PersonasConfig::default(),
            secrets: default_secrets(),
            phrases: Phrases::default(),
            speaker: SpeakerConfig::default(),
            listener: ListenerConfig::default(),
        }
    }
}

fn default_user() -> String {
    "Máté".into()
}

// ============================================================================
// Personas
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct PersonaConfig {
    pub name: String,
    /// Voice id handed to the speech engine
    #[serde(default)]
    pub voice: Option<String>,
}

/// One persona per declared user
#[derive(Debug, Deserialize)]
pub struct PersonasConfig {
    #[serde(default = "default_mate_persona")]
    pub mate: PersonaConfig,
    #[serde(default = "default_szilvi_persona")]
    pub szilvi: PersonaConfig,
}

impl Default for PersonasConfig {
    fn default() -> Self {
        Self {
            mate: default_mate_persona(),
            szilvi: default_szilvi_persona(),
        }
    }
}

fn default_mate_persona() -> PersonaConfig {
    PersonaConfig {
        name: "Remény".into(),
        voice: None,
    }
}

fn default_szilvi_persona() -> PersonaConfig {
    PersonaConfig {
        name: "Aenor".into(),
        voice: None,
    }
}

// ============================================================================
// Secret commands
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct SecretCommand {
    pub phrase: String,
    pub response: String,
}

impl SecretCommand {
    fn new(phrase: &str, response: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            response: response.to_string(),
        }
    }
}

fn default_secrets() -> Vec<SecretCommand> {
    vec![
        SecretCommand::new("szívkapu", "Pulzáló fény aktiválva."),
        SecretCommand::new("miatyánk", "Csendes mód bekapcsolva."),
        SecretCommand::new("szilvia", "Szilvi mód aktiválva, figyelem megváltoztatva."),
        SecretCommand::new("anya", "Meleg fény és emlékező hang aktiválva."),
    ]
}

// ============================================================================
// Fixed phrases
// ============================================================================

/// Fixed utterances spoken by the active persona
#[derive(Debug, Deserialize, Clone)]
pub struct Phrases {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Spoken right before a capture starts
    #[serde(default = "default_speak_now")]
    pub speak_now: String,
    #[serde(default = "default_not_understood")]
    pub not_understood: String,
    #[serde(default = "default_no_network")]
    pub no_network: String,
    /// Extra line on the typed path when nothing matched
    #[serde(default = "default_unknown_command")]
    pub unknown_command: String,
    /// Fallback reply; `{name}` and `{command}` are substituted
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            speak_now: default_speak_now(),
            not_understood: default_not_understood(),
            no_network: default_no_network(),
            unknown_command: default_unknown_command(),
            fallback: default_fallback(),
        }
    }
}

impl Phrases {
    /// `{command}` is substituted last so input text is never re-expanded
    pub fn render_fallback(template: &str, name: &str, command: &str) -> String {
        template.replace("{name}", name).replace("{command}", command)
    }
}

fn default_greeting() -> String {
    "Emlékezz.".into()
}
fn default_speak_now() -> String {
    "Beszélj most.".into()
}
fn default_not_understood() -> String {
    "Nem értem.".into()
}
fn default_no_network() -> String {
    "Nincs internet kapcsolat.".into()
}
fn default_unknown_command() -> String {
    "Ismeretlen parancs.".into()
}
fn default_fallback() -> String {
    "{name} válaszol: Emlékszem rád, {command}.".into()
}

// ============================================================================
// Speech engines
// ============================================================================

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "engine")]
pub enum SpeakerConfig {
    /// Print utterances to the terminal only
    #[default]
    #[serde(rename = "console")]
    Console,
    /// Run an external TTS program per utterance (e.g. espeak-ng)
    #[serde(rename = "command")]
    Command {
        program: String,
        /// `{voice}` and `{text}` are substituted per call
        #[serde(default = "default_speaker_args")]
        args: Vec<String>,
        /// Also print the utterance to the terminal
        #[serde(default = "default_echo")]
        echo: bool,
    },
}

fn default_speaker_args() -> Vec<String> {
    vec!["{text}".into()]
}

fn default_echo() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "engine")]
pub enum ListenerConfig {
    /// No audio input, listening is unavailable
    #[default]
    #[serde(rename = "none")]
    None,
    /// Run an external recognizer per capture; its stdout is the utterance
    #[serde(rename = "command")]
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
