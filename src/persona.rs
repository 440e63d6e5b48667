//! Personas - named responders bound to a speaker and the shared secret table

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::{Config, PersonaConfig, Phrases};
use crate::error::{Error, Result};
use crate::secrets::SecretCommandTable;
use crate::speech::{self, Speaker};

/// Outcome of [`Persona::respond`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledged {
    /// Input matched a secret command
    Secret,
    /// Input fell through to the fallback reply
    Fallback,
}

impl Acknowledged {
    pub fn is_secret(self) -> bool {
        self == Acknowledged::Secret
    }
}

impl From<Acknowledged> for bool {
    fn from(ack: Acknowledged) -> bool {
        ack.is_secret()
    }
}

pub struct Persona {
    name: String,
    speaker: Box<dyn Speaker>,
    secrets: Arc<SecretCommandTable>,
    fallback: String,
}

impl Persona {
    /// `fallback` is a template with `{name}` and `{command}` placeholders
    pub fn new(
        name: &str,
        speaker: Box<dyn Speaker>,
        secrets: Arc<SecretCommandTable>,
        fallback: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            speaker,
            secrets,
            fallback: fallback.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Speak one utterance, blocking until the speaker is done
    pub fn speak(&self, text: &str) -> Result<()> {
        tracing::info!(persona = %self.name, text, "speaking");
        self.speaker.speak(text)
    }

    /// Answer `raw` with exactly one utterance
    ///
    /// Secret phrases get their canned response. Anything else gets the
    /// fallback reply, which embeds `raw` exactly as given.
    pub fn respond(&self, raw: &str) -> Result<Acknowledged> {
        match self.secrets.lookup(raw) {
            Some(response) => {
                tracing::debug!(persona = %self.name, "secret command matched");
                self.speak(response)?;
                Ok(Acknowledged::Secret)
            }
            None => {
                let reply = Phrases::render_fallback(&self.fallback, &self.name, raw);
                self.speak(&reply)?;
                Ok(Acknowledged::Fallback)
            }
        }
    }
}

impl fmt::Debug for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persona")
            .field("name", &self.name)
            .field("secrets", &self.secrets.len())
            .finish()
    }
}

// ============================================================================
// Users
// ============================================================================

/// The declared user identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserId {
    Mate,
    Szilvi,
}

impl UserId {
    pub const ALL: [UserId; 2] = [UserId::Mate, UserId::Szilvi];

    pub fn display_name(self) -> &'static str {
        match self {
            UserId::Mate => "Máté",
            UserId::Szilvi => "Szilvi",
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        UserId::ALL
            .into_iter()
            .find(|user| user.display_name().to_lowercase() == wanted)
            .ok_or_else(|| Error::InvalidUser(s.to_string()))
    }
}

/// Exactly one persona per declared user
#[derive(Debug)]
pub struct PersonaRoster {
    mate: Persona,
    szilvi: Persona,
}

impl PersonaRoster {
    pub fn new(mate: Persona, szilvi: Persona) -> Self {
        Self { mate, szilvi }
    }

    /// Build both personas from config, sharing one secret table
    pub fn from_config(config: &Config, secrets: Arc<SecretCommandTable>) -> Self {
        let build = |persona: &PersonaConfig| {
            Persona::new(
                &persona.name,
                speech::build_speaker(&config.speaker, &persona.name, persona.voice.as_deref()),
                Arc::clone(&secrets),
                &config.phrases.fallback,
            )
        };
        Self::new(build(&config.personas.mate), build(&config.personas.szilvi))
    }

    pub fn get(&self, user: UserId) -> &Persona {
        match user {
            UserId::Mate => &self.mate,
            UserId::Szilvi => &self.szilvi,
        }
    }
}
