//! Shared test utilities

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use remeny_aenor::config::{Phrases, SecretCommand};
use remeny_aenor::{
    Listener, Persona, PersonaRoster, RecognitionFailure, Result, SecretCommandTable, Session,
    Speaker, UserId,
};

pub type Log = Arc<Mutex<Vec<(String, String)>>>;

/// Records `(persona, text)` for every utterance
pub struct RecordingSpeaker {
    name: String,
    log: Log,
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push((self.name.clone(), text.to_string()));
        Ok(())
    }
}

/// Replays canned capture results in order
pub struct ScriptedListener {
    results: Mutex<VecDeque<std::result::Result<String, RecognitionFailure>>>,
}

impl ScriptedListener {
    pub fn new(results: Vec<std::result::Result<String, RecognitionFailure>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
        })
    }
}

impl Listener for ScriptedListener {
    fn capture(&self) -> std::result::Result<String, RecognitionFailure> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecognitionFailure::NoSpeechDetected))
    }
}

/// Blocks each capture until the test releases it
pub struct GatedListener {
    gate: flume::Receiver<String>,
}

impl GatedListener {
    pub fn new() -> (Arc<Self>, flume::Sender<String>) {
        let (tx, rx) = flume::unbounded();
        (Arc::new(Self { gate: rx }), tx)
    }
}

impl Listener for GatedListener {
    fn capture(&self) -> std::result::Result<String, RecognitionFailure> {
        self.gate
            .recv()
            .map_err(|_| RecognitionFailure::ServiceUnavailable)
    }
}

pub fn secret_commands() -> Vec<SecretCommand> {
    vec![
        SecretCommand {
            phrase: "szívkapu".into(),
            response: "Pulzáló fény aktiválva.".into(),
        },
        SecretCommand {
            phrase: "miatyánk".into(),
            response: "Csendes mód bekapcsolva.".into(),
        },
        SecretCommand {
            phrase: "anya".into(),
            response: "Meleg fény és emlékező hang aktiválva.".into(),
        },
    ]
}

pub fn persona(name: &str, secrets: &Arc<SecretCommandTable>, log: &Log) -> Persona {
    Persona::new(
        name,
        Box::new(RecordingSpeaker {
            name: name.to_string(),
            log: Arc::clone(log),
        }),
        Arc::clone(secrets),
        &Phrases::default().fallback,
    )
}

/// Session with Remény for Máté and Aenor for Szilvi, no listener
pub fn test_session(log: &Log) -> Session {
    let secrets = SecretCommandTable::new(&secret_commands()).expect("valid secret table");
    let roster = PersonaRoster::new(
        persona("Remény", &secrets, log),
        persona("Aenor", &secrets, log),
    );
    Session::new(roster, UserId::Mate, Phrases::default())
}

pub fn spoken(log: &Log) -> Vec<(String, String)> {
    log.lock().unwrap().clone()
}

pub fn line(name: &str, text: &str) -> (String, String) {
    (name.to_string(), text.to_string())
}
