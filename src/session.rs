//! Session - routes input to the active persona and runs the listening cycle
//!
//! The listening cycle is `Idle -> Listening -> Idle`. Starting a capture
//! speaks the "speak now" prompt and hands back a [`CaptureRequest`]; the
//! host runs it (possibly on another thread) and feeds the
//! [`CaptureOutcome`] back through [`Session::on_capture_complete`]. An
//! outcome whose ticket is no longer in flight is dropped without a sound.
//!
//! Cancelling only moves the session back to `Idle`; the abandoned capture
//! keeps running until the listener returns. No new capture is issued while
//! an earlier [`CaptureRequest`] is still alive.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{Config, Phrases};
use crate::error::{Error, Result};
use crate::persona::{Acknowledged, Persona, PersonaRoster, UserId};
use crate::secrets::SecretCommandTable;
use crate::speech::{self, Listener, RecognitionFailure};
use crate::state::{CaptureTicket, ListenState};

/// A capture the host should run, then report back
///
/// The listener counts as busy until the request has run or been dropped.
pub struct CaptureRequest {
    ticket: CaptureTicket,
    listener: Arc<dyn Listener>,
    busy: Arc<AtomicBool>,
}

impl CaptureRequest {
    pub fn ticket(&self) -> CaptureTicket {
        self.ticket
    }

    /// Block for one utterance
    pub fn run(self) -> CaptureOutcome {
        CaptureOutcome {
            ticket: self.ticket,
            result: self.listener.capture(),
        }
    }
}

impl Drop for CaptureRequest {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Result of one capture, tagged with the ticket it was issued under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub ticket: CaptureTicket,
    pub result: std::result::Result<String, RecognitionFailure>,
}

/// What the session did with a capture outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDisposition {
    /// The capture was no longer in flight
    Discarded,
    /// Recognized text was dispatched; `None` if it was blank
    Dispatched(Option<Acknowledged>),
    /// Recognition failed and an apology was spoken
    Apologized(RecognitionFailure),
}

pub struct Session {
    roster: PersonaRoster,
    active_user: UserId,
    phrases: Phrases,
    listener: std::result::Result<Arc<dyn Listener>, String>,
    state: ListenState,
    next_ticket: CaptureTicket,
    /// Set while a handed-out capture request has not finished
    capture_busy: Arc<AtomicBool>,
}

impl Session {
    /// New session without audio input
    pub fn new(roster: PersonaRoster, active_user: UserId, phrases: Phrases) -> Self {
        Self {
            roster,
            active_user,
            phrases,
            listener: Err("no listener acquired".into()),
            state: ListenState::Idle,
            next_ticket: CaptureTicket::first(),
            capture_busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn Listener>) -> Self {
        self.listener = Ok(listener);
        self
    }

    /// Build everything from config
    ///
    /// A listener that cannot be acquired leaves the session running without
    /// listening; see [`Session::listening_unavailable`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let secrets = SecretCommandTable::new(&config.secrets)?;
        let roster = PersonaRoster::from_config(config, secrets);
        let user: UserId = config.default_user.parse()?;
        let mut session = Session::new(roster, user, config.phrases.clone());

        match speech::acquire_listener(&config.listener) {
            Ok(listener) => session = session.with_listener(listener),
            Err(e) => {
                tracing::warn!(error = %e, "listening disabled");
                session.listener = Err(e.to_string());
            }
        }
        Ok(session)
    }

    pub fn active_user(&self) -> UserId {
        self.active_user
    }

    pub fn active_persona(&self) -> &Persona {
        self.roster.get(self.active_user)
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state.is_listening()
    }

    /// True while a capture request is out, including one already cancelled
    pub fn capture_in_flight(&self) -> bool {
        self.capture_busy.load(Ordering::SeqCst)
    }

    /// Why listening is unavailable, if it is
    pub fn listening_unavailable(&self) -> Option<&str> {
        self.listener.as_ref().err().map(String::as_str)
    }

    /// Startup greeting from the active persona
    pub fn greet(&self) -> Result<()> {
        self.active_persona().speak(&self.phrases.greeting)
    }

    pub fn switch_user(&mut self, user: UserId) {
        tracing::debug!(from = %self.active_user, to = %user, "switching user");
        self.active_user = user;
    }

    /// Route `raw` to the active persona; blank input is ignored
    pub fn dispatch_text(&self, raw: &str) -> Result<Option<Acknowledged>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        self.active_persona().respond(raw).map(Some)
    }

    /// Begin a capture
    ///
    /// Returns `None` if a capture is already in flight, or if a cancelled
    /// one has not returned yet. The prompt is spoken before the request is
    /// handed out.
    pub fn start_listening(&mut self) -> Result<Option<CaptureRequest>> {
        let listener = match &self.listener {
            Ok(listener) => Arc::clone(listener),
            Err(reason) => return Err(Error::DeviceUnavailable(reason.clone())),
        };
        if self.state.is_listening() {
            tracing::debug!(state = %self.state, "already listening");
            return Ok(None);
        }
        if self.capture_in_flight() {
            tracing::debug!("previous capture still running");
            return Ok(None);
        }

        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        self.state = ListenState::Listening(ticket);
        tracing::debug!(state = %self.state, "listening");

        if let Err(e) = self.active_persona().speak(&self.phrases.speak_now) {
            self.state = ListenState::Idle;
            return Err(e);
        }
        self.capture_busy.store(true, Ordering::SeqCst);
        Ok(Some(CaptureRequest {
            ticket,
            listener,
            busy: Arc::clone(&self.capture_busy),
        }))
    }

    /// Cancel the capture in flight; its result will be discarded
    pub fn stop_listening(&mut self) -> bool {
        let was_listening = self.state.is_listening();
        if was_listening {
            tracing::debug!(state = %self.state, "listening cancelled");
        }
        self.state = ListenState::Idle;
        was_listening
    }

    /// Finish a capture started by [`Session::start_listening`]
    pub fn complete_capture(&mut self, outcome: CaptureOutcome) -> Result<CaptureDisposition> {
        if !self.state.is_current(outcome.ticket) {
            tracing::debug!(ticket = %outcome.ticket, state = %self.state, "discarding capture result");
            return Ok(CaptureDisposition::Discarded);
        }
        self.state = ListenState::Idle;

        match outcome.result {
            Ok(text) => {
                tracing::debug!(ticket = %outcome.ticket, text, "heard");
                self.dispatch_text(&text).map(CaptureDisposition::Dispatched)
            }
            Err(failure) => {
                tracing::debug!(ticket = %outcome.ticket, %failure, "recognition failed");
                let apology = match failure {
                    RecognitionFailure::NoSpeechDetected => &self.phrases.not_understood,
                    RecognitionFailure::ServiceUnavailable => &self.phrases.no_network,
                };
                self.active_persona().speak(apology)?;
                Ok(CaptureDisposition::Apologized(failure))
            }
        }
    }

    /// Start a capture, block on it, and finish it
    ///
    /// Returns `None` if a capture was already in flight.
    pub fn listen_once(&mut self) -> Result<Option<CaptureDisposition>> {
        match self.start_listening()? {
            Some(request) => self.complete_capture(request.run()).map(Some),
            None => Ok(None),
        }
    }

    // ========================================================================
    // UI boundary
    // ========================================================================

    /// User picked from the user selector
    pub fn on_user_selected(&mut self, name: &str) -> Result<()> {
        let user = name.parse()?;
        self.switch_user(user);
        Ok(())
    }

    /// Typed text was submitted
    ///
    /// Unlike the voice path, an unmatched command is followed by the
    /// "unknown command" line.
    pub fn on_command_submitted(&self, text: &str) -> Result<Option<Acknowledged>> {
        let ack = self.dispatch_text(text.trim())?;
        if ack == Some(Acknowledged::Fallback) {
            self.active_persona().speak(&self.phrases.unknown_command)?;
        }
        Ok(ack)
    }

    /// Listen toggle flipped on or off
    pub fn on_listen_toggle(&mut self, on: bool) -> Result<Option<CaptureRequest>> {
        if on {
            self.start_listening()
        } else {
            self.stop_listening();
            Ok(None)
        }
    }

    /// A capture finished
    pub fn on_capture_complete(&mut self, outcome: CaptureOutcome) -> Result<CaptureDisposition> {
        self.complete_capture(outcome)
    }
}
