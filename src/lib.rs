//! Remény & Aenor - a two-persona voice assistant shell
//!
//! Typed or spoken text is routed to the persona of the active user.
//! Secret phrases trigger canned responses; everything else gets the
//! persona's fallback reply.

pub mod config;
pub mod error;
pub mod persona;
pub mod repl;
pub mod secrets;
pub mod session;
pub mod speech;
pub mod state;
pub mod ui;

pub use config::Config;
pub use error::{Error, Result};
pub use persona::{Acknowledged, Persona, PersonaRoster, UserId};
pub use secrets::SecretCommandTable;
pub use session::{CaptureDisposition, CaptureOutcome, CaptureRequest, Session};
pub use speech::{Listener, RecognitionFailure, Speaker};
pub use state::{CaptureTicket, ListenState};
