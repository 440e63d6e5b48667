//! Listening state - whether a capture is in flight, and which one

use std::fmt;

/// Identifies one capture attempt so late results can be told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureTicket(u64);

impl CaptureTicket {
    pub fn first() -> Self {
        CaptureTicket(1)
    }

    pub fn next(self) -> Self {
        CaptureTicket(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CaptureTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenState {
    #[default]
    Idle,
    /// A capture is logically in flight
    Listening(CaptureTicket),
}

impl ListenState {
    pub fn is_listening(&self) -> bool {
        matches!(self, ListenState::Listening(_))
    }

    /// True when `ticket` is the capture currently in flight
    pub fn is_current(&self, ticket: CaptureTicket) -> bool {
        *self == ListenState::Listening(ticket)
    }
}

impl fmt::Display for ListenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenState::Idle => write!(f, "Idle"),
            ListenState::Listening(ticket) => write!(f, "Listening {}", ticket),
        }
    }
}
