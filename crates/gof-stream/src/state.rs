//! Stream states and the transition function.
//!
//! The mode of a stream is a tagged enum whose payload carries the
//! per-mode counters. Entering a mode always builds a fresh value, so
//! counters never survive a transition.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StreamState
// ---------------------------------------------------------------------------

/// The current mode of a stream, with its mode-local counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StreamState {
    /// Not opened. Only open and close are legal.
    #[default]
    Idle,
    /// Opened for reading.
    Reading { bytes_read: u64 },
    /// Opened for writing.
    Writing { bytes_written: u64 },
    /// Terminal. Only a repeated close is accepted.
    Closed,
}

impl StreamState {
    /// The mode without its counters.
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Idle => StateKind::Idle,
            Self::Reading { .. } => StateKind::Reading,
            Self::Writing { .. } => StateKind::Writing,
            Self::Closed => StateKind::Closed,
        }
    }

    /// Returns `true` once the stream has been closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Bytes read since entering `Reading`; zero in any other mode.
    pub fn bytes_read(&self) -> u64 {
        match self {
            Self::Reading { bytes_read } => *bytes_read,
            _ => 0,
        }
    }

    /// Bytes written since entering `Writing`; zero in any other mode.
    pub fn bytes_written(&self) -> u64 {
        match self {
            Self::Writing { bytes_written } => *bytes_written,
            _ => 0,
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reading { bytes_read } => write!(f, "reading(read={bytes_read})"),
            Self::Writing { bytes_written } => write!(f, "writing(written={bytes_written})"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// A stream mode without payload, used in errors and comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Idle,
    Reading,
    Writing,
    Closed,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::Writing => "writing",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Events and operations
// ---------------------------------------------------------------------------

/// The stream API operations, without arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    OpenRead,
    OpenWrite,
    Read,
    Write,
    Close,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OpenRead => "open_read",
            Self::OpenWrite => "open_write",
            Self::Read => "read",
            Self::Write => "write",
            Self::Close => "close",
        };
        f.write_str(s)
    }
}

/// An operation together with its argument, fed to [`next_state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "len", rename_all = "snake_case")]
pub enum Event {
    OpenRead,
    OpenWrite,
    /// Read into a buffer of this many bytes.
    Read(usize),
    /// Write this many bytes.
    Write(usize),
    Close,
}

impl Event {
    /// The operation this event represents.
    pub fn operation(&self) -> Operation {
        match self {
            Self::OpenRead => Operation::OpenRead,
            Self::OpenWrite => Operation::OpenWrite,
            Self::Read(_) => Operation::Read,
            Self::Write(_) => Operation::Write,
            Self::Close => Operation::Close,
        }
    }
}

/// The observable outcome of an accepted event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The stream entered `Reading` or `Writing`.
    Opened,
    /// Bytes were moved; the counter of the current mode grew by this amount.
    Transferred(usize),
    /// The stream entered `Closed`.
    Closed,
    /// Accepted without any change (close on a closed stream).
    Unchanged,
}

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// Why an operation is illegal in the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotOpened,
    AlreadyReading,
    AlreadyWriting,
    CannotRead,
    CannotWrite,
    AlreadyClosed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotOpened => "not opened",
            Self::AlreadyReading => "already reading",
            Self::AlreadyWriting => "already writing",
            Self::CannotRead => "cannot read",
            Self::CannotWrite => "cannot write",
            Self::AlreadyClosed => "already closed",
        };
        f.write_str(s)
    }
}

/// A rejected event. The caller attaches the stream identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub operation: Operation,
    pub state: StateKind,
    pub reason: RejectReason,
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Compute the state that follows `current` when `event` is applied.
///
/// This is the whole state table of the stream. It is pure: no tracing, no
/// identity, no mutation. Counters saturate rather than wrap.
pub fn next_state(
    current: StreamState,
    event: Event,
) -> std::result::Result<(StreamState, Effect), Rejection> {
    use RejectReason::*;

    let reject = |reason| Rejection {
        operation: event.operation(),
        state: current.kind(),
        reason,
    };

    match (current, event) {
        // Close is legal everywhere; on a closed stream it changes nothing.
        (StreamState::Closed, Event::Close) => Ok((StreamState::Closed, Effect::Unchanged)),
        (StreamState::Closed, _) => Err(reject(AlreadyClosed)),
        (_, Event::Close) => Ok((StreamState::Closed, Effect::Closed)),

        (StreamState::Idle, Event::OpenRead) => {
            Ok((StreamState::Reading { bytes_read: 0 }, Effect::Opened))
        }
        (StreamState::Idle, Event::OpenWrite) => {
            Ok((StreamState::Writing { bytes_written: 0 }, Effect::Opened))
        }
        (StreamState::Idle, Event::Read(_) | Event::Write(_)) => Err(reject(NotOpened)),

        (StreamState::Reading { .. }, Event::OpenRead | Event::OpenWrite) => {
            Err(reject(AlreadyReading))
        }
        (StreamState::Reading { bytes_read }, Event::Read(len)) => Ok((
            StreamState::Reading {
                bytes_read: bytes_read.saturating_add(len as u64),
            },
            Effect::Transferred(len),
        )),
        (StreamState::Reading { .. }, Event::Write(_)) => Err(reject(CannotWrite)),

        (StreamState::Writing { .. }, Event::OpenRead | Event::OpenWrite) => {
            Err(reject(AlreadyWriting))
        }
        (StreamState::Writing { bytes_written }, Event::Write(len)) => Ok((
            StreamState::Writing {
                bytes_written: bytes_written.saturating_add(len as u64),
            },
            Effect::Transferred(len),
        )),
        (StreamState::Writing { .. }, Event::Read(_)) => Err(reject(CannotRead)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(n: u64) -> StreamState {
        StreamState::Reading { bytes_read: n }
    }

    fn writing(n: u64) -> StreamState {
        StreamState::Writing { bytes_written: n }
    }

    fn rejected(current: StreamState, event: Event) -> RejectReason {
        next_state(current, event).unwrap_err().reason
    }

    #[test]
    fn idle_opens_and_closes() {
        assert_eq!(
            next_state(StreamState::Idle, Event::OpenRead).unwrap(),
            (reading(0), Effect::Opened)
        );
        assert_eq!(
            next_state(StreamState::Idle, Event::OpenWrite).unwrap(),
            (writing(0), Effect::Opened)
        );
        assert_eq!(
            next_state(StreamState::Idle, Event::Close).unwrap(),
            (StreamState::Closed, Effect::Closed)
        );
    }

    #[test]
    fn idle_rejects_transfers() {
        assert_eq!(rejected(StreamState::Idle, Event::Read(1)), RejectReason::NotOpened);
        assert_eq!(rejected(StreamState::Idle, Event::Write(1)), RejectReason::NotOpened);
    }

    #[test]
    fn reading_row() {
        assert_eq!(rejected(reading(0), Event::OpenRead), RejectReason::AlreadyReading);
        assert_eq!(rejected(reading(0), Event::OpenWrite), RejectReason::AlreadyReading);
        assert_eq!(rejected(reading(0), Event::Write(4)), RejectReason::CannotWrite);
        assert_eq!(
            next_state(reading(10), Event::Read(5)).unwrap(),
            (reading(15), Effect::Transferred(5))
        );
        assert_eq!(
            next_state(reading(10), Event::Close).unwrap(),
            (StreamState::Closed, Effect::Closed)
        );
    }

    #[test]
    fn writing_row() {
        assert_eq!(rejected(writing(0), Event::OpenRead), RejectReason::AlreadyWriting);
        assert_eq!(rejected(writing(0), Event::OpenWrite), RejectReason::AlreadyWriting);
        assert_eq!(rejected(writing(0), Event::Read(4)), RejectReason::CannotRead);
        assert_eq!(
            next_state(writing(1), Event::Write(2)).unwrap(),
            (writing(3), Effect::Transferred(2))
        );
    }

    #[test]
    fn closed_is_terminal() {
        for event in [Event::OpenRead, Event::OpenWrite, Event::Read(1), Event::Write(1)] {
            let rejection = next_state(StreamState::Closed, event).unwrap_err();
            assert_eq!(rejection.reason, RejectReason::AlreadyClosed);
            assert_eq!(rejection.state, StateKind::Closed);
            assert_eq!(rejection.operation, event.operation());
        }
        assert_eq!(
            next_state(StreamState::Closed, Event::Close).unwrap(),
            (StreamState::Closed, Effect::Unchanged)
        );
    }

    #[test]
    fn counters_saturate() {
        let (state, _) = next_state(reading(u64::MAX - 1), Event::Read(8)).unwrap();
        assert_eq!(state.bytes_read(), u64::MAX);
    }

    #[test]
    fn counter_accessors_are_mode_local() {
        assert_eq!(reading(7).bytes_read(), 7);
        assert_eq!(reading(7).bytes_written(), 0);
        assert_eq!(writing(9).bytes_written(), 9);
        assert_eq!(StreamState::Closed.bytes_read(), 0);
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(StreamState::default(), StreamState::Idle);
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(reading(3).to_string(), "reading(read=3)");
        assert_eq!(StreamState::Idle.to_string(), "idle");
        let json = serde_json::to_string(&writing(2)).unwrap();
        assert_eq!(json, r#"{"state":"writing","bytes_written":2}"#);
        let back: StreamState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, writing(2));
    }
}
