//! The [`StreamContext`]: current state plus identity.

use tracing::debug;

use crate::error::{Result, StreamError};
use crate::state::{next_state, Effect, Event, StreamState};

/// Owns the current [`StreamState`] and the stream's name.
///
/// The context is plain data and carries no lock. A stream is meant to be
/// driven by one caller at a time; wrap it in a `Mutex` to share it.
#[derive(Clone, Debug)]
pub struct StreamContext {
    name: String,
    state: StreamState,
}

impl StreamContext {
    /// Create a context in the `Idle` state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: StreamState::Idle,
        }
    }

    /// The stream identity used in diagnostics and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Replace the current state.
    ///
    /// No validation happens here; legality is decided by [`next_state`]
    /// before a switch is requested.
    pub fn switch(&mut self, next: StreamState) {
        debug!(stream = %self.name, from = %self.state.kind(), to = %next.kind(), "state switch");
        self.state = next;
    }

    /// Run `event` through the transition table and apply the result.
    ///
    /// A change of mode goes through [`switch`](Self::switch); a counter
    /// update stays in the current mode.
    pub fn apply(&mut self, event: Event) -> Result<Effect> {
        let operation = event.operation();
        match next_state(self.state, event) {
            Ok((next, effect)) => {
                if next.kind() != self.state.kind() {
                    self.switch(next);
                } else {
                    self.state = next;
                }
                debug!(
                    stream = %self.name,
                    op = %operation,
                    state = %self.state.kind(),
                    bytes_read = self.state.bytes_read(),
                    bytes_written = self.state.bytes_written(),
                    "stream op"
                );
                Ok(effect)
            }
            Err(rejection) => {
                debug!(
                    stream = %self.name,
                    op = %operation,
                    state = %rejection.state,
                    reason = %rejection.reason,
                    "stream op rejected"
                );
                Err(StreamError::InvalidStateTransition {
                    operation: rejection.operation,
                    state: rejection.state,
                    stream: self.name.clone(),
                    reason: rejection.reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Operation, RejectReason, StateKind};

    #[test]
    fn new_context_is_idle() {
        let ctx = StreamContext::new("a.txt");
        assert_eq!(ctx.name(), "a.txt");
        assert_eq!(ctx.state(), StreamState::Idle);
    }

    #[test]
    fn switch_is_unconditional() {
        let mut ctx = StreamContext::new("a.txt");
        ctx.switch(StreamState::Closed);
        assert_eq!(ctx.state(), StreamState::Closed);
        // The context itself does not guard the terminal state.
        ctx.switch(StreamState::Idle);
        assert_eq!(ctx.state(), StreamState::Idle);
    }

    #[test]
    fn apply_attaches_identity_to_rejections() {
        let mut ctx = StreamContext::new("x.bin");
        let err = ctx.apply(Event::Read(16)).unwrap_err();
        assert_eq!(
            err,
            StreamError::InvalidStateTransition {
                operation: Operation::Read,
                state: StateKind::Idle,
                stream: "x.bin".into(),
                reason: RejectReason::NotOpened,
            }
        );
        assert_eq!(ctx.state(), StreamState::Idle);
    }

    #[test]
    fn apply_accumulates_within_a_mode() {
        let mut ctx = StreamContext::new("x.bin");
        assert_eq!(ctx.apply(Event::OpenWrite).unwrap(), Effect::Opened);
        assert_eq!(ctx.apply(Event::Write(3)).unwrap(), Effect::Transferred(3));
        assert_eq!(ctx.apply(Event::Write(4)).unwrap(), Effect::Transferred(4));
        assert_eq!(ctx.state(), StreamState::Writing { bytes_written: 7 });
    }
}
