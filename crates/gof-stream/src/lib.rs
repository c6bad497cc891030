//! State-machine driven mock file stream.
//!
//! A [`MockFileStream`] is always in exactly one of four modes: idle,
//! reading, writing or closed. Every operation is checked against the
//! current mode by a pure transition function ([`next_state`]); illegal
//! operations are rejected with [`StreamError::InvalidStateTransition`]
//! rather than queued or ignored.
//!
//! # Lifecycle
//!
//! ```text
//!            open_read            close
//!   Idle ──────────────► Reading ───────┐
//!    │  │   open_write            close ▼
//!    │  └──────────────► Writing ───► Closed ◄─┐
//!    │                                  │      │ close (no-op)
//!    └──────────── close ─────────────► └──────┘
//! ```
//!
//! # Modules
//!
//! - [`error`]: The single stream error kind
//! - [`state`]: [`StreamState`], events, effects and [`next_state`]
//! - [`context`]: [`StreamContext`]: owns the state and the identity
//! - [`traits`]: The [`FileStream`] API trait
//! - [`stream`]: The [`MockFileStream`] facade

pub mod context;
pub mod error;
pub mod state;
pub mod stream;
pub mod traits;

pub use context::StreamContext;
pub use error::{Result, StreamError};
pub use state::{next_state, Effect, Event, Operation, RejectReason, Rejection, StateKind, StreamState};
pub use stream::MockFileStream;
pub use traits::FileStream;
