//! The [`FileStream`] trait: the public stream API.

use crate::error::Result;
use crate::state::StreamState;

/// A stream whose legal operations depend on its current mode.
///
/// Object-safe so callers can hold a `Box<dyn FileStream>`.
pub trait FileStream: Send {
    /// The stream identity.
    fn name(&self) -> &str;

    /// The current state, including mode-local counters.
    fn state(&self) -> StreamState;

    /// Open for reading. Legal only while idle.
    fn open_read(&mut self) -> Result<()>;

    /// Open for writing. Legal only while idle.
    fn open_write(&mut self) -> Result<()>;

    /// Read into `buf`, returning the number of bytes read.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write `buf`, returning the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Close the stream. Closing a closed stream is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Returns `true` once the stream has been closed.
    fn is_closed(&self) -> bool {
        self.state().is_closed()
    }
}
