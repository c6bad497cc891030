//! The [`MockFileStream`] facade.
//!
//! The stream operations live on the [`FileStream`] trait; bring it into
//! scope to call them.
//!
//! Every call is forwarded exactly once to the transition table through the
//! [`StreamContext`]. Nothing is buffered and nothing is retried. No bytes
//! are actually produced or stored: a read reports the size of the caller's
//! buffer and leaves it untouched.

use std::io;

use crate::context::StreamContext;
use crate::error::Result;
use crate::state::{Effect, Event, StreamState};
use crate::traits::FileStream;

/// A mock file stream gated by its current mode.
#[derive(Clone, Debug)]
pub struct MockFileStream {
    context: StreamContext,
}

impl MockFileStream {
    /// Create a stream in the `Idle` state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            context: StreamContext::new(name),
        }
    }

    /// Bytes read in the current `Reading` mode, zero otherwise.
    pub fn bytes_read(&self) -> u64 {
        self.context.state().bytes_read()
    }

    /// Bytes written in the current `Writing` mode, zero otherwise.
    pub fn bytes_written(&self) -> u64 {
        self.context.state().bytes_written()
    }

    /// Apply an open/close event.
    fn control(&mut self, event: Event) -> Result<()> {
        self.context.apply(event).map(|_| ())
    }

    /// Apply a read/write event and report the number of bytes moved.
    fn transfer(&mut self, event: Event) -> Result<usize> {
        match self.context.apply(event)? {
            Effect::Transferred(len) => Ok(len),
            _ => Ok(0),
        }
    }
}

impl FileStream for MockFileStream {
    fn name(&self) -> &str {
        self.context.name()
    }

    fn state(&self) -> StreamState {
        self.context.state()
    }

    fn open_read(&mut self) -> Result<()> {
        self.control(Event::OpenRead)
    }

    fn open_write(&mut self) -> Result<()> {
        self.control(Event::OpenWrite)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.transfer(Event::Read(buf.len()))
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.transfer(Event::Write(buf.len()))
    }

    fn close(&mut self) -> Result<()> {
        self.control(Event::Close)
    }
}

impl io::Read for MockFileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.transfer(Event::Read(buf.len())).map_err(io::Error::other)
    }
}

impl io::Write for MockFileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.transfer(Event::Write(buf.len())).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::state::{RejectReason, StateKind};
    use proptest::prelude::*;

    fn reason(err: StreamError) -> RejectReason {
        err.reason()
    }

    #[test]
    fn fresh_stream_is_idle() {
        let stream = MockFileStream::new("a.txt");
        assert_eq!(stream.state(), StreamState::Idle);
        assert_eq!(stream.name(), "a.txt");
    }

    #[test]
    fn transfer_before_open_fails() {
        let mut stream = MockFileStream::new("a.txt");
        let mut buf = [0u8; 4];
        assert_eq!(reason(stream.read(&mut buf).unwrap_err()), RejectReason::NotOpened);
        assert_eq!(reason(stream.write(&buf).unwrap_err()), RejectReason::NotOpened);
        assert_eq!(stream.state(), StreamState::Idle);
    }

    #[test]
    fn open_read_twice_fails() {
        let mut stream = MockFileStream::new("a.txt");
        stream.open_read().unwrap();
        let err = stream.open_read().unwrap_err();
        assert!(
            matches!(err, StreamError::InvalidStateTransition { .. }),
            "expected InvalidStateTransition, got: {err}"
        );
        assert_eq!(err.reason(), RejectReason::AlreadyReading);
    }

    #[test]
    fn reading_and_writing_exclude_each_other() {
        let mut reader = MockFileStream::new("r.txt");
        reader.open_read().unwrap();
        assert_eq!(reason(reader.write(b"x").unwrap_err()), RejectReason::CannotWrite);
        assert_eq!(reason(reader.open_write().unwrap_err()), RejectReason::AlreadyReading);

        let mut writer = MockFileStream::new("w.txt");
        writer.open_write().unwrap();
        let mut buf = [0u8; 1];
        assert_eq!(reason(writer.read(&mut buf).unwrap_err()), RejectReason::CannotRead);
        assert_eq!(reason(writer.open_read().unwrap_err()), RejectReason::AlreadyWriting);
    }

    #[test]
    fn read_only_scenario() {
        let mut stream = MockFileStream::new("a.txt");
        stream.open_read().unwrap();

        let mut buf = vec![0u8; 8192];
        assert_eq!(stream.read(&mut buf).unwrap(), 8192);
        assert_eq!(stream.bytes_read(), 8192);

        assert!(stream.write(&buf).is_err());
        stream.close().unwrap();

        let err = stream.open_read().unwrap_err();
        assert_eq!(err.state(), StateKind::Closed);
        assert_eq!(err.reason(), RejectReason::AlreadyClosed);
    }

    #[test]
    fn write_only_scenario() {
        let mut stream = MockFileStream::new("b.txt");
        stream.open_write().unwrap();
        assert_eq!(stream.write(&[7u8; 8192]).unwrap(), 8192);
        assert_eq!(stream.bytes_written(), 8192);
        stream.close().unwrap();
        stream.close().unwrap();
        assert_eq!(stream.state(), StreamState::Closed);
    }

    #[test]
    fn close_from_idle_is_terminal() {
        let mut stream = MockFileStream::new("c.txt");
        stream.close().unwrap();
        assert_eq!(reason(stream.open_write().unwrap_err()), RejectReason::AlreadyClosed);
        assert!(FileStream::is_closed(&stream));
    }

    #[test]
    fn read_leaves_buffer_untouched() {
        let mut stream = MockFileStream::new("d.txt");
        stream.open_read().unwrap();
        let mut buf = [0xAAu8; 3];
        stream.read(&mut buf).unwrap();
        assert_eq!(buf, [0xAA; 3]);
    }

    #[test]
    fn counters_drop_on_close() {
        let mut stream = MockFileStream::new("e.txt");
        stream.open_write().unwrap();
        stream.write(b"hello").unwrap();
        stream.close().unwrap();
        assert_eq!(stream.bytes_written(), 0);
    }

    #[test]
    fn usable_as_trait_object() {
        let mut streams: Vec<Box<dyn FileStream>> = vec![
            Box::new(MockFileStream::new("one")),
            Box::new(MockFileStream::new("two")),
        ];
        for s in streams.iter_mut() {
            s.open_write().unwrap();
            assert_eq!(s.write(b"abc").unwrap(), 3);
            s.close().unwrap();
            assert!(s.is_closed());
        }
        assert_eq!(streams[1].name(), "two");
    }

    #[test]
    fn io_traits_map_rejections_to_io_errors() {
        use std::io::{Read, Write};

        let mut stream = MockFileStream::new("io.txt");
        let err = Read::read(&mut stream, &mut [0u8; 2]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        let inner = err
            .get_ref()
            .and_then(|e| e.downcast_ref::<StreamError>())
            .unwrap();
        assert_eq!(inner.reason(), RejectReason::NotOpened);

        stream.open_write().unwrap();
        Write::write_all(&mut stream, b"payload").unwrap();
        Write::flush(&mut stream).unwrap();
        assert_eq!(stream.bytes_written(), 7);
    }

    // ---- Properties over arbitrary operation sequences ----

    fn any_event() -> impl Strategy<Value = Event> {
        prop_oneof![
            Just(Event::OpenRead),
            Just(Event::OpenWrite),
            (0usize..16_384).prop_map(Event::Read),
            (0usize..16_384).prop_map(Event::Write),
            Just(Event::Close),
        ]
    }

    proptest! {
        #[test]
        fn closed_never_leaves(events in prop::collection::vec(any_event(), 0..64)) {
            let mut ctx = StreamContext::new("prop");
            let mut closed = false;
            for event in events {
                let _ = ctx.apply(event);
                if closed {
                    prop_assert_eq!(ctx.state(), StreamState::Closed);
                }
                closed = ctx.state().is_closed();
            }
        }

        #[test]
        fn open_modes_only_entered_from_idle(events in prop::collection::vec(any_event(), 0..64)) {
            let mut ctx = StreamContext::new("prop");
            for event in events {
                let before = ctx.state().kind();
                let _ = ctx.apply(event);
                let after = ctx.state().kind();
                if after != before && matches!(after, StateKind::Reading | StateKind::Writing) {
                    prop_assert_eq!(before, StateKind::Idle);
                }
            }
        }

        #[test]
        fn counters_track_successful_transfers(events in prop::collection::vec(any_event(), 0..64)) {
            let mut ctx = StreamContext::new("prop");
            let mut expected: u64 = 0;
            for event in events {
                let before = ctx.state().kind();
                match ctx.apply(event) {
                    Ok(Effect::Transferred(n)) => expected += n as u64,
                    Ok(_) if ctx.state().kind() != before => expected = 0,
                    _ => {}
                }
                let state = ctx.state();
                prop_assert_eq!(state.bytes_read() + state.bytes_written(), expected);
            }
        }

        #[test]
        fn double_close_is_idempotent(events in prop::collection::vec(any_event(), 0..32)) {
            let mut stream = MockFileStream::new("prop");
            for event in events {
                let _ = stream.context.apply(event);
            }
            prop_assert!(stream.close().is_ok());
            prop_assert!(stream.close().is_ok());
            prop_assert_eq!(stream.state(), StreamState::Closed);
        }
    }
}
