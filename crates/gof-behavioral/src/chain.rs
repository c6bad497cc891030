//! Chain of responsibility: each filter writes lines of its own level and
//! passes everything else to the next filter.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{BehavioralError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Destination of formatted log lines.
pub trait LineWriter: Send {
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Stands in for a log file: lines are kept in memory under a file name.
///
/// Clones share the same line buffer.
#[derive(Clone, Debug)]
pub struct MemoryFileWriter {
    file: String,
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryFileWriter {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Lines written so far.
    pub fn lines(&self) -> Result<Vec<String>> {
        self.lines
            .lock()
            .map(|l| l.clone())
            .map_err(|e| BehavioralError::LockPoisoned(e.to_string()))
    }
}

impl LineWriter for MemoryFileWriter {
    fn write_line(&mut self, line: &str) -> Result<()> {
        trace!(file = %self.file, line, "write line");
        self.lines
            .lock()
            .map_err(|e| BehavioralError::LockPoisoned(e.to_string()))?
            .push(line.to_string());
        Ok(())
    }
}

/// One link of the chain.
pub struct LevelFilter {
    level: LogLevel,
    writer: Box<dyn LineWriter>,
    next: Option<Box<LevelFilter>>,
}

impl LevelFilter {
    pub fn new(level: LogLevel, writer: impl LineWriter + 'static) -> Self {
        Self {
            level,
            writer: Box::new(writer),
            next: None,
        }
    }

    /// Set the successor, replacing any previous one.
    pub fn set_next(&mut self, next: LevelFilter) {
        self.next = Some(Box::new(next));
    }

    pub fn with_next(mut self, next: LevelFilter) -> Self {
        self.set_next(next);
        self
    }

    /// Write `msg` if this link owns `level`, otherwise forward it.
    /// Returns `false` when no link in the chain took the line.
    pub fn handle(&mut self, level: LogLevel, msg: &str) -> Result<bool> {
        if self.level == level {
            self.writer.write_line(&format!("{level} {msg}"))?;
            return Ok(true);
        }
        match self.next.as_mut() {
            Some(next) => next.handle(level, msg),
            None => {
                debug!(%level, "no filter for level");
                Ok(false)
            }
        }
    }
}

/// A logger backed by a debug → info → error chain, each writing to its own
/// in-memory file.
pub struct ChainLogger {
    chain: LevelFilter,
    files: Vec<MemoryFileWriter>,
}

impl ChainLogger {
    pub fn new() -> Self {
        let debug_log = MemoryFileWriter::new("debug.log");
        let info_log = MemoryFileWriter::new("info.log");
        let error_log = MemoryFileWriter::new("error.log");

        let chain = LevelFilter::new(LogLevel::Debug, debug_log.clone()).with_next(
            LevelFilter::new(LogLevel::Info, info_log.clone())
                .with_next(LevelFilter::new(LogLevel::Error, error_log.clone())),
        );
        Self {
            chain,
            files: vec![debug_log, info_log, error_log],
        }
    }

    pub fn debug(&mut self, msg: &str) -> Result<bool> {
        self.chain.handle(LogLevel::Debug, msg)
    }

    pub fn info(&mut self, msg: &str) -> Result<bool> {
        self.chain.handle(LogLevel::Info, msg)
    }

    pub fn error(&mut self, msg: &str) -> Result<bool> {
        self.chain.handle(LogLevel::Error, msg)
    }

    /// Lines written to the named file, empty for unknown files.
    pub fn written(&self, file: &str) -> Result<Vec<String>> {
        match self.files.iter().find(|w| w.file() == file) {
            Some(writer) => writer.lines(),
            None => Ok(Vec::new()),
        }
    }
}

impl Default for ChainLogger {
    fn default() -> Self {
        Self::new()
    }
}
