//! Decorator: a JSON logger wraps any other logger and reformats each
//! message before passing it on.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Local;
use serde::Serialize;

use crate::error::{Result, StructuralError};

/// Severity of a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

fn now_string() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// A named logger.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, msg: &str) -> Result<()>;

    fn debug(&self, msg: &str) -> Result<()> {
        self.log(Level::Debug, msg)
    }

    fn info(&self, msg: &str) -> Result<()> {
        self.log(Level::Info, msg)
    }

    fn warn(&self, msg: &str) -> Result<()> {
        self.log(Level::Warn, msg)
    }

    fn error(&self, msg: &str) -> Result<()> {
        self.log(Level::Error, msg)
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn log(&self, level: Level, msg: &str) -> Result<()> {
        (**self).log(level, msg)
    }
}

/// Writes `<time> [<name>] <LEVEL> <msg>` lines.
pub struct ConsoleLogger<W: Write> {
    name: String,
    out: Mutex<W>,
}

impl<W: Write> ConsoleLogger<W> {
    pub fn new(name: impl Into<String>, out: W) -> Self {
        Self {
            name: name.into(),
            out: Mutex::new(out),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ConsoleLogger<io::Stdout> {
    pub fn stdout(name: impl Into<String>) -> Self {
        Self::new(name, io::stdout())
    }
}

impl<W: Write + Send> Logger for ConsoleLogger<W> {
    fn log(&self, level: Level, msg: &str) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|e| StructuralError::LockPoisoned(e.to_string()))?;
        writeln!(out, "{} [{}] {} {}", now_string(), self.name, level, msg)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonMessage<'a> {
    time: String,
    level: Level,
    msg: &'a str,
}

/// Re-encodes each message as `{"time","level","msg"}` before handing it to
/// the wrapped logger.
pub struct JsonLogger<L> {
    inner: L,
}

impl<L: Logger> JsonLogger<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: Logger> Logger for JsonLogger<L> {
    fn log(&self, level: Level, msg: &str) -> Result<()> {
        let body = serde_json::to_string(&JsonMessage {
            time: now_string(),
            level,
            msg,
        })?;
        self.inner.log(level, &body)
    }
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

type BoxedWriter = Box<dyn Write + Send>;
type MakeWriter = Box<dyn Fn() -> BoxedWriter + Send + Sync>;

/// Hands out named loggers.
pub trait LoggerFactory: Send + Sync {
    fn logger(&self, name: &str) -> Box<dyn Logger>;
}

/// Produces console loggers, each writing to a fresh writer from `make`.
pub struct ConsoleLoggerFactory {
    make: MakeWriter,
}

impl ConsoleLoggerFactory {
    pub fn new<F, W>(make: F) -> Self
    where
        F: Fn() -> W + Send + Sync + 'static,
        W: Write + Send + 'static,
    {
        Self {
            make: Box::new(move || Box::new(make()) as BoxedWriter),
        }
    }

    pub fn console_logger(&self, name: &str) -> ConsoleLogger<BoxedWriter> {
        ConsoleLogger::new(name, (self.make)())
    }
}

impl Default for ConsoleLoggerFactory {
    fn default() -> Self {
        Self::new(io::stdout)
    }
}

impl LoggerFactory for ConsoleLoggerFactory {
    fn logger(&self, name: &str) -> Box<dyn Logger> {
        Box::new(self.console_logger(name))
    }
}

/// Console loggers decorated with JSON formatting.
#[derive(Default)]
pub struct JsonLoggerFactory {
    console: ConsoleLoggerFactory,
}

impl JsonLoggerFactory {
    pub fn new(console: ConsoleLoggerFactory) -> Self {
        Self { console }
    }
}

impl LoggerFactory for JsonLoggerFactory {
    fn logger(&self, name: &str) -> Box<dyn Logger> {
        Box::new(JsonLogger::new(self.console.console_logger(name)))
    }
}
