//! Delegate: the dispatcher is itself a handler, but hands each message to
//! the handler registered for its class.

use std::collections::HashMap;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BehavioralError, Result};

pub const CLASS_ECHO: &str = "echo";
pub const CLASS_TIME: &str = "time";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub class: String,
    pub content: String,
}

impl Message {
    pub fn new(id: impl Into<String>, class: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            content: content.into(),
        }
    }

    pub fn echo(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, CLASS_ECHO, content)
    }

    pub fn time(id: impl Into<String>) -> Self {
        Self::new(id, CLASS_TIME, "")
    }
}

pub trait MessageHandler: Send + Sync {
    fn handle(&self, request: Message) -> Result<Message>;
}

/// Returns the request unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoHandler;

impl MessageHandler for EchoHandler {
    fn handle(&self, request: Message) -> Result<Message> {
        Ok(request)
    }
}

/// Replies with the local time as `YYYY-MM-DD HH:MM:SS`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeHandler;

impl MessageHandler for TimeHandler {
    fn handle(&self, request: Message) -> Result<Message> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(Message {
            content: now,
            ..request
        })
    }
}

/// Routes messages by class.
#[derive(Default)]
pub struct DispatchDelegate {
    handlers: HashMap<String, Box<dyn MessageHandler>>,
}

impl DispatchDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher with the `echo` and `time` handlers registered.
    pub fn with_defaults() -> Self {
        let mut delegate = Self::new();
        delegate.register(CLASS_ECHO, EchoHandler);
        delegate.register(CLASS_TIME, TimeHandler);
        delegate
    }

    pub fn register(&mut self, class: impl Into<String>, handler: impl MessageHandler + 'static) {
        self.handlers.insert(class.into(), Box::new(handler));
    }

    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        classes.sort_unstable();
        classes
    }
}

impl MessageHandler for DispatchDelegate {
    fn handle(&self, request: Message) -> Result<Message> {
        let Some(handler) = self.handlers.get(&request.class) else {
            warn!(id = %request.id, class = %request.class, "handler not found");
            return Err(BehavioralError::HandlerNotFound {
                id: request.id,
                class: request.class,
            });
        };
        debug!(id = %request.id, class = %request.class, "dispatch");
        handler.handle(request)
    }
}
