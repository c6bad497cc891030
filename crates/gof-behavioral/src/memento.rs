//! Memento: the editor saves snapshots of itself and moves between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BehavioralError, Result};

/// A saved editor state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorMemento {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct Editor {
    title: String,
    content: String,
    versions: Vec<EditorMemento>,
    index: usize,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append a snapshot of the current state and point at it.
    ///
    /// Snapshots after the current one are kept; a save after undo appends
    /// at the end.
    pub fn save(&mut self) {
        self.versions.push(EditorMemento {
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: Utc::now(),
        });
        self.index = self.versions.len() - 1;
        debug!(version = self.index, "editor saved");
    }

    pub fn undo(&mut self) -> Result<()> {
        let target = self.index.checked_sub(1);
        self.load(target)
    }

    pub fn redo(&mut self) -> Result<()> {
        self.load(Some(self.index + 1))
    }

    pub fn versions(&self) -> &[EditorMemento] {
        &self.versions
    }

    /// `title=..., content=...`
    pub fn show(&self) -> String {
        format!("title={}, content={}", self.title, self.content)
    }

    fn load(&mut self, index: Option<usize>) -> Result<()> {
        if self.versions.is_empty() {
            return Err(BehavioralError::NoHistory);
        }
        let (index, memento) = index
            .and_then(|i| self.versions.get(i).map(|m| (i, m)))
            .ok_or(BehavioralError::NoMoreHistory)?;
        self.title = memento.title.clone();
        self.content = memento.content.clone();
        self.index = index;
        debug!(version = index, "editor restored");
        Ok(())
    }
}
