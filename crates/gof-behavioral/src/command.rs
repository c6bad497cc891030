//! Command: drawing operations are objects kept on a stack, so the canvas
//! can undo by dropping the last one and replaying the rest.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BehavioralError, Result};

/// Low-level drawing surface.
pub trait Graphics {
    fn clear(&mut self);

    fn color(&mut self, color: &str);

    fn dot(&mut self, x: i32, y: i32);

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
}

/// A primitive recorded by [`RecordingGraphics`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Clear,
    Color { color: String },
    Dot { x: i32, y: i32 },
    Line { x0: i32, y0: i32, x1: i32, y1: i32 },
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => f.write_str("clear"),
            Self::Color { color } => write!(f, "color {color}"),
            Self::Dot { x, y } => write!(f, "dot ({x}, {y})"),
            Self::Line { x0, y0, x1, y1 } => write!(f, "line ({x0}, {y0}) -> ({x1}, {y1})"),
        }
    }
}

/// Graphics that only remember what was drawn.
#[derive(Clone, Debug, Default)]
pub struct RecordingGraphics {
    ops: Vec<DrawOp>,
    color: Option<String>,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every primitive since creation, including clears.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Primitives drawn since the last clear.
    pub fn frame(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| *op == DrawOp::Clear)
            .map_or(0, |i| i + 1);
        &self.ops[start..]
    }

    pub fn current_color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

impl Graphics for RecordingGraphics {
    fn clear(&mut self) {
        self.color = None;
        self.ops.push(DrawOp::Clear);
    }

    fn color(&mut self, color: &str) {
        self.color = Some(color.to_string());
        self.ops.push(DrawOp::Color {
            color: color.to_string(),
        });
    }

    fn dot(&mut self, x: i32, y: i32) {
        self.ops.push(DrawOp::Dot { x, y });
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.ops.push(DrawOp::Line { x0, y0, x1, y1 });
    }
}

/// A replayable drawing step.
pub trait DrawCommand: Send {
    fn draw(&self, graphics: &mut dyn Graphics);
}

#[derive(Clone, Debug)]
pub struct ColorCmd {
    pub color: String,
}

impl ColorCmd {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

impl DrawCommand for ColorCmd {
    fn draw(&self, graphics: &mut dyn Graphics) {
        graphics.color(&self.color);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DotCmd {
    pub x: i32,
    pub y: i32,
}

impl DotCmd {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl DrawCommand for DotCmd {
    fn draw(&self, graphics: &mut dyn Graphics) {
        graphics.dot(self.x, self.y);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LineCmd {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl LineCmd {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

impl DrawCommand for LineCmd {
    fn draw(&self, graphics: &mut dyn Graphics) {
        graphics.line(self.x0, self.y0, self.x1, self.y1);
    }
}

/// Keeps the command history and redraws from it after every change.
pub struct Canvas<G: Graphics> {
    commands: Vec<Box<dyn DrawCommand>>,
    graphics: G,
}

impl<G: Graphics> Canvas<G> {
    pub fn new(graphics: G) -> Self {
        Self {
            commands: Vec::new(),
            graphics,
        }
    }

    /// Push a command and redraw.
    pub fn command(&mut self, cmd: impl DrawCommand + 'static) {
        self.commands.push(Box::new(cmd));
        self.redraw();
    }

    /// Drop the most recent command and redraw.
    pub fn undo(&mut self) -> Result<()> {
        self.commands.pop().ok_or(BehavioralError::NothingToUndo)?;
        self.redraw();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn graphics(&self) -> &G {
        &self.graphics
    }

    fn redraw(&mut self) {
        debug!(commands = self.commands.len(), "redraw");
        self.graphics.clear();
        for cmd in &self.commands {
            cmd.draw(&mut self.graphics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas<RecordingGraphics> {
        let mut canvas = Canvas::new(RecordingGraphics::new());
        canvas.command(ColorCmd::new("Blue"));
        canvas.command(DotCmd::new(1, 2));
        canvas.command(LineCmd::new(1, 2, 3, 4));
        canvas
    }

    #[test]
    fn every_command_redraws_everything() {
        let canvas = canvas();
        assert_eq!(
            canvas.graphics().frame(),
            [
                DrawOp::Color { color: "Blue".into() },
                DrawOp::Dot { x: 1, y: 2 },
                DrawOp::Line { x0: 1, y0: 2, x1: 3, y1: 4 },
            ]
        );
        // 1 + 2 + 3 primitives plus three clears.
        assert_eq!(canvas.graphics().ops().len(), 9);
    }

    #[test]
    fn undo_replays_the_remaining_history() {
        let mut canvas = canvas();
        canvas.undo().unwrap();
        canvas.undo().unwrap();
        assert_eq!(canvas.len(), 1);
        assert_eq!(canvas.graphics().frame(), [DrawOp::Color { color: "Blue".into() }]);
        assert_eq!(canvas.graphics().current_color(), Some("Blue"));
    }

    #[test]
    fn undo_on_empty_canvas() {
        let mut canvas = Canvas::new(RecordingGraphics::new());
        assert!(matches!(canvas.undo(), Err(BehavioralError::NothingToUndo)));
        assert!(canvas.graphics().ops().is_empty());

        canvas.command(DotCmd::new(0, 0));
        canvas.undo().unwrap();
        assert!(canvas.is_empty());
        assert!(canvas.graphics().frame().is_empty());
    }

    #[test]
    fn op_display() {
        assert_eq!(DrawOp::Line { x0: 0, y0: 1, x1: 2, y1: 3 }.to_string(), "line (0, 1) -> (2, 3)");
    }
}
