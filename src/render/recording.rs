use crate::math::Vector2;
use crate::render::{Color, Surface};

/// A command captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    BeginPath,
    MoveTo(Vector2),
    LineTo(Vector2),
    /// A stroke, with the state that was active when it was painted
    Stroke {
        line_width: f32,
        color: Color,
        alpha: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SurfaceState {
    line_width: f32,
    color: Color,
    alpha: f32,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            color: Color::BLACK,
            alpha: 1.0,
        }
    }
}

/// A headless surface that records every call it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: SurfaceState,
    stack: Vec<SurfaceState>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recorder with canvas defaults (width 1, black, alpha 1)
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded commands in call order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns only the stroke commands
    pub fn strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Stroke { .. }))
    }

    /// Returns the depth of unmatched `save` calls
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Forgets every recorded command
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.state);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        // A restore without a save is ignored, as on a canvas
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.color = color;
    }

    fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Vector2) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Vector2) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke {
            line_width: self.state.line_width,
            color: self.state.color,
            alpha: self.state.alpha,
        });
    }
}
