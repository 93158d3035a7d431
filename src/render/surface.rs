use crate::math::Vector2;

/// An RGB stroke color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self { r: 0xFF, g: 0xFF, b: 0xFF };
    pub const BLACK: Self = Self { r: 0x00, g: 0x00, b: 0x00 };

    /// Creates a new color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The drawing capability a host hands to [`Constraint::draw`](crate::constraints::Constraint::draw).
///
/// Modeled on a 2D canvas context: state is pushed and popped with
/// `save`/`restore`, paths are built with `move_to`/`line_to` and painted with
/// `stroke`.
pub trait Surface {
    /// Pushes the current line width, color and alpha
    fn save(&mut self);

    /// Pops the state pushed by the matching `save`
    fn restore(&mut self);

    /// Sets the width used by subsequent strokes
    fn set_line_width(&mut self, width: f32);

    /// Sets the color used by subsequent strokes
    fn set_stroke_color(&mut self, color: Color);

    /// Returns the current global alpha
    fn global_alpha(&self) -> f32;

    /// Sets the global alpha
    fn set_global_alpha(&mut self, alpha: f32);

    /// Starts a new path
    fn begin_path(&mut self);

    /// Moves the pen without drawing
    fn move_to(&mut self, point: Vector2);

    /// Adds a straight segment to the current path
    fn line_to(&mut self, point: Vector2);

    /// Paints the current path
    fn stroke(&mut self);
}

/// Fixed visual style for a straight constraint line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub line_width: f32,
    pub color: Color,
    /// Multiplied into the surface's current alpha
    pub alpha_factor: f32,
}

impl StrokeStyle {
    /// Strokes a single segment with this style, leaving the surface state unchanged
    pub fn draw_segment(&self, surface: &mut dyn Surface, from: Vector2, to: Vector2) {
        surface.save();
        surface.set_line_width(self.line_width);
        surface.set_stroke_color(self.color);
        let alpha = surface.global_alpha() * self.alpha_factor;
        surface.set_global_alpha(alpha);
        surface.begin_path();
        surface.move_to(from);
        surface.line_to(to);
        surface.stroke();
        surface.restore();
    }
}
