//! Render target abstraction
//!
//! Everything the renderer needs from a 2D backend. Lighting only relies on
//! three operations: fill a region, erase a region with radial falloff, and
//! composite one layer onto another.

use glam::Vec2;

use crate::sim::Rect;
use crate::theme::Color;

/// Opacity profile of a radial light, as (offset 0-1, alpha) stops
#[derive(Debug, Clone, PartialEq)]
pub struct Falloff {
    pub stops: Vec<(f32, f32)>,
}

impl Falloff {
    /// Opaque center, 70% at half radius, clear at the edge
    pub fn light() -> Self {
        Self {
            stops: vec![(0.0, 1.0), (0.5, 0.7), (1.0, 0.0)],
        }
    }

    /// Alpha at normalized distance `t` from the center
    pub fn alpha_at(&self, t: f32) -> f32 {
        let Some(&(first_t, first_a)) = self.stops.first() else {
            return 0.0;
        };
        if t <= first_t {
            return first_a;
        }
        for pair in self.stops.windows(2) {
            let (t0, a0) = pair[0];
            let (t1, a1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return a1;
                }
                return a0 + (a1 - a0) * (t - t0) / span;
            }
        }
        self.stops.last().map(|&(_, a)| a).unwrap_or(0.0)
    }
}

/// Font description for text runs
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size_px: f32,
    pub family: String,
}

impl Font {
    pub fn new(size_px: f32, family: impl Into<String>) -> Self {
        Self {
            size_px,
            family: family.into(),
        }
    }

    /// CSS shorthand, e.g. `24px Times New Roman`
    pub fn css(&self) -> String {
        format!("{}px {}", self.size_px, self.family)
    }

    /// Same family at `factor` times the size
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.size_px * factor, self.family.clone())
    }
}

/// A line of text placed on the surface (baseline-left anchored)
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub pos: Vec2,
    pub font: Font,
    pub color: Color,
}

/// A 2D drawing target. Coordinates are logical field units.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);

    fn fill_text(&mut self, run: TextRun);

    /// Remove coverage inside `radius`, weighted by `falloff` (erase blend)
    fn erase_radial(&mut self, center: Vec2, radius: f32, falloff: &Falloff);

    /// Same-size transparent layer for offscreen passes
    fn new_layer(&self) -> Self
    where
        Self: Sized;

    /// Draw `layer` over this surface (source-over)
    fn composite(&mut self, layer: &Self)
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_falloff_stops() {
        let f = Falloff::light();
        assert_eq!(f.alpha_at(0.0), 1.0);
        assert!((f.alpha_at(0.25) - 0.85).abs() < 1e-6);
        assert!((f.alpha_at(0.5) - 0.7).abs() < 1e-6);
        assert!((f.alpha_at(0.75) - 0.35).abs() < 1e-6);
        assert_eq!(f.alpha_at(1.0), 0.0);
        assert_eq!(f.alpha_at(2.0), 0.0);
    }

    #[test]
    fn test_font_css() {
        assert_eq!(Font::new(24.0, "Times New Roman").css(), "24px Times New Roman");
    }

    #[test]
    fn test_font_scaled_to_display() {
        let font = Font::new(24.0, "Times New Roman");
        assert_eq!(font.scaled(0.5).css(), "12px Times New Roman");
        assert_eq!(font.scaled(1.5).size_px, 36.0);
        assert_eq!(font.scaled(1.0), font);
    }
}
