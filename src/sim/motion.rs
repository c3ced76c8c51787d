//! Back-and-forth motion between two control points
//!
//! Progress advances by `speed / 100` per tick and wraps to 0 once past 1.
//! Position is `a + (b - a) * sin(progress * PI)`: the entity eases out to
//! `b` and back to `a` once per progress cycle.

use std::f32::consts::PI;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub point_a: Vec2,
    pub point_b: Vec2,
    pub speed: f32,
    /// In [0, 1]
    pub progress: f32,
}

impl Oscillation {
    pub fn new(point_a: Vec2, point_b: Vec2, speed: f32) -> Self {
        Self {
            point_a,
            point_b,
            speed,
            progress: 0.0,
        }
    }

    /// Advance one tick and return the new position
    pub fn advance(&mut self) -> Vec2 {
        self.progress += self.speed / 100.0;
        if self.progress > 1.0 {
            self.progress = 0.0;
        }
        self.position()
    }

    /// Position for the current progress
    pub fn position(&self) -> Vec2 {
        self.position_at(self.progress)
    }

    pub fn position_at(&self, progress: f32) -> Vec2 {
        let t = (progress * PI).sin();
        self.point_a + (self.point_b - self.point_a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn osc(speed: f32) -> Oscillation {
        Oscillation::new(Vec2::new(40.0, 40.0), Vec2::new(240.0, 120.0), speed)
    }

    #[test]
    fn test_endpoints_rest_at_point_a() {
        let o = osc(1.0);
        assert!(o.position_at(0.0).distance(o.point_a) < 1e-3);
        assert!(o.position_at(1.0).distance(o.point_a) < 1e-3);
        assert!(o.position_at(0.5).distance(o.point_b) < 1e-3);
    }

    #[test]
    fn test_motion_is_eased_not_linear() {
        let o = osc(1.0);
        // sin(0.25 * PI) ~ 0.707, a linear ramp to b at 0.5 would give 0.5
        let quarter = o.position_at(0.25);
        let expected = o.point_a + (o.point_b - o.point_a) * std::f32::consts::FRAC_1_SQRT_2;
        assert!(quarter.distance(expected) < 1e-3);
    }

    #[test]
    fn test_full_period_returns_to_start() {
        for speed in [1.0, 2.0, 4.0, 5.0] {
            let mut o = osc(speed);
            let ticks = (100.0 / speed).round() as usize;
            for _ in 0..ticks {
                o.advance();
            }
            // Either exactly wrapped or within rounding of 1.0
            let p = o.progress;
            assert!(p < 1e-3 || (1.0 - p).abs() < 1e-3, "speed {speed}: progress {p}");
            assert!(o.position().distance(o.point_a) < 0.1);
        }
    }

    #[test]
    fn test_progress_wraps_to_zero() {
        let mut o = osc(30.0);
        o.advance();
        o.advance();
        o.advance();
        assert!((o.progress - 0.9).abs() < 1e-5);
        o.advance();
        assert_eq!(o.progress, 0.0);
        assert_eq!(o.position(), o.point_a);
    }
}
