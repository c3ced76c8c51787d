//! HUD: level label, elapsed time and the level timeline

use glam::Vec2;

use super::surface::{Font, Surface, TextRun};
use crate::theme::{Color, Theme};

/// Progress state of one timeline marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Dot,
    /// Final level
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Vec2,
    pub shape: MarkerShape,
    pub state: MarkerState,
}

/// HUD geometry and colors
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub font: Font,
    pub text_color: Color,
    /// Baseline-left of the level label
    pub level_pos: Vec2,
    /// Offset of the timer from the top-right corner
    pub timer_inset: Vec2,
    /// Distance of the timeline above the bottom edge
    pub timeline_inset: f32,
    pub dot_radius: f32,
    pub dot_spacing: f32,
    pub line_width: f32,
    pub upcoming_color: Color,
    pub completed_color: Color,
    pub current_color: Color,
}

impl Hud {
    pub fn new(theme: &Theme) -> Self {
        Self {
            font: Font::new(24.0, "Times New Roman"),
            text_color: theme.text,
            level_pos: Vec2::new(20.0, 40.0),
            timer_inset: Vec2::new(150.0, 40.0),
            timeline_inset: 30.0,
            dot_radius: 6.0,
            dot_spacing: 30.0,
            line_width: 2.0,
            upcoming_color: Color::from_rgba8(0xaa, 0xaa, 0xaa, 255),
            completed_color: Color::WHITE,
            current_color: theme.player,
        }
    }

    /// Evenly spaced markers centered horizontally on a `width`-wide surface
    pub fn timeline(&self, width: f32, height: f32, current: usize, total: usize) -> Vec<Marker> {
        if total == 0 {
            return Vec::new();
        }
        let total_width = (total - 1) as f32 * self.dot_spacing;
        let start_x = (width - total_width) / 2.0;
        let y = height - self.timeline_inset;

        (0..total)
            .map(|i| Marker {
                center: Vec2::new(start_x + i as f32 * self.dot_spacing, y),
                shape: if i == total - 1 {
                    MarkerShape::Flag
                } else {
                    MarkerShape::Dot
                },
                state: match i.cmp(&current) {
                    std::cmp::Ordering::Less => MarkerState::Completed,
                    std::cmp::Ordering::Equal => MarkerState::Current,
                    std::cmp::Ordering::Greater => MarkerState::Upcoming,
                },
            })
            .collect()
    }

    fn marker_color(&self, state: MarkerState) -> Color {
        match state {
            MarkerState::Completed => self.completed_color,
            MarkerState::Current => self.current_color,
            MarkerState::Upcoming => self.upcoming_color,
        }
    }

    /// Draw label, timer and timeline
    pub fn draw<S: Surface>(
        &self,
        surface: &mut S,
        level_index: usize,
        level_name: &str,
        elapsed_ms: f64,
        level_count: usize,
    ) {
        let (w, h) = surface.size();
        let (w, h) = (w as f32, h as f32);

        surface.fill_text(TextRun {
            text: level_label(level_index, level_name),
            pos: self.level_pos,
            font: self.font.clone(),
            color: self.text_color,
        });
        surface.fill_text(TextRun {
            text: time_label(elapsed_ms),
            pos: Vec2::new(w - self.timer_inset.x, self.timer_inset.y),
            font: self.font.clone(),
            color: self.text_color,
        });

        let markers = self.timeline(w, h, level_index, level_count);
        let r = self.dot_radius;

        // Connectors first so markers sit on top
        for pair in markers.windows(2) {
            let from = pair[0].center + Vec2::new(r, 0.0);
            let to = pair[1].center - Vec2::new(r, 0.0);
            surface.stroke_line(from, to, self.line_width, self.upcoming_color);
        }

        for marker in &markers {
            let fill = self.marker_color(marker.state);
            let c = marker.center;
            match marker.shape {
                MarkerShape::Dot => {
                    surface.fill_circle(c, r, fill);
                    surface.stroke_circle(c, r, self.line_width, self.upcoming_color);
                }
                MarkerShape::Flag => {
                    let top = c - Vec2::new(0.0, r);
                    let left = c + Vec2::new(-r, r);
                    let right = c + Vec2::new(r, r);
                    surface.fill_triangle(top, left, right, fill);
                    for (a, b) in [(top, left), (left, right), (right, top)] {
                        surface.stroke_line(a, b, self.line_width, self.upcoming_color);
                    }
                }
            }
        }
    }
}

/// `"<1-based index> - <name>"`
pub fn level_label(index: usize, name: &str) -> String {
    format!("{} - {}", index + 1, name)
}

/// `"Time: <whole seconds>s"`
pub fn time_label(elapsed_ms: f64) -> String {
    format!("Time: {}s", (elapsed_ms / 1000.0).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::PixelBuffer;

    #[test]
    fn test_labels() {
        assert_eq!(level_label(0, "First Steps"), "1 - First Steps");
        assert_eq!(time_label(0.0), "Time: 0s");
        assert_eq!(time_label(59_999.0), "Time: 59s");
    }

    #[test]
    fn test_timeline_layout() {
        let hud = Hud::new(&Theme::default());
        let markers = hud.timeline(800.0, 800.0, 1, 3);

        assert_eq!(markers.len(), 3);
        let xs: Vec<f32> = markers.iter().map(|m| m.center.x).collect();
        assert_eq!(xs, vec![370.0, 400.0, 430.0]);
        assert!(markers.iter().all(|m| m.center.y == 770.0));
        assert_eq!(markers[0].state, MarkerState::Completed);
        assert_eq!(markers[1].state, MarkerState::Current);
        assert_eq!(markers[2].state, MarkerState::Upcoming);
        assert_eq!(markers[1].shape, MarkerShape::Dot);
        assert_eq!(markers[2].shape, MarkerShape::Flag);
    }

    #[test]
    fn test_single_level_timeline_is_one_flag() {
        let hud = Hud::new(&Theme::default());
        let markers = hud.timeline(800.0, 800.0, 0, 1);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].center.x, 400.0);
        assert_eq!(markers[0].shape, MarkerShape::Flag);
        assert!(hud.timeline(800.0, 800.0, 0, 0).is_empty());
    }

    #[test]
    fn test_draw_emits_text_and_markers() {
        let theme = Theme::default();
        let hud = Hud::new(&theme);
        let mut frame = PixelBuffer::new(800, 800);
        hud.draw(&mut frame, 0, "Intro", 4_200.0, 2);

        let texts: Vec<&str> = frame.text_runs().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["1 - Intro", "Time: 4s"]);
        assert_eq!(frame.text_runs()[1].pos, Vec2::new(650.0, 40.0));

        // Current marker filled with the player color
        let current = frame.pixel(385, 770).unwrap();
        assert_eq!(current.to_rgba8(), theme.player.to_rgba8());
        // Connector between the two markers
        assert_eq!(frame.pixel(400, 770).unwrap().to_rgba8(), [0xaa, 0xaa, 0xaa, 255]);
    }
}
