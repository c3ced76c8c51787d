//! Rendering module
//!
//! The frame is drawn onto any `Surface`: scene, then darkness with light
//! cut-outs, then HUD. `PixelBuffer` is the software surface; on the web the
//! finished buffer is handed to the WebGPU presenter.

pub mod hud;
pub mod lighting;
pub mod present;
pub mod raster;
pub mod surface;

pub use hud::Hud;
pub use lighting::{Light, Lighting};
pub use present::FramePresenter;
pub use raster::PixelBuffer;
pub use surface::{Falloff, Font, Surface, TextRun};

use glam::Vec2;

use crate::game::Game;
use crate::settings::LightingSettings;
use crate::sim::{EntityRef, ObstacleKind};
use crate::theme::{Color, Theme};

/// Eye placement on the player sprite
const EYE_OFFSET_X: f32 = 15.0;
const EYE_OFFSET_Y: f32 = 35.0;
const EYE_GAP: f32 = 20.0;
const EYE_RADIUS: f32 = 4.0;

/// Reset trigger cross
const CROSS_WIDTH: f32 = 2.0;

/// Draws complete frames. Holds configuration only, never entity state.
pub struct Renderer<S = PixelBuffer> {
    theme: Theme,
    hud: Hud,
    lighting: Lighting<S>,
}

impl<S: Surface> Renderer<S> {
    pub fn new(theme: Theme, lighting: LightingSettings, flicker_seed: u64) -> Self {
        Self {
            hud: Hud::new(&theme),
            lighting: Lighting::new(lighting, theme.darkness, flicker_seed),
            theme,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Draw the full frame for the game's current state
    pub fn render(&mut self, surface: &mut S, game: &Game) {
        let sim = game.simulation();

        surface.clear(self.theme.background);
        for entity in sim.draw_order() {
            draw_entity(surface, entity);
        }
        self.lighting.draw(surface, sim);
        self.hud.draw(
            surface,
            game.current_level(),
            game.level_name(),
            game.timer().elapsed_ms(),
            game.level_count(),
        );
    }
}

/// Per-variant drawing
pub fn draw_entity<S: Surface>(surface: &mut S, entity: EntityRef<'_>) {
    match entity {
        EntityRef::Obstacle(obstacle) => {
            let rect = obstacle.body.rect;
            surface.fill_rect(rect, obstacle.body.color);
            if obstacle.kind == ObstacleKind::Reset {
                let (x, y, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
                surface.stroke_line(Vec2::new(x, y), Vec2::new(r, b), CROSS_WIDTH, Color::WHITE);
                surface.stroke_line(Vec2::new(r, y), Vec2::new(x, b), CROSS_WIDTH, Color::WHITE);
            }
        }
        // Invisible; kept in draw order
        EntityRef::Torch(torch) => surface.fill_rect(torch.body.rect, torch.body.color),
        EntityRef::Character(player) => {
            let rect = player.body.rect;
            surface.fill_rect(rect, player.body.color);
            let eye = Vec2::new(rect.x + EYE_OFFSET_X, rect.y + EYE_OFFSET_Y);
            surface.fill_circle(eye, EYE_RADIUS, Color::BLACK);
            surface.fill_circle(eye + Vec2::new(EYE_GAP, 0.0), EYE_RADIUS, Color::BLACK);
        }
        EntityRef::Exit(exit) => {
            let rect = exit.body.rect;
            surface.fill_circle(rect.center(), rect.width / 2.0, exit.body.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, LevelPack, ObstacleKind as Kind, ObstacleSpec, Point};
    use crate::settings::Settings;

    fn game() -> Game {
        let mut level = Level::new("Render");
        level.exit = Some(Point::new(80.0, 40.0));
        level
            .obstacles
            .push(ObstacleSpec::new(Kind::Wall, 200.0, 40.0, 40.0, 40.0));
        level
            .obstacles
            .push(ObstacleSpec::new(Kind::Reset, 0.0, 160.0, 40.0, 40.0));
        let theme = Theme::editor_preview();
        let mut game = Game::new(LevelPack::new(vec![level]), theme, Settings::default());
        game.start(0.0).unwrap();
        game
    }

    #[test]
    fn test_frame_draw_order_and_lighting() {
        let game = game();
        let theme = Theme::editor_preview();
        let lighting = LightingSettings {
            player_radius: 400.0,
            ..Default::default()
        };
        let mut renderer = Renderer::new(theme.clone(), lighting, 5);
        let mut frame = PixelBuffer::new(800, 800);
        renderer.render(&mut frame, &game);

        // Player body next to the light center is almost untouched
        let body = frame.pixel(35, 84).unwrap();
        assert!((body.r - theme.player.r).abs() < 0.02);
        assert!((body.g - theme.player.g).abs() < 0.02);
        assert!((body.b - theme.player.b).abs() < 0.02);
        // Eye drawn over the body
        let eye = frame.pixel(25, 95).unwrap();
        assert!(eye.r < 0.05 && eye.g < 0.05 && eye.b < 0.05);
        // Far corner is in darkness
        let corner = frame.pixel(790, 10).unwrap();
        assert!(corner.r < 0.1);
        // HUD text recorded after lighting
        assert_eq!(frame.text_runs()[0].text, "1 - Render");
    }

    #[test]
    fn test_reset_trigger_has_cross() {
        let theme = Theme::editor_preview();
        let mut frame = PixelBuffer::new(800, 800);
        frame.clear(theme.background);
        let game = game();
        for entity in game.simulation().draw_order() {
            draw_entity(&mut frame, entity);
        }
        // Diagonal of the reset cell at (0,160)
        assert_eq!(frame.pixel(20, 180).unwrap(), Color::WHITE);
        // Off-diagonal inside the cell keeps the trigger color
        assert_eq!(
            frame.pixel(30, 180).unwrap().to_rgba8(),
            theme.reset_trigger.to_rgba8()
        );
        // Exit circle center
        assert_eq!(
            frame.pixel(100, 60).unwrap().to_rgba8(),
            theme.exit.to_rgba8()
        );
    }
}
