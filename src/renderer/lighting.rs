//! Darkness and light compositing
//!
//! Each frame: fill an offscreen layer with the darkness color, erase a
//! radial falloff around the player and every torch, then composite the
//! layer over the scene. The layer is kept between frames and only
//! reallocated when the surface size changes. Torch radii flicker by a fresh random factor every
//! frame; the flicker is visual only and never feeds back into the simulation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::raster::PixelBuffer;
use super::surface::{Falloff, Surface};
use crate::settings::LightingSettings;
use crate::sim::Simulation;
use crate::theme::Color;

/// A light to cut out of the darkness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub center: Vec2,
    pub radius: f32,
}

pub struct Lighting<S = PixelBuffer> {
    settings: LightingSettings,
    darkness: Color,
    falloff: Falloff,
    rng: Pcg32,
    layer: Option<S>,
}

impl<S: Surface> Lighting<S> {
    pub fn new(settings: LightingSettings, darkness: Color, seed: u64) -> Self {
        Self {
            settings,
            darkness,
            falloff: Falloff::light(),
            rng: Pcg32::seed_from_u64(seed),
            layer: None,
        }
    }

    /// Random torch radius multiplier for this frame
    pub fn flicker(&mut self) -> f32 {
        let (min, max) = self.settings.flicker_range();
        self.rng.random_range(min..=max)
    }

    /// Player light followed by one light per torch
    pub fn lights(&mut self, sim: &Simulation) -> Vec<Light> {
        let mut lights = Vec::with_capacity(sim.torches.len() + 1);
        lights.push(Light {
            center: sim.player.body.rect.center(),
            radius: self.settings.player_radius,
        });
        for torch in &sim.torches {
            let radius = self.settings.torch_radius * self.flicker();
            lights.push(Light {
                center: torch.light_pos(),
                radius,
            });
        }
        lights
    }

    /// Darken `surface` everywhere except around the lights of `sim`
    pub fn draw(&mut self, surface: &mut S, sim: &Simulation) {
        let lights = self.lights(sim);
        if self.layer.as_ref().is_none_or(|l| l.size() != surface.size()) {
            self.layer = Some(surface.new_layer());
        }
        let Some(layer) = self.layer.as_mut() else {
            return;
        };
        composite_darkness(surface, layer, self.darkness, &lights, &self.falloff);
    }
}

/// Refill `layer` with `darkness`, erase each light, composite onto `surface`
pub fn composite_darkness<S: Surface>(
    surface: &mut S,
    layer: &mut S,
    darkness: Color,
    lights: &[Light],
    falloff: &Falloff,
) {
    layer.clear(darkness);
    for light in lights {
        layer.erase_radial(light.center, light.radius, falloff);
    }
    surface.composite(layer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, Point, TorchSpec};
    use crate::renderer::PixelBuffer;
    use crate::theme::Theme;

    fn sim_with_torches(torches: &[(f32, f32)]) -> Simulation {
        let mut level = Level::new("Lit");
        level.exit = Some(Point::new(760.0, 760.0));
        level.torches = torches.iter().map(|&(x, y)| TorchSpec::new(x, y)).collect();
        let mut sim = Simulation::new(Theme::default(), crate::field_bounds());
        sim.init_level(0, &level).unwrap();
        sim
    }

    #[test]
    fn test_flicker_stays_in_range() {
        let mut lighting: Lighting = Lighting::new(LightingSettings::default(), Color::BLACK, 7);
        for _ in 0..1000 {
            let f = lighting.flicker();
            assert!((0.9..=1.1).contains(&f));
        }
    }

    #[test]
    fn test_lights_cover_player_and_torches() {
        let sim = sim_with_torches(&[(400.0, 400.0), (600.0, 200.0)]);
        let mut lighting: Lighting = Lighting::new(LightingSettings::default(), Color::BLACK, 1);
        let lights = lighting.lights(&sim);

        assert_eq!(lights.len(), 3);
        assert_eq!(lights[0].center, Vec2::new(35.0, 85.0));
        assert_eq!(lights[0].radius, 100.0);
        assert_eq!(lights[1].center, Vec2::new(400.0, 400.0));
        for light in &lights[1..] {
            assert!(light.radius >= 45.0 && light.radius <= 55.0);
        }
    }

    #[test]
    fn test_flicker_changes_between_frames() {
        let sim = sim_with_torches(&[(400.0, 400.0)]);
        let mut lighting: Lighting = Lighting::new(LightingSettings::default(), Color::BLACK, 3);
        let radii: Vec<f32> = (0..10).map(|_| lighting.lights(&sim)[1].radius).collect();
        assert!(radii.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_darkness_composite() {
        let sim = sim_with_torches(&[(400.0, 400.0)]);
        let mut frame = PixelBuffer::new(800, 800);
        frame.clear(Color::WHITE);
        let mut lighting: Lighting = Lighting::new(
            LightingSettings::default(),
            Color::rgba(0.0, 0.0, 0.0, 0.95),
            11,
        );
        lighting.draw(&mut frame, &sim);

        // Lit around the player center and the torch
        assert!(frame.pixel(35, 85).unwrap().r > 0.95);
        assert!(frame.pixel(400, 400).unwrap().r > 0.95);
        // Dark far from any light
        let dark = frame.pixel(700, 100).unwrap();
        assert!((dark.r - 0.05).abs() < 0.01);
        assert_eq!(dark.a, 1.0);
    }

    #[test]
    fn test_layer_reused_and_cleared_between_frames() {
        let mut lighting: Lighting = Lighting::new(
            LightingSettings::default(),
            Color::rgba(0.0, 0.0, 0.0, 0.95),
            13,
        );

        let mut frame = PixelBuffer::new(800, 800);
        frame.clear(Color::WHITE);
        lighting.draw(&mut frame, &sim_with_torches(&[(400.0, 400.0)]));
        assert!(frame.pixel(400, 400).unwrap().r > 0.95);

        // Torch moved: its old spot goes dark again on the next frame
        let mut frame = PixelBuffer::new(800, 800);
        frame.clear(Color::WHITE);
        lighting.draw(&mut frame, &sim_with_torches(&[(600.0, 600.0)]));
        assert!(frame.pixel(400, 400).unwrap().r < 0.1);
        assert!(frame.pixel(600, 600).unwrap().r > 0.95);

        // A different surface size gets a matching layer
        let mut small = PixelBuffer::new(400, 400);
        small.clear(Color::WHITE);
        lighting.draw(&mut small, &sim_with_torches(&[(200.0, 200.0)]));
        assert!(small.pixel(200, 200).unwrap().r > 0.95);
        assert!(small.pixel(390, 10).unwrap().r < 0.1);
    }
}
