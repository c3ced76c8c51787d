//! Per-frame level simulation
//!
//! Owns the live entity set for the current level. The set is rebuilt
//! wholesale by `init_level` on every level transition.

use glam::Vec2;

use super::entity::{Character, EntityRef, Exit, Obstacle, ObstacleKind, Torch};
use super::input::KeyState;
use crate::error::LevelError;
use crate::level::Level;
use crate::theme::Theme;

/// What happened to the player during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Move rolled back by a wall (index into the obstacle list)
    Blocked(usize),
    /// Snapped to spawn by a reset trigger
    Reset(usize),
}

/// Result of one `update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub contact: Option<Contact>,
    /// Player overlapped the exit after this tick
    pub reached_exit: bool,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    theme: Theme,
    bounds: Vec2,
    pub player: Character,
    pub exit: Exit,
    pub obstacles: Vec<Obstacle>,
    pub torches: Vec<Torch>,
}

impl Simulation {
    /// Empty simulation over a field of `bounds`; call `init_level` before use
    pub fn new(theme: Theme, bounds: Vec2) -> Self {
        Self {
            player: Character::new(theme.player),
            exit: Exit::new(Vec2::ZERO, &theme),
            obstacles: Vec::new(),
            torches: Vec::new(),
            theme,
            bounds,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Rebuild every entity from `level`, which sits at `index` in its pack.
    /// The level must have an exit.
    pub fn init_level(&mut self, index: usize, level: &Level) -> Result<(), LevelError> {
        let exit = level.exit.ok_or_else(|| LevelError::MissingExit {
            index,
            name: level.name.clone(),
        })?;

        self.player = Character::new(self.theme.player);
        self.exit = Exit::new(Vec2::new(exit.x, exit.y), &self.theme);
        self.obstacles = level
            .obstacles
            .iter()
            .filter_map(|spec| {
                let obstacle = Obstacle::from_spec(spec, &self.theme);
                if obstacle.is_none() {
                    log::debug!("Dropping obstacle of unknown type at ({}, {})", spec.x, spec.y);
                }
                obstacle
            })
            .collect();
        self.torches = level.torches.iter().map(Torch::from_spec).collect();
        Ok(())
    }

    /// Advance one frame
    pub fn update(&mut self, keys: &KeyState) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let previous = self.player.move_with(keys, self.bounds);

        // First overlap in list order wins; later obstacles are not examined
        let hit = self
            .obstacles
            .iter()
            .position(|o| o.body.overlaps(&self.player.body));
        if let Some(index) = hit {
            match self.obstacles[index].kind {
                ObstacleKind::Reset => {
                    self.player.reset();
                    outcome.contact = Some(Contact::Reset(index));
                }
                ObstacleKind::Wall => {
                    self.player.set_pos(previous);
                    outcome.contact = Some(Contact::Blocked(index));
                }
            }
        }

        for obstacle in self.obstacles.iter_mut().filter(|o| o.is_moving()) {
            obstacle.update();
        }
        for torch in self.torches.iter_mut().filter(|t| t.is_moving()) {
            torch.update();
        }

        outcome.reached_exit = self.player.body.overlaps(&self.exit.body);
        outcome
    }

    /// Entities in draw order: obstacles, torches, player, exit
    pub fn draw_order(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.obstacles
            .iter()
            .map(EntityRef::Obstacle)
            .chain(self.torches.iter().map(EntityRef::Torch))
            .chain(std::iter::once(EntityRef::Character(&self.player)))
            .chain(std::iter::once(EntityRef::Exit(&self.exit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{MotionSpec, ObstacleKind as Kind, ObstacleSpec, Point, TorchSpec};
    use crate::sim::input::Key;

    fn level(obstacles: Vec<ObstacleSpec>) -> Level {
        Level {
            name: "Test".to_string(),
            exit: Some(Point::new(760.0, 760.0)),
            torches: Vec::new(),
            obstacles,
        }
    }

    fn sim_for(level: &Level) -> Simulation {
        let mut sim = Simulation::new(Theme::default(), crate::field_bounds());
        sim.init_level(0, level).unwrap();
        sim
    }

    fn pressed(key: Key) -> KeyState {
        let mut keys = KeyState::new();
        keys.press(key);
        keys
    }

    #[test]
    fn test_init_level_builds_entities() {
        let mut lvl = level(vec![
            ObstacleSpec::new(Kind::Wall, 40.0, 40.0, 200.0, 40.0),
            ObstacleSpec::new(Kind::Unknown, 0.0, 0.0, 40.0, 40.0),
            ObstacleSpec::new(Kind::Reset, 400.0, 400.0, 40.0, 40.0),
        ]);
        lvl.torches.push(TorchSpec::new(120.0, 120.0));
        let sim = sim_for(&lvl);

        assert_eq!(sim.obstacles.len(), 2);
        assert_eq!(sim.obstacles[1].kind, ObstacleKind::Reset);
        assert_eq!(sim.torches.len(), 1);
        assert_eq!(sim.exit.body.rect.pos(), Vec2::new(760.0, 760.0));
        assert_eq!(sim.player.pos(), crate::player_spawn());
        assert_eq!(sim.draw_order().count(), 5);
    }

    #[test]
    fn test_init_level_requires_exit() {
        let mut lvl = level(Vec::new());
        lvl.exit = None;
        let mut sim = Simulation::new(Theme::default(), crate::field_bounds());
        assert!(matches!(
            sim.init_level(0, &lvl),
            Err(LevelError::MissingExit { index: 0, .. })
        ));
        // Reported against the level's own position in the pack
        assert!(matches!(
            sim.init_level(3, &lvl),
            Err(LevelError::MissingExit { index: 3, .. })
        ));
    }

    #[test]
    fn test_wall_rolls_back_full_move() {
        let mut sim = sim_for(&level(vec![ObstacleSpec::new(
            Kind::Wall, 40.0, 40.0, 200.0, 40.0,
        )]));
        // Touching the wall's bottom edge from below
        sim.player.set_pos(Vec2::new(100.0, 80.0));

        let outcome = sim.update(&pressed(Key::Up));
        assert_eq!(outcome.contact, Some(Contact::Blocked(0)));
        assert_eq!(sim.player.pos(), Vec2::new(100.0, 80.0));

        // Diagonal move is rolled back entirely, not just on the blocked axis
        let mut keys = pressed(Key::Up);
        keys.press(Key::Right);
        sim.update(&keys);
        assert_eq!(sim.player.pos(), Vec2::new(100.0, 80.0));

        let outcome = sim.update(&pressed(Key::Right));
        assert_eq!(outcome.contact, None);
        assert_eq!(sim.player.pos(), Vec2::new(102.0, 80.0));
    }

    #[test]
    fn test_reset_trigger_snaps_to_spawn() {
        let mut sim = sim_for(&level(vec![ObstacleSpec::new(
            Kind::Reset, 400.0, 400.0, 40.0, 40.0,
        )]));
        sim.player.set_pos(Vec2::new(439.0, 300.0));
        sim.player.speed = 100.0;

        let outcome = sim.update(&pressed(Key::Down));
        assert_eq!(outcome.contact, Some(Contact::Reset(0)));
        assert_eq!(sim.player.pos(), crate::player_spawn());
    }

    #[test]
    fn test_first_overlap_in_list_order_wins() {
        // Reset trigger listed before an overlapping wall
        let mut sim = sim_for(&level(vec![
            ObstacleSpec::new(Kind::Reset, 400.0, 400.0, 40.0, 40.0),
            ObstacleSpec::new(Kind::Wall, 400.0, 400.0, 40.0, 40.0),
        ]));
        sim.player.set_pos(Vec2::new(360.0, 400.0));
        let outcome = sim.update(&pressed(Key::Right));
        assert_eq!(outcome.contact, Some(Contact::Reset(0)));

        // Same geometry with the wall first blocks instead
        let mut sim = sim_for(&level(vec![
            ObstacleSpec::new(Kind::Wall, 400.0, 400.0, 40.0, 40.0),
            ObstacleSpec::new(Kind::Reset, 400.0, 400.0, 40.0, 40.0),
        ]));
        sim.player.set_pos(Vec2::new(350.0, 400.0));
        let outcome = sim.update(&pressed(Key::Right));
        assert_eq!(outcome.contact, Some(Contact::Blocked(0)));
        assert_eq!(sim.player.pos(), Vec2::new(350.0, 400.0));
    }

    #[test]
    fn test_spawning_inside_wall_leaves_player_stuck() {
        // Spawn (10,60) 50x50 already overlaps this wall
        let mut sim = sim_for(&level(vec![ObstacleSpec::new(
            Kind::Wall, 40.0, 40.0, 200.0, 40.0,
        )]));
        for key in [Key::Down, Key::Left, Key::Right] {
            sim.update(&pressed(key));
            assert_eq!(sim.player.pos(), crate::player_spawn());
        }
    }

    #[test]
    fn test_moving_obstacles_advance_each_tick() {
        let mut spec = ObstacleSpec::new(Kind::Wall, 400.0, 600.0, 40.0, 40.0);
        spec.motion = Some(MotionSpec {
            to: Point::new(600.0, 600.0),
            speed: 50.0,
        });
        let mut sim = sim_for(&level(vec![spec]));
        sim.update(&KeyState::new());
        assert!((sim.obstacles[0].body.rect.x - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_exit_overlap_reported() {
        let mut sim = sim_for(&level(Vec::new()));
        sim.player.set_pos(Vec2::new(708.0, 708.0));
        assert!(!sim.update(&KeyState::new()).reached_exit);

        sim.player.set_pos(Vec2::new(748.0, 748.0));
        let mut keys = pressed(Key::Right);
        keys.press(Key::Down);
        let outcome = sim.update(&keys);
        assert!(outcome.reached_exit);
        assert_eq!(sim.player.pos(), Vec2::new(750.0, 750.0));
    }
}
