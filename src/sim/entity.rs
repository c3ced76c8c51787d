//! Game entities
//!
//! A closed set of variants sharing a `Body` (rectangle + color). Drawing is
//! selected by matching on `EntityRef`; oscillating obstacles and torches
//! carry an optional `Oscillation`.

use glam::Vec2;

use super::geometry::Rect;
use super::input::{Key, KeyState};
use super::motion::Oscillation;
use crate::consts::*;
use crate::level::{self, MotionSpec, ObstacleSpec, TorchSpec};
use crate::theme::{Color, Theme};

/// Geometry and fill color common to all entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub color: Color,
}

impl Body {
    pub fn new(rect: Rect, color: Color) -> Self {
        Self { rect, color }
    }

    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.rect.overlaps(&other.rect)
    }
}

/// The player
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub body: Body,
    pub speed: f32,
    spawn: Vec2,
}

impl Character {
    pub fn new(color: Color) -> Self {
        let spawn = crate::player_spawn();
        Self {
            body: Body::new(
                Rect::from_pos_size(spawn, Vec2::splat(PLAYER_SIZE)),
                color,
            ),
            speed: PLAYER_SPEED,
            spawn,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.rect.pos()
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.body.rect.set_pos(pos);
    }

    /// Apply one tick of movement for every pressed direction, clamped inside
    /// `bounds`. Returns the position held before the move.
    pub fn move_with(&mut self, keys: &KeyState, bounds: Vec2) -> Vec2 {
        let previous = self.pos();
        let mut pos = previous;

        if keys.is_down(Key::Left) {
            pos.x -= self.speed;
        }
        if keys.is_down(Key::Right) {
            pos.x += self.speed;
        }
        if keys.is_down(Key::Up) {
            pos.y -= self.speed;
        }
        if keys.is_down(Key::Down) {
            pos.y += self.speed;
        }

        let max = (bounds - self.body.rect.size()).max(Vec2::ZERO);
        self.set_pos(pos.clamp(Vec2::ZERO, max));
        previous
    }

    /// Back to the spawn point
    pub fn reset(&mut self) {
        let spawn = self.spawn;
        self.set_pos(spawn);
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }
}

/// What an obstacle does on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Blocks motion
    Wall,
    /// Sends the player back to spawn
    Reset,
}

impl ObstacleKind {
    /// Engine kind for an authored type; unknown types have none
    pub fn from_spec(kind: level::ObstacleKind) -> Option<Self> {
        match kind {
            level::ObstacleKind::Wall => Some(ObstacleKind::Wall),
            level::ObstacleKind::Reset => Some(ObstacleKind::Reset),
            level::ObstacleKind::Unknown => None,
        }
    }
}

fn oscillation(origin: Vec2, motion: Option<MotionSpec>) -> Option<Oscillation> {
    motion.map(|m| Oscillation::new(origin, Vec2::new(m.to.x, m.to.y), m.speed))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub body: Body,
    pub motion: Option<Oscillation>,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, rect: Rect, theme: &Theme) -> Self {
        let color = match kind {
            ObstacleKind::Wall => theme.walls,
            ObstacleKind::Reset => theme.reset_trigger,
        };
        Self {
            kind,
            body: Body::new(rect, color),
            motion: None,
        }
    }

    /// Build from level data; `None` for unknown types
    pub fn from_spec(spec: &ObstacleSpec, theme: &Theme) -> Option<Self> {
        let kind = ObstacleKind::from_spec(spec.kind)?;
        let rect = Rect::new(spec.x, spec.y, spec.width, spec.height);
        let mut obstacle = Self::new(kind, rect, theme);
        obstacle.motion = oscillation(rect.pos(), spec.motion);
        Some(obstacle)
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Advance oscillation; static obstacles do nothing
    pub fn update(&mut self) {
        if let Some(motion) = self.motion.as_mut() {
            let pos = motion.advance();
            self.body.rect.set_pos(pos);
        }
    }
}

/// Point light source, invisible
#[derive(Debug, Clone, PartialEq)]
pub struct Torch {
    pub body: Body,
    pub motion: Option<Oscillation>,
}

impl Torch {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(
                Rect::from_pos_size(pos, Vec2::splat(TORCH_SIZE)),
                Color::TRANSPARENT,
            ),
            motion: None,
        }
    }

    pub fn from_spec(spec: &TorchSpec) -> Self {
        let pos = Vec2::new(spec.x, spec.y);
        let mut torch = Self::new(pos);
        torch.motion = oscillation(pos, spec.motion);
        torch
    }

    /// Where the light is centered
    pub fn light_pos(&self) -> Vec2 {
        self.body.rect.pos()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub fn update(&mut self) {
        if let Some(motion) = self.motion.as_mut() {
            let pos = motion.advance();
            self.body.rect.set_pos(pos);
        }
    }
}

/// Level exit, drawn as a circle
#[derive(Debug, Clone, PartialEq)]
pub struct Exit {
    pub body: Body,
}

impl Exit {
    pub fn new(pos: Vec2, theme: &Theme) -> Self {
        Self {
            body: Body::new(Rect::from_pos_size(pos, Vec2::splat(EXIT_SIZE)), theme.exit),
        }
    }
}

/// Borrowed view of any entity, in draw order
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Obstacle(&'a Obstacle),
    Torch(&'a Torch),
    Character(&'a Character),
    Exit(&'a Exit),
}

impl EntityRef<'_> {
    pub fn body(&self) -> &Body {
        match self {
            EntityRef::Obstacle(o) => &o.body,
            EntityRef::Torch(t) => &t.body,
            EntityRef::Character(c) => &c.body,
            EntityRef::Exit(e) => &e.body,
        }
    }
}
