//! Level data model
//!
//! Levels arrive as JSON (from the editor or a level-pack file) and are
//! immutable once loaded. Coordinates are multiples of the 40-unit tile.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// A point in field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Obstacle types understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Blocks player motion
    Wall,
    /// Snaps the player back to spawn on contact
    Reset,
    /// Anything else; dropped when the level is built
    #[serde(other)]
    Unknown,
}

/// Optional back-and-forth motion toward a second control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSpec {
    pub to: Point,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<MotionSpec>,
}

impl ObstacleSpec {
    pub fn new(kind: ObstacleKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            motion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorchSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<MotionSpec>,
}

impl TorchSpec {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, motion: None }
    }
}

/// One level as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub exit: Option<Point>,
    #[serde(default)]
    pub torches: Vec<TorchSpec>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exit: None,
            torches: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that the level can be played. `index` is only used for reporting.
    pub fn validate(&self, index: usize) -> Result<(), LevelError> {
        if self.exit.is_none() {
            return Err(LevelError::MissingExit {
                index,
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered sequence of levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelPack {
    pub levels: Vec<Level>,
}

impl LevelPack {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// Parse a pack (a JSON array of level objects)
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let pack: Self = serde_json::from_str(json)?;
        if pack.levels.is_empty() {
            return Err(LevelError::EmptyPack);
        }
        Ok(pack)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Level, LevelError> {
        self.levels.get(index).ok_or(LevelError::MissingLevel {
            index,
            count: self.levels.len(),
        })
    }

    /// Indices of levels that cannot be played, with the reason
    pub fn problems(&self) -> Vec<LevelError> {
        self.levels
            .iter()
            .enumerate()
            .filter_map(|(i, level)| level.validate(i).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "name": "First Steps",
            "exit": { "x": 760, "y": 760 },
            "torches": [ { "x": 400, "y": 400 } ],
            "obstacles": [
                { "type": "wall", "x": 40, "y": 40, "width": 200, "height": 40 },
                { "type": "reset", "x": 320, "y": 320, "width": 40, "height": 40 },
                { "type": "lava", "x": 0, "y": 0, "width": 40, "height": 40 }
            ]
        },
        {
            "name": "Unfinished",
            "exit": null,
            "torches": [],
            "obstacles": []
        }
    ]"#;

    #[test]
    fn test_parse_pack() {
        let pack = LevelPack::from_json(SAMPLE).unwrap();
        assert_eq!(pack.len(), 2);

        let first = pack.get(0).unwrap();
        assert_eq!(first.name, "First Steps");
        assert_eq!(first.exit, Some(Point::new(760.0, 760.0)));
        assert_eq!(first.torches.len(), 1);
        assert_eq!(first.obstacles[0].kind, ObstacleKind::Wall);
        assert_eq!(first.obstacles[1].kind, ObstacleKind::Reset);
        assert_eq!(first.obstacles[2].kind, ObstacleKind::Unknown);
        assert!(first.obstacles[0].motion.is_none());
    }

    #[test]
    fn test_missing_exit_is_reported() {
        let pack = LevelPack::from_json(SAMPLE).unwrap();
        assert!(pack.get(0).unwrap().validate(0).is_ok());

        let err = pack.get(1).unwrap().validate(1).unwrap_err();
        assert!(matches!(err, LevelError::MissingExit { index: 1, .. }));
        assert_eq!(pack.problems().len(), 1);
    }

    #[test]
    fn test_missing_level_index() {
        let pack = LevelPack::from_json(SAMPLE).unwrap();
        let err = pack.get(5).unwrap_err();
        assert!(matches!(err, LevelError::MissingLevel { index: 5, count: 2 }));
    }

    #[test]
    fn test_empty_pack_rejected() {
        assert!(matches!(
            LevelPack::from_json("[]"),
            Err(LevelError::EmptyPack)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Level::from_json("{ \"name\": 3 }"),
            Err(LevelError::Parse(_))
        ));
    }

    #[test]
    fn test_motion_field() {
        let json = r#"{
            "name": "Moving",
            "exit": { "x": 0, "y": 0 },
            "torches": [ { "x": 40, "y": 40, "motion": { "to": { "x": 200, "y": 40 }, "speed": 1 } } ],
            "obstacles": []
        }"#;
        let level = Level::from_json(json).unwrap();
        let motion = level.torches[0].motion.unwrap();
        assert_eq!(motion.to, Point::new(200.0, 40.0));
        assert_eq!(motion.speed, 1.0);
    }

    #[test]
    fn test_serialize_omits_absent_motion() {
        let mut level = Level::new("Out");
        level.exit = Some(Point::new(40.0, 40.0));
        level
            .obstacles
            .push(ObstacleSpec::new(ObstacleKind::Wall, 0.0, 0.0, 40.0, 40.0));
        let json = serde_json::to_string(&level).unwrap();
        assert!(!json.contains("motion"));
        assert!(json.contains("\"type\":\"wall\""));
    }
}
