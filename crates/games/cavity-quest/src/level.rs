//! Authored level descriptors and the static collision world built from them.
//!
//! Descriptors are plain data (TOML under `levels/`), validated once when a
//! [`LevelSet`] is built. The simulation only ever sees validated levels.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::physics::MAP_WIDTH;
use crate::terrain::{GroundSegment, Terrain};

/// Level number of the final level; its door decides the ending.
pub const FINAL_LEVEL: u32 = 4;

const BUILTIN_LEVELS: [&str; 4] = [
    include_str!("../levels/level1.toml"),
    include_str!("../levels/level2.toml"),
    include_str!("../levels/level3.toml"),
    include_str!("../levels/level4.toml"),
];

fn default_door() -> Rect {
    Rect::new(MAP_WIDTH - 80.0, 340.0, 40.0, 60.0)
}

/// A spawn position (top-left of the spawned entity).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Immutable authored data for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub ground: Vec<GroundSegment>,
    #[serde(default)]
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub ground_obstacles: Vec<Rect>,
    #[serde(default)]
    pub health_pickups: Vec<Point>,
    #[serde(default)]
    pub enemy_spawns: Vec<Point>,
    #[serde(default)]
    pub teeth: Vec<Point>,
    #[serde(default = "default_door")]
    pub door: Rect,
}

impl LevelDescriptor {
    /// Parse and validate a descriptor. `level` is only used for error messages.
    pub fn from_toml(level: u32, source: &str) -> Result<Self, LevelError> {
        let descriptor: Self = toml::from_str(source).map_err(|e| LevelError::Parse {
            level,
            message: e.to_string(),
        })?;
        descriptor.validate(level)?;
        Ok(descriptor)
    }

    /// Reject descriptors the simulation cannot run correctly.
    ///
    /// Ground segments must be contiguous, non-empty spans covering `[0, MAP_WIDTH)`,
    /// and every rectangle must have a finite position and positive size.
    pub fn validate(&self, level: u32) -> Result<(), LevelError> {
        if self.ground.is_empty() {
            return Err(LevelError::NoGround { level });
        }
        let mut expected_x = 0.0;
        for (index, seg) in self.ground.iter().enumerate() {
            if !(seg.x1.is_finite() && seg.x2.is_finite() && seg.y.is_finite()) {
                return Err(LevelError::NonFinite { level });
            }
            if seg.x1 != expected_x {
                return Err(LevelError::GroundGap {
                    level,
                    expected_x,
                    found_x: seg.x1,
                });
            }
            if seg.x2 <= seg.x1 {
                return Err(LevelError::DegenerateSegment { level, index });
            }
            expected_x = seg.x2;
        }
        if expected_x != MAP_WIDTH {
            return Err(LevelError::GroundCoverage {
                level,
                end_x: expected_x,
            });
        }

        let rect_lists = [
            ("platform", &self.platforms),
            ("ground obstacle", &self.ground_obstacles),
        ];
        for (kind, rects) in rect_lists {
            for (index, rect) in rects.iter().enumerate() {
                check_rect(level, kind, index, rect)?;
            }
        }
        check_rect(level, "door", 0, &self.door)?;

        let points = self
            .health_pickups
            .iter()
            .chain(&self.enemy_spawns)
            .chain(&self.teeth);
        for p in points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(LevelError::NonFinite { level });
            }
        }
        Ok(())
    }
}

fn check_rect(level: u32, kind: &'static str, index: usize, rect: &Rect) -> Result<(), LevelError> {
    let finite =
        rect.x.is_finite() && rect.y.is_finite() && rect.w.is_finite() && rect.h.is_finite();
    if !finite {
        return Err(LevelError::NonFinite { level });
    }
    if rect.w <= 0.0 || rect.h <= 0.0 {
        return Err(LevelError::InvalidRect { level, kind, index });
    }
    Ok(())
}

/// The ordered, validated levels of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    levels: Vec<LevelDescriptor>,
}

impl LevelSet {
    /// The four shipped levels.
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_toml_sources(&BUILTIN_LEVELS)
    }

    /// Parse one descriptor per source, in level order.
    pub fn from_toml_sources(sources: &[&str]) -> Result<Self, LevelError> {
        let levels = sources
            .iter()
            .zip(1u32..)
            .map(|(src, level)| LevelDescriptor::from_toml(level, src))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    pub fn new(levels: Vec<LevelDescriptor>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyLevelSet);
        }
        for (level, descriptor) in (1u32..).zip(&levels) {
            descriptor.validate(level)?;
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Descriptor for a 1-based level number; numbers past the end repeat the last level.
    pub fn descriptor(&self, level: u32) -> &LevelDescriptor {
        let idx = (level.max(1) as usize - 1).min(self.levels.len() - 1);
        &self.levels[idx]
    }
}

/// Static collision geometry for the level being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub terrain: Terrain,
    /// Surfaces that only stop descent.
    pub platforms: Vec<Rect>,
    /// Surfaces that are solid on all four sides, including terrain step walls.
    pub ground_obstacles: Vec<Rect>,
    pub door: Rect,
}

impl World {
    pub fn from_descriptor(descriptor: &LevelDescriptor) -> Self {
        let terrain = Terrain::new(descriptor.ground.clone());
        let mut ground_obstacles = descriptor.ground_obstacles.clone();
        ground_obstacles.extend(terrain.transition_walls());
        Self {
            terrain,
            platforms: descriptor.platforms.clone(),
            ground_obstacles,
            door: descriptor.door,
        }
    }
}

/// Why a level descriptor was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    Parse { level: u32, message: String },
    EmptyLevelSet,
    NoGround { level: u32 },
    GroundGap { level: u32, expected_x: f32, found_x: f32 },
    GroundCoverage { level: u32, end_x: f32 },
    DegenerateSegment { level: u32, index: usize },
    InvalidRect { level: u32, kind: &'static str, index: usize },
    NonFinite { level: u32 },
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { level, message } => write!(f, "level {level}: parse error: {message}"),
            Self::EmptyLevelSet => write!(f, "level set is empty"),
            Self::NoGround { level } => write!(f, "level {level}: no ground segments"),
            Self::GroundGap {
                level,
                expected_x,
                found_x,
            } => write!(
                f,
                "level {level}: ground segment starts at x={found_x}, expected x={expected_x}"
            ),
            Self::GroundCoverage { level, end_x } => write!(
                f,
                "level {level}: ground ends at x={end_x}, map width is {MAP_WIDTH}"
            ),
            Self::DegenerateSegment { level, index } => {
                write!(f, "level {level}: ground segment {index} has no width")
            },
            Self::InvalidRect { level, kind, index } => {
                write!(f, "level {level}: {kind} {index} has non-positive size")
            },
            Self::NonFinite { level } => write!(f, "level {level}: non-finite coordinate"),
        }
    }
}

impl std::error::Error for LevelError {}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        ground = [ { x1 = 0.0, x2 = 2400.0, y = 400.0 } ]
    "#;

    #[test]
    fn builtin_levels_parse_and_validate() {
        let set = LevelSet::builtin().unwrap();
        assert_eq!(set.len(), 4);
        assert!(!set.is_empty());
        let total_teeth: usize = (1..=4).map(|n| set.descriptor(n).teeth.len()).sum();
        assert_eq!(total_teeth, 8);
    }

    #[test]
    fn level_lookup_clamps_to_last() {
        let set = LevelSet::builtin().unwrap();
        assert_eq!(set.descriptor(9), set.descriptor(4));
        assert_eq!(set.descriptor(0), set.descriptor(1));
        assert_ne!(set.descriptor(1), set.descriptor(2));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let desc = LevelDescriptor::from_toml(1, MINIMAL).unwrap();
        assert!(desc.platforms.is_empty());
        assert!(desc.enemy_spawns.is_empty());
        assert_eq!(desc.door, Rect::new(2320.0, 340.0, 40.0, 60.0));
    }

    #[test]
    fn ground_gap_rejected() {
        let src = r#"
            ground = [
                { x1 = 0.0, x2 = 1000.0, y = 400.0 },
                { x1 = 1100.0, x2 = 2400.0, y = 400.0 },
            ]
        "#;
        let err = LevelDescriptor::from_toml(2, src).unwrap_err();
        assert_eq!(
            err,
            LevelError::GroundGap {
                level: 2,
                expected_x: 1000.0,
                found_x: 1100.0
            }
        );
    }

    #[test]
    fn short_ground_rejected() {
        let src = r#"ground = [ { x1 = 0.0, x2 = 2000.0, y = 400.0 } ]"#;
        let err = LevelDescriptor::from_toml(1, src).unwrap_err();
        assert!(matches!(err, LevelError::GroundCoverage { end_x, .. } if end_x == 2000.0));
    }

    #[test]
    fn empty_ground_rejected() {
        let err = LevelDescriptor::from_toml(3, "ground = []").unwrap_err();
        assert_eq!(err, LevelError::NoGround { level: 3 });
    }

    #[test]
    fn zero_sized_obstacle_rejected() {
        let src = r#"
            ground = [ { x1 = 0.0, x2 = 2400.0, y = 400.0 } ]
            ground_obstacles = [ { x = 10.0, y = 360.0, w = 0.0, h = 40.0 } ]
        "#;
        let err = LevelDescriptor::from_toml(1, src).unwrap_err();
        assert_eq!(
            err,
            LevelError::InvalidRect {
                level: 1,
                kind: "ground obstacle",
                index: 0
            }
        );
        assert!(err.to_string().contains("ground obstacle 0"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = LevelDescriptor::from_toml(1, "ground = [ { x1 = ").unwrap_err();
        assert!(matches!(err, LevelError::Parse { level: 1, .. }));
    }

    #[test]
    fn empty_set_rejected() {
        assert_eq!(LevelSet::new(Vec::new()), Err(LevelError::EmptyLevelSet));
    }

    #[test]
    fn world_adds_step_walls() {
        let src = r#"
            ground = [
                { x1 = 0.0, x2 = 800.0, y = 400.0 },
                { x1 = 800.0, x2 = 2400.0, y = 320.0 },
            ]
            ground_obstacles = [ { x = 300.0, y = 360.0, w = 100.0, h = 40.0 } ]
        "#;
        let desc = LevelDescriptor::from_toml(1, src).unwrap();
        let world = World::from_descriptor(&desc);
        assert_eq!(world.ground_obstacles.len(), 2);
        assert_eq!(world.ground_obstacles[1], Rect::new(798.0, 320.0, 4.0, 80.0));
    }
}
