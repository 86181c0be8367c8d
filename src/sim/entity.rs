//! Entity geometry: 16x16 axis-aligned boxes with sub-pixel positions
//!
//! Positions are real-valued; the display (and the finish-line comparison)
//! uses the integer-truncated screen position.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::catalog::VehicleModel;
use crate::consts::SPRITE_SIZE;
use crate::error::{RaceError, Result};

/// Stable entity identifier, used by the display sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Reserved id of the player's trolley
pub const PLAYER_ID: EntityId = EntityId(1);
/// Reserved id of the rival's trolley
pub const RIVAL_ID: EntityId = EntityId(2);
/// First id handed out to obstacles
pub const FIRST_OBSTACLE_ID: u32 = 3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Standard sprite-sized box at `pos`
    pub fn sprite(pos: Vec2) -> Self {
        Self::new(pos, Vec2::splat(SPRITE_SIZE))
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test (touching edges do not intersect)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.intersects_with_buffer(other, 0.0)
    }

    /// Overlap test with both boxes reaching `buffer` further right and down
    pub fn intersects_with_buffer(&self, other: &Aabb, buffer: f32) -> bool {
        let a_max = self.max() + Vec2::splat(buffer);
        let b_max = other.max() + Vec2::splat(buffer);
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Edge-to-edge distance on each axis, 0 where the boxes overlap on that axis
    pub fn gap(&self, other: &Aabb) -> Vec2 {
        let (a_max, b_max) = (self.max(), other.max());
        let axis = |a_min: f32, a_max: f32, b_min: f32, b_max: f32| {
            if a_max < b_min {
                b_min - a_max
            } else if a_min > b_max {
                a_min - b_max
            } else {
                0.0
            }
        };
        Vec2::new(
            axis(self.min.x, a_max.x, other.min.x, b_max.x),
            axis(self.min.y, a_max.y, other.min.y, b_max.y),
        )
    }
}

/// Obstacle variants spawned on the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Block,
    Block2,
    Block3,
    Block4,
    Block5,
    WaterSpill,
    Money,
    Person,
}

/// Relative spawn weights (proportional, need not sum to 1)
pub const SPAWN_WEIGHTS: [(ObstacleKind, f32); 8] = [
    (ObstacleKind::Block, 0.20),
    (ObstacleKind::Block2, 0.20),
    (ObstacleKind::Block3, 0.15),
    (ObstacleKind::Block4, 0.15),
    (ObstacleKind::Block5, 0.10),
    (ObstacleKind::WaterSpill, 0.08),
    (ObstacleKind::Money, 0.05),
    (ObstacleKind::Person, 0.07),
];

impl ObstacleKind {
    /// Sprite atlas key
    pub fn key(&self) -> &'static str {
        match self {
            ObstacleKind::Block => "block_1",
            ObstacleKind::Block2 => "block_2",
            ObstacleKind::Block3 => "block_3",
            ObstacleKind::Block4 => "block_4",
            ObstacleKind::Block5 => "block_5",
            ObstacleKind::WaterSpill => "water_spill_1",
            ObstacleKind::Money => "money",
            ObstacleKind::Person => "person",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        SPAWN_WEIGHTS
            .iter()
            .map(|(kind, _)| *kind)
            .find(|kind| kind.key() == key)
            .ok_or_else(|| RaceError::UnknownObstacle(key.to_string()))
    }

    /// Pick a kind proportionally to `SPAWN_WEIGHTS` given a roll in `[0, total)`
    pub fn from_weighted_roll(roll: f32) -> Self {
        let mut upto = 0.0;
        for (kind, weight) in SPAWN_WEIGHTS {
            upto += weight;
            if upto >= roll {
                return kind;
            }
        }
        // Float rounding at the very top of the range
        SPAWN_WEIGHTS[SPAWN_WEIGHTS.len() - 1].0
    }

    /// Sum of all spawn weights
    pub fn total_weight() -> f32 {
        SPAWN_WEIGHTS.iter().map(|(_, w)| w).sum()
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Vehicle(VehicleModel),
}

/// A positioned, sprite-sized thing in the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(SPRITE_SIZE),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Position as drawn (truncated toward zero)
    #[inline]
    pub fn screen_pos(&self) -> IVec2 {
        self.pos.as_ivec2()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::sprite(Vec2::new(0.0, 0.0));
        assert!(a.intersects(&Aabb::sprite(Vec2::new(15.0, 15.0))));
        // Touching edges is not an overlap
        assert!(!a.intersects(&Aabb::sprite(Vec2::new(16.0, 0.0))));
        assert!(!a.intersects(&Aabb::sprite(Vec2::new(0.0, -16.0))));
    }

    #[test]
    fn test_buffered_intersection_reaches_further() {
        let a = Aabb::sprite(Vec2::new(0.0, 0.0));
        let b = Aabb::sprite(Vec2::new(17.0, 0.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects_with_buffer(&b, 2.0));
        assert!(!a.intersects_with_buffer(&Aabb::sprite(Vec2::new(18.0, 0.0)), 2.0));
    }

    #[test]
    fn test_gap() {
        let a = Aabb::sprite(Vec2::new(0.0, 0.0));
        assert_eq!(a.gap(&Aabb::sprite(Vec2::new(20.0, 5.0))), Vec2::new(4.0, 0.0));
        assert_eq!(a.gap(&Aabb::sprite(Vec2::new(-30.0, 40.0))), Vec2::new(14.0, 24.0));
        assert_eq!(a.gap(&Aabb::sprite(Vec2::new(3.0, 3.0))), Vec2::ZERO);
    }

    #[test]
    fn test_weighted_roll_boundaries() {
        assert_eq!(ObstacleKind::from_weighted_roll(0.0), ObstacleKind::Block);
        assert_eq!(ObstacleKind::from_weighted_roll(0.20), ObstacleKind::Block);
        assert_eq!(ObstacleKind::from_weighted_roll(0.21), ObstacleKind::Block2);
        assert_eq!(ObstacleKind::from_weighted_roll(0.85), ObstacleKind::WaterSpill);
        let total = ObstacleKind::total_weight();
        assert!((total - 1.0).abs() < 1e-5);
        assert_eq!(ObstacleKind::from_weighted_roll(total), ObstacleKind::Person);
        assert_eq!(ObstacleKind::from_weighted_roll(total + 1.0), ObstacleKind::Person);
    }

    #[test]
    fn test_obstacle_keys() {
        assert_eq!(ObstacleKind::from_key("money").unwrap(), ObstacleKind::Money);
        assert!(matches!(
            ObstacleKind::from_key("sign"),
            Err(RaceError::UnknownObstacle(_))
        ));
    }

    #[test]
    fn test_screen_pos_truncates() {
        let e = Entity::new(
            EntityId(9),
            EntityKind::Obstacle(ObstacleKind::Block),
            Vec2::new(70.9, 89.2),
        );
        assert_eq!(e.screen_pos(), IVec2::new(70, 89));
    }
}
