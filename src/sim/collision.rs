//! Collision response between the player's trolley and solid obstacles
//!
//! Detection is plain AABB overlap (see `entity::Aabb`). Response reflects
//! the player away from the obstacle, flags the blocked directions so input
//! cannot push straight back into it, and shoves the trolley toward open space.

use glam::Vec2;

use crate::consts::{ARENA_WIDTH, SPRITE_SIZE};

/// Directions blocked by a collision this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockedSides {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,
}

impl BlockedSides {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Reflect `velocity` away from an obstacle on each axis where they differ.
///
/// `bounce_factor` is negative; a component keeps `|bounce_factor|` of its
/// magnitude and points away from the obstacle. Marks the blocked sides.
pub fn bounce_away(
    velocity: Vec2,
    player_pos: Vec2,
    obstacle_pos: Vec2,
    bounce_factor: f32,
    blocked: &mut BlockedSides,
) -> Vec2 {
    let mut v = velocity;

    if obstacle_pos.y > player_pos.y {
        v.y = bounce_factor * v.y.abs();
        blocked.below = true;
    }
    if obstacle_pos.y < player_pos.y {
        v.y = -bounce_factor * v.y.abs();
        blocked.above = true;
    }
    if obstacle_pos.x > player_pos.x {
        v.x = bounce_factor * v.x.abs();
        blocked.right = true;
    }
    if obstacle_pos.x < player_pos.x {
        v.x = -bounce_factor * v.x.abs();
        blocked.left = true;
    }

    v
}

/// Shove applied after hitting something ahead of the trolley.
///
/// The trolley is pushed back down by `drag.y` and sideways by `drag.x`,
/// away from the obstacle unless a wall is in the way, in which case it is
/// sent the other direction.
pub fn drag_push(velocity: Vec2, player_pos: Vec2, obstacle_pos: Vec2, drag: Vec2) -> Vec2 {
    let mut v = velocity;
    v.y += drag.y;

    if player_pos.x > obstacle_pos.x {
        if player_pos.x + SPRITE_SIZE < ARENA_WIDTH - SPRITE_SIZE {
            v.x += drag.x;
        } else {
            v.x = -drag.x;
        }
    } else if player_pos.x < obstacle_pos.x + SPRITE_SIZE {
        if player_pos.x > SPRITE_SIZE {
            v.x -= drag.x;
        } else {
            v.x = drag.x;
        }
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounce_from_obstacle_ahead() {
        // Obstacle up and to the right of the player
        let mut blocked = BlockedSides::default();
        let v = bounce_away(
            Vec2::new(1.0, -2.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(55.0, 40.0),
            -0.5,
            &mut blocked,
        );
        assert_eq!(v, Vec2::new(-0.5, 1.0));
        assert!(blocked.above && blocked.right);
        assert!(!blocked.below && !blocked.left);
    }

    #[test]
    fn test_bounce_from_obstacle_behind() {
        let mut blocked = BlockedSides::default();
        let v = bounce_away(
            Vec2::new(-1.0, 2.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(45.0, 60.0),
            -0.5,
            &mut blocked,
        );
        assert_eq!(v, Vec2::new(0.5, -1.0));
        assert!(blocked.below && blocked.left);
    }

    #[test]
    fn test_bounce_aligned_axis_untouched() {
        let mut blocked = BlockedSides::default();
        let v = bounce_away(
            Vec2::new(1.5, 2.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(50.0, 40.0),
            -0.5,
            &mut blocked,
        );
        assert_eq!(v.x, 1.5);
        assert!(!blocked.left && !blocked.right);
    }

    #[test]
    fn test_drag_push_toward_open_space() {
        // Player right of obstacle, room on the right: pushed right and back
        let v = drag_push(Vec2::ZERO, Vec2::new(60.0, 50.0), Vec2::new(50.0, 40.0), Vec2::new(3.0, 4.0));
        assert_eq!(v, Vec2::new(3.0, 4.0));

        // Player right of obstacle but against the right wall: sent left
        let v = drag_push(Vec2::new(1.0, 0.0), Vec2::new(140.0, 50.0), Vec2::new(130.0, 40.0), Vec2::new(3.0, 4.0));
        assert_eq!(v, Vec2::new(-3.0, 4.0));

        // Player left of obstacle near the left wall: sent right
        let v = drag_push(Vec2::ZERO, Vec2::new(4.0, 50.0), Vec2::new(10.0, 40.0), Vec2::new(3.0, 4.0));
        assert_eq!(v, Vec2::new(3.0, 4.0));

        // Player left of obstacle with room: pushed left
        let v = drag_push(Vec2::ZERO, Vec2::new(40.0, 50.0), Vec2::new(50.0, 40.0), Vec2::new(3.0, 4.0));
        assert_eq!(v, Vec2::new(-3.0, 4.0));
    }
}
