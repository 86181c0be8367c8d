//! Rival trolley steering
//!
//! Decisions happen on a fixed interval: occasional diagonal wandering, a
//! push to stay ahead of the player, and obstacle avoidance that overrides
//! both. Physics integrates every tick with the same weight-based handling
//! the player uses, then the rival is clamped inside the wall buffers.

use std::iter;

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, RIVAL_ID};
use super::physics::apply_friction;
use super::vehicle::Vehicle;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, RIVAL_START, SPRITE_SIZE};
use crate::settings::{Difficulty, HandlingTuning, RivalTuning};

/// An active diagonal drift
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wander {
    /// Unit signs on each axis (-1 or 1)
    pub direction: Vec2,
    pub started_at: f64,
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct AiEngine {
    vehicle: Vehicle,
    velocity: Vec2,
    last_decision: f64,
    wander: Option<Wander>,
    tuning: RivalTuning,
    handling: HandlingTuning,
}

impl AiEngine {
    /// Rival in the catalog vehicle assigned to `difficulty`
    pub fn new(difficulty: Difficulty, tuning: RivalTuning, handling: HandlingTuning) -> Self {
        let model = difficulty.rival_model();
        let vehicle = Vehicle::new(model, RIVAL_ID, Vec2::new(RIVAL_START.0, RIVAL_START.1));
        Self {
            vehicle,
            velocity: Vec2::ZERO,
            last_decision: f64::NEG_INFINITY,
            wander: None,
            tuning,
            handling,
        }
    }

    /// Advance the rival one tick against the live obstacles and the player
    pub fn update_ai_movement<R: Rng>(
        &mut self,
        now: f64,
        obstacles: &[Entity],
        player: &Entity,
        rng: &mut R,
    ) {
        if now - self.last_decision > self.tuning.decision_interval {
            self.decide(now, obstacles, player, rng);
            self.last_decision = now;
        }
        self.integrate();
    }

    fn decide<R: Rng>(&mut self, now: f64, obstacles: &[Entity], player: &Entity, rng: &mut R) {
        let speed = self.vehicle.stats.speed;

        if let Some(wander) = self.wander {
            self.velocity = wander.direction * speed;
            if now - wander.started_at >= wander.duration {
                self.wander = None;
            }
        } else if rng.random_bool(self.tuning.wander_chance) {
            let sign = |positive: bool| if positive { 1.0 } else { -1.0 };
            self.wander = Some(Wander {
                direction: Vec2::new(sign(rng.random()), sign(rng.random())),
                started_at: now,
                duration: rng.random_range(self.tuning.wander_min_secs..=self.tuning.wander_max_secs),
            });
        }

        // Chase when not comfortably ahead of the player
        let distance_ahead = self.vehicle.entity.pos.y - player.pos.y;
        if distance_ahead < self.tuning.min_distance_ahead {
            self.velocity.y = -speed;
        }

        let me = self.vehicle.entity.aabb();
        for other in obstacles.iter().chain(iter::once(player)) {
            let gap = me.gap(&other.aabb());
            let in_range = gap.x.abs() < self.tuning.side_detection
                && gap.y < self.tuning.down_detection
                && gap.y > -self.tuning.up_detection;
            if !in_range {
                continue;
            }

            self.steer_away(other.pos);
            if me.intersects(&other.aabb()) {
                self.shove(other.pos);
                break;
            }
        }
    }

    /// Full speed directly away from `obstacle` on both axes
    fn steer_away(&mut self, obstacle: Vec2) {
        let speed = self.vehicle.stats.speed;
        let pos = self.vehicle.entity.pos;
        self.velocity.x = if pos.x < obstacle.x { -speed } else { speed };
        self.velocity.y = if pos.y < obstacle.y { -speed } else { speed };
    }

    /// Drag after an actual hit: knocked back and sideways, off the walls
    fn shove(&mut self, obstacle: Vec2) {
        let pos = self.vehicle.entity.pos;
        let wall = self.tuning.wall_buffer_x;
        if pos.y >= obstacle.y + SPRITE_SIZE {
            return;
        }

        self.velocity.y += self.tuning.drag_y;
        if obstacle.x + SPRITE_SIZE > pos.x && pos.x > obstacle.x {
            // Obstacle on the left
            if pos.x + SPRITE_SIZE < ARENA_WIDTH - (wall + SPRITE_SIZE) {
                self.velocity.x += self.tuning.drag_x;
            } else {
                self.velocity.x = -self.tuning.drag_x;
            }
        } else if pos.x + SPRITE_SIZE > obstacle.x && pos.x < obstacle.x + SPRITE_SIZE {
            // Obstacle on the right (or dead ahead)
            if pos.x > wall + SPRITE_SIZE {
                self.velocity.x -= self.tuning.drag_x;
            } else {
                self.velocity.x = self.tuning.drag_x;
            }
        }
    }

    fn integrate(&mut self) {
        let stats = self.vehicle.stats;
        let grip = self.handling.grip(&stats);
        let acceleration = self.handling.acceleration(&stats);
        let deceleration = self.handling.deceleration(&stats);

        let mut v = self.velocity * self.tuning.smoothing;
        v.x = apply_friction(v.x, deceleration * grip);
        v.y = apply_friction(v.y, deceleration * grip);
        // Engine pull on both axes every step
        v += Vec2::splat(acceleration * grip);
        self.velocity = v.clamp(Vec2::splat(-stats.speed), Vec2::splat(stats.speed));

        let min = Vec2::new(self.tuning.wall_buffer_x, self.tuning.wall_buffer_y);
        let max = Vec2::new(
            ARENA_WIDTH - self.tuning.wall_buffer_x - SPRITE_SIZE,
            ARENA_HEIGHT - self.tuning.wall_buffer_y - SPRITE_SIZE,
        );
        let pos = (self.vehicle.entity.pos + self.velocity).clamp(min, max);
        self.vehicle.entity.pos = pos.trunc();
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn entity(&self) -> &Entity {
        &self.vehicle.entity
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn wander(&self) -> Option<Wander> {
        self.wander
    }

    /// Move the rival (scenario setup)
    pub fn place(&mut self, pos: Vec2) {
        self.vehicle.entity.pos = pos;
    }
}
